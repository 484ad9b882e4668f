//! Core domain types for N×N tic-tac-toe.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// One of the two symbols a player places in a cell.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Mark {
    /// Mark X.
    X,
    /// Mark O.
    O,
}

impl Mark {
    /// Returns the other mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Unmarked cell.
    #[default]
    Empty,
    /// Cell holding a mark.
    Marked(Mark),
}

impl Cell {
    /// Returns true if the cell holds no mark.
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Returns the mark in this cell, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::Marked(mark) => Some(mark),
        }
    }
}

/// Square board of `size × size` cells in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates an empty board with the given side length.
    #[instrument]
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    /// Side length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Gets the cell at the given position.
    pub fn get(&self, pos: usize) -> Option<Cell> {
        self.cells.get(pos).copied()
    }

    /// Checks if the cell at `pos` exists and is unmarked.
    pub fn is_empty(&self, pos: usize) -> bool {
        matches!(self.get(pos), Some(Cell::Empty))
    }

    /// Returns all cells as a slice.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Selects the cells at the given indices, in index order.
    ///
    /// Indices past the end of the board are skipped.
    pub fn pick(&self, indices: &[usize]) -> Vec<Cell> {
        indices.iter().filter_map(|&i| self.get(i)).collect()
    }

    /// Positions of all unmarked cells, ascending.
    pub fn open_cells(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_empty())
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Checks if no cell is left unmarked.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_empty())
    }

    /// Number of marked cells.
    pub fn marked_count(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }

    pub(crate) fn set(&mut self, pos: usize, mark: Mark) {
        self.cells[pos] = Cell::Marked(mark);
    }

    pub(crate) fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    /// Formats the board as text, showing open cells by index.
    pub fn display(&self) -> String {
        let width = (self.cells.len().saturating_sub(1)).to_string().len();
        let mut rows = Vec::with_capacity(self.size);
        for row in self.cells.chunks(self.size.max(1)) {
            let start = rows.len() * self.size;
            let symbols: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(col, cell)| match cell {
                    Cell::Empty => format!("{:>width$}", start + col),
                    Cell::Marked(mark) => format!("{:>width$}", mark.to_string()),
                })
                .collect();
            rows.push(symbols.join(" | "));
        }
        let rule = "-".repeat(rows.first().map(String::len).unwrap_or(0));
        rows.join(&format!("\n{}\n", rule))
    }
}

/// Tally of marks among a subset of cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    /// Cells holding X.
    pub x: usize,
    /// Cells holding O.
    pub o: usize,
    /// Unmarked cells.
    pub open: usize,
}

impl Tally {
    /// Counts occurrences of each mark among `cells`.
    pub fn of(cells: &[Cell]) -> Self {
        cells.iter().fold(Self::default(), |mut tally, cell| {
            match cell {
                Cell::Empty => tally.open += 1,
                Cell::Marked(Mark::X) => tally.x += 1,
                Cell::Marked(Mark::O) => tally.o += 1,
            }
            tally
        })
    }

    /// Count for the given mark.
    pub fn count(&self, mark: Mark) -> usize {
        match mark {
            Mark::X => self.x,
            Mark::O => self.o,
        }
    }
}

/// A move: a mark placed at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_new::new)]
pub struct Move {
    /// The mark placed.
    pub mark: Mark,
    /// Cell index, row-major.
    pub position: usize,
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.mark, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent() {
        assert_eq!(Mark::X.opponent(), Mark::O);
        assert_eq!(Mark::O.opponent(), Mark::X);
    }

    #[test]
    fn test_mark_parses_case_insensitive() {
        assert_eq!("x".parse::<Mark>(), Ok(Mark::X));
        assert_eq!("O".parse::<Mark>(), Ok(Mark::O));
        assert!("z".parse::<Mark>().is_err());
    }

    #[test]
    fn test_pick_and_tally() {
        let mut board = Board::new(3);
        board.set(0, Mark::X);
        board.set(1, Mark::O);
        board.set(4, Mark::X);

        let picked = board.pick(&[0, 4, 8]);
        assert_eq!(
            picked,
            vec![Cell::Marked(Mark::X), Cell::Marked(Mark::X), Cell::Empty]
        );

        let tally = Tally::of(&picked);
        assert_eq!(tally.count(Mark::X), 2);
        assert_eq!(tally.count(Mark::O), 0);
        assert_eq!(tally.open, 1);
    }

    #[test]
    fn test_open_cells_and_full() {
        let mut board = Board::new(3);
        assert_eq!(board.open_cells().len(), 9);
        for pos in 0..9 {
            board.set(pos, Mark::O);
        }
        assert!(board.is_full());
        assert!(board.open_cells().is_empty());
        board.clear();
        assert_eq!(board.marked_count(), 0);
    }

    #[test]
    fn test_display_shows_indices_and_marks() {
        let mut board = Board::new(3);
        board.set(4, Mark::X);
        let text = board.display();
        assert!(text.starts_with("0 | 1 | 2"));
        assert!(text.contains("3 | X | 5"));
    }
}
