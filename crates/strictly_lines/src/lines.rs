//! Winning line enumeration for N×N boards.
//!
//! A line is a maximal straight run of at least three cells: every row,
//! every column, and every diagonal in either direction that is long
//! enough. Lines depend on the board size alone, so solutions are
//! memoised per size.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, instrument};

/// Shortest run that counts as a line.
pub const MIN_LINE: usize = 3;

/// A winning line: ascending, unique cell indices.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Line(Vec<usize>);

impl Line {
    /// Creates a line from cell indices, sorting and deduplicating them.
    pub fn new(mut cells: Vec<usize>) -> Self {
        cells.sort_unstable();
        cells.dedup();
        Self(cells)
    }

    /// Cell indices, ascending.
    pub fn cells(&self) -> &[usize] {
        &self.0
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for solver output.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Checks whether the line passes through `cell`.
    pub fn contains(&self, cell: usize) -> bool {
        self.0.binary_search(&cell).is_ok()
    }
}

impl From<Vec<usize>> for Line {
    fn from(cells: Vec<usize>) -> Self {
        Self::new(cells)
    }
}

impl<const N: usize> From<[usize; N]> for Line {
    fn from(cells: [usize; N]) -> Self {
        Self::new(cells.to_vec())
    }
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// All lines for one board size, plus the cell → line-id index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    size: usize,
    lines: Vec<Line>,
    index: Vec<Vec<usize>>,
}

impl Solution {
    /// Board side length this solution was computed for.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Lines in emission order; a line's id is its position here.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Ids of the lines passing through `cell`, ascending.
    pub fn lines_through(&self, cell: usize) -> &[usize] {
        self.index.get(cell).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The full cell → line-ids index.
    pub fn index(&self) -> &[Vec<usize>] {
        &self.index
    }

    /// Line by id.
    pub fn line(&self, id: usize) -> Option<&Line> {
        self.lines.get(id)
    }
}

/// Walks `len` cells from `start` by `stride`, which may be negative.
fn run(start: usize, stride: isize, len: usize) -> Line {
    let cells = (0..len)
        .map(|step| start.wrapping_add_signed(stride * step as isize))
        .collect();
    Line::new(cells)
}

/// Enumerates every winning line on a `size × size` board.
///
/// Rows and columns come first for each offset, then the diagonals that
/// start on the top row, then (for boards wider than 3) the diagonals that
/// start on the bottom row. The bottom-row bounds skip the two main
/// diagonals, which the top-row pass already emits.
#[instrument]
pub fn solve(size: usize) -> Solution {
    let mut lines = Vec::new();
    let cells = size * size;
    let n = size as isize;

    if size >= MIN_LINE {
        for i in 0..size {
            lines.push(run(i * size, 1, size));
            lines.push(run(i, n, size));

            if i + MIN_LINE <= size {
                lines.push(run(i, n + 1, size - i));
            }
            if i >= MIN_LINE - 1 {
                lines.push(run(i, n - 1, i + 1));
            }

            if size > MIN_LINE {
                let from = cells - 1 - i;
                if i >= 1 && i + MIN_LINE <= size {
                    lines.push(run(from, -(n + 1), size - i));
                }
                if i >= MIN_LINE - 1 && i + 2 <= size {
                    lines.push(run(from, -(n - 1), i + 1));
                }
            }
        }
    }

    let mut index = vec![Vec::new(); cells];
    for (id, line) in lines.iter().enumerate() {
        for &cell in line.cells() {
            index[cell].push(id);
        }
    }

    debug!(size, lines = lines.len(), "Solved board lines");
    Solution { size, lines, index }
}

thread_local! {
    static SOLUTIONS: RefCell<HashMap<usize, Rc<Solution>>> = RefCell::new(HashMap::new());
}

/// Memoised [`solve`]: repeated calls for one size share a solution.
#[instrument]
pub fn solution(size: usize) -> Rc<Solution> {
    SOLUTIONS.with(|cache| {
        Rc::clone(
            cache
                .borrow_mut()
                .entry(size)
                .or_insert_with(|| Rc::new(solve(size))),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_well_formed(size: usize) {
        let solution = solve(size);
        for line in solution.lines() {
            assert!(line.len() >= MIN_LINE, "short line {line} for size {size}");
            assert!(line.cells().windows(2).all(|w| w[0] < w[1]));
            assert!(line.cells().iter().all(|&c| c < size * size));
        }
    }

    #[test]
    fn test_lines_are_well_formed() {
        for size in 3..=9 {
            assert_well_formed(size);
        }
    }

    #[test]
    fn test_three_by_three_has_eight_lines() {
        let solution = solve(3);
        assert_eq!(solution.lines().len(), 8);

        let mut lines = solution.lines().to_vec();
        lines.sort();
        let mut expected: Vec<Line> = [
            [0, 1, 2],
            [3, 4, 5],
            [6, 7, 8],
            [0, 3, 6],
            [1, 4, 7],
            [2, 5, 8],
            [0, 4, 8],
            [2, 4, 6],
        ]
        .into_iter()
        .map(Line::from)
        .collect();
        expected.sort();
        assert_eq!(lines, expected);
    }

    #[test]
    fn test_four_by_four_includes_short_diagonals() {
        let solution = solve(4);
        assert_eq!(solution.lines().len(), 14);

        for diagonal in [
            Line::from([0, 5, 10, 15]),
            Line::from([3, 6, 9, 12]),
            Line::from([1, 6, 11]),
            Line::from([4, 9, 14]),
            Line::from([2, 5, 8]),
            Line::from([7, 10, 13]),
        ] {
            assert!(
                solution.lines().contains(&diagonal),
                "missing diagonal {diagonal}"
            );
        }
    }

    #[test]
    fn test_line_count_formula() {
        for size in 3..=12 {
            assert_eq!(solve(size).lines().len(), 2 * size + 2 * (2 * size - 5));
        }
    }

    #[test]
    fn test_no_duplicate_lines() {
        for size in 3..=8 {
            let mut lines = solve(size).lines().to_vec();
            let total = lines.len();
            lines.sort();
            lines.dedup();
            assert_eq!(lines.len(), total);
        }
    }

    #[test]
    fn test_index_matches_lines() {
        for size in 3..=6 {
            let solution = solve(size);
            for cell in 0..size * size {
                let expected: Vec<usize> = solution
                    .lines()
                    .iter()
                    .enumerate()
                    .filter(|(_, line)| line.contains(cell))
                    .map(|(id, _)| id)
                    .collect();
                assert_eq!(solution.lines_through(cell), expected.as_slice());
            }
        }
    }

    #[test]
    fn test_degenerate_sizes_have_no_lines() {
        assert!(solve(0).lines().is_empty());
        assert!(solve(2).lines().is_empty());
        assert_eq!(solve(2).index().len(), 4);
    }

    #[test]
    fn test_solution_is_memoised() {
        let a = solution(5);
        let b = solution(5);
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(*a, solve(5));
    }
}
