//! The grid: canonical game state for one N×N board.
//!
//! The grid owns the board, the move history and the cached status. Status
//! is re-evaluated after each mark by checking only the lines that pass
//! through the marked cell. Every mutation is announced to subscribed
//! observers once it has fully applied.

use crate::error::GridError;
use crate::events::{GridEvent, GridObserver, ObserverId};
use crate::lines::{self, Line, MIN_LINE, Solution};
use crate::status::Status;
use crate::types::{Board, Cell, Mark, Move};
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use tracing::{debug, info, instrument, warn};

/// Largest supported board side length.
pub const MAX_SIZE: usize = 24;

/// Grid construction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Side length.
    pub size: usize,
    /// Index into `marks` of the mark that moves first.
    pub first_turn: usize,
    /// The two marks in turn order.
    pub marks: [Mark; 2],
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: MIN_LINE,
            first_turn: 0,
            marks: [Mark::X, Mark::O],
        }
    }
}

impl GridConfig {
    /// Creates a config with the default turn order.
    pub fn with_size(size: usize) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Checks every field.
    #[instrument]
    pub fn validate(&self) -> Result<(), GridError> {
        validate_size(self.size)?;
        if self.first_turn > 1 {
            return Err(GridError::InvalidTurn(self.first_turn));
        }
        if self.marks[0] == self.marks[1] {
            return Err(GridError::DuplicateMarks(self.marks[0]));
        }
        Ok(())
    }
}

fn validate_size(size: usize) -> Result<(), GridError> {
    if (MIN_LINE..=MAX_SIZE).contains(&size) {
        Ok(())
    } else {
        Err(GridError::InvalidSize(size))
    }
}

/// Game state for one board.
pub struct Grid {
    config: GridConfig,
    solution: Rc<Solution>,
    board: Board,
    history: Vec<Move>,
    status: Status,
    observers: Vec<(ObserverId, Box<dyn GridObserver>)>,
    next_observer: u64,
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grid")
            .field("config", &self.config)
            .field("history", &self.history)
            .field("status", &self.status)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl Grid {
    /// Creates an empty grid.
    #[instrument]
    pub fn new(config: GridConfig) -> Result<Self, GridError> {
        config.validate()?;
        info!(size = config.size, "Creating grid");
        Ok(Self {
            config,
            solution: lines::solution(config.size),
            board: Board::new(config.size),
            history: Vec::new(),
            status: Status::Empty,
            observers: Vec::new(),
            next_observer: 0,
        })
    }

    /// Creates a fresh grid and applies `moves` in order.
    #[instrument(skip(moves), fields(moves = moves.len()))]
    pub fn replay(config: GridConfig, moves: &[Move]) -> Result<Self, GridError> {
        let mut grid = Self::new(config)?;
        for action in moves {
            grid.mark(action.position, action.mark)?;
        }
        Ok(grid)
    }

    // ─────────────────────────────────────────────────────────────
    //  Mutators
    // ─────────────────────────────────────────────────────────────

    /// Clears the board and history.
    #[instrument(skip(self), fields(size = self.config.size))]
    pub fn reset(&mut self) {
        self.board.clear();
        self.history.clear();
        self.status = Status::Empty;
        debug!("Grid reset");
        self.notify(GridEvent::Reset);
    }

    /// Changes the board size and resets.
    #[instrument(skip(self), fields(from = self.config.size))]
    pub fn resize(&mut self, size: usize) -> Result<(), GridError> {
        validate_size(size)?;
        self.config.size = size;
        self.solution = lines::solution(size);
        self.board = Board::new(size);
        info!(size, lines = self.solution.lines().len(), "Grid resized");
        self.reset();
        Ok(())
    }

    /// Places `mark` at `position` and returns the new status.
    ///
    /// The mark need not match [`Grid::turn_mark`]; the turn advances
    /// either way.
    ///
    /// # Errors
    ///
    /// - `GameAlreadyOver` once the game is won or tied.
    /// - `InvalidPosition` if the position is off the board or taken.
    #[instrument(skip(self), fields(size = self.config.size))]
    pub fn mark(&mut self, position: usize, mark: Mark) -> Result<Status, GridError> {
        if self.status.is_over() {
            warn!(status = %self.status, "Mark attempted after game end");
            return Err(GridError::GameAlreadyOver);
        }
        if !self.board.is_empty(position) {
            warn!("Position is off the board or already marked");
            return Err(GridError::InvalidPosition(
                i64::try_from(position).unwrap_or(i64::MAX),
            ));
        }

        self.board.set(position, mark);
        self.history.push(Move::new(mark, position));
        self.status = self.evaluate();
        debug!(status = %self.status, moves = self.history.len(), "Mark applied");

        self.notify(GridEvent::Mark {
            status: self.status.clone(),
            position,
            mark,
        });
        Ok(self.status.clone())
    }

    // ─────────────────────────────────────────────────────────────
    //  Observers
    // ─────────────────────────────────────────────────────────────

    /// Registers an observer for reset and mark events.
    #[instrument(skip_all)]
    pub fn subscribe(&mut self, observer: impl GridObserver + 'static) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        debug!(?id, "Observer subscribed");
        id
    }

    /// Removes an observer. Returns false if it was not registered.
    #[instrument(skip(self))]
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        before != self.observers.len()
    }

    fn notify(&mut self, event: GridEvent) {
        // Observers only see `&Grid`, so none can subscribe while this runs.
        let mut observers = std::mem::take(&mut self.observers);
        for (_, observer) in observers.iter_mut() {
            observer.on_event(self, &event);
        }
        self.observers = observers;
    }

    // ─────────────────────────────────────────────────────────────
    //  Queries
    // ─────────────────────────────────────────────────────────────

    /// Recomputes the status from the last move without mutating anything.
    pub fn evaluate(&self) -> Status {
        let Some(last) = self.history.last() else {
            return Status::Empty;
        };
        let target = Cell::Marked(last.mark);

        for &id in self.solution.lines_through(last.position) {
            let line = &self.solution.lines()[id];
            if line.cells().iter().all(|&c| self.board.get(c) == Some(target)) {
                return Status::Won(line.clone());
            }
        }

        if self.board.is_full() {
            Status::Tied
        } else {
            Status::Ongoing
        }
    }

    /// Validates raw user input as a playable position.
    pub fn check_position(&self, raw: i64) -> Result<usize, GridError> {
        usize::try_from(raw)
            .ok()
            .filter(|&pos| self.board.is_empty(pos))
            .ok_or(GridError::InvalidPosition(raw))
    }

    /// Current status.
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Returns true once the game is won or tied.
    pub fn is_over(&self) -> bool {
        self.status.is_over()
    }

    /// Side length.
    pub fn size(&self) -> usize {
        self.config.size
    }

    /// Construction parameters, with the current size.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        self.board.cells()
    }

    /// Moves made since the last reset.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Index of the mark that plays next.
    pub fn turn(&self) -> usize {
        (self.config.first_turn + self.history.len()) % 2
    }

    /// The mark that plays next.
    pub fn turn_mark(&self) -> Mark {
        self.config.marks[self.turn()]
    }

    /// The two marks in turn order.
    pub fn marks(&self) -> [Mark; 2] {
        self.config.marks
    }

    /// Winning lines for the current size.
    pub fn lines(&self) -> &[Line] {
        self.solution.lines()
    }

    /// Line solution for the current size.
    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    /// Unmarked positions, ascending.
    pub fn open_cells(&self) -> Vec<usize> {
        self.board.open_cells()
    }

    /// Text rendering of the board.
    pub fn render(&self) -> String {
        self.board.display()
    }
}
