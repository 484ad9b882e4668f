//! Strictly Lines - N×N tic-tac-toe with a line-learning opponent
//!
//! # Architecture
//!
//! - **Lines**: every winning line for a board size, plus a cell → line index
//! - **Grid**: board, history, turn and status, with change notifications
//! - **Intel**: ranks moves using the winning lines it has seen
//! - **AutoPlay**: binds agents to a grid through a deferred-move agenda
//! - **Table**: a configured grid with zero, one or two agents
//!
//! # Example
//!
//! ```
//! use strictly_lines::{Grid, GridConfig, Intel, Line, Mark, Status};
//!
//! # fn example() -> Result<(), strictly_lines::Error> {
//! let mut grid = Grid::new(GridConfig::default())?;
//! grid.mark(0, Mark::X)?;
//! grid.mark(1, Mark::X)?;
//!
//! let mut intel = Intel::with_seed(Mark::X, Mark::O, 42)?;
//! intel.learn(Line::from([0, 1, 2]));
//! let position = intel.think(&grid)?;
//! assert_eq!(position, 2);
//!
//! assert_eq!(grid.mark(position, Mark::X)?, Status::Won(Line::from([0, 1, 2])));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod autoplay;
mod error;
mod events;
mod grid;
mod intel;
mod lines;
mod status;
mod table;
mod types;

// Crate-level exports - Errors
pub use error::{ConfigError, Error, GridError, IntelError, PlayError, Result};

// Crate-level exports - Lines
pub use lines::{Line, MIN_LINE, Solution, solution, solve};

// Crate-level exports - Grid
pub use events::{GridEvent, GridObserver, ObserverId};
pub use grid::{Grid, GridConfig, MAX_SIZE};
pub use status::Status;
pub use types::{Board, Cell, Mark, Move, Tally};

// Crate-level exports - Intel
pub use intel::{Intel, Plan, PlanKind, urgency_weight};

// Crate-level exports - Auto-play
pub use autoplay::{Agenda, SharedIntel, auto_play, play_once};

// Crate-level exports - Table
pub use table::{Seat, Table, TableConfig};
