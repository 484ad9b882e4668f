//! Error types for grid, intel and play operations.

use crate::types::Mark;
use derive_more::{Display, Error, From};
use tracing::instrument;

/// Error raised by a grid mutation or construction.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum GridError {
    /// Position is out of range or the cell is already marked.
    #[display("Invalid position: {}", _0)]
    InvalidPosition(#[error(not(source))] i64),

    /// The game is won or tied; reset before marking again.
    #[display("Game is already over")]
    GameAlreadyOver,

    /// Board side length outside the supported range.
    #[display("Invalid board size: {}", _0)]
    InvalidSize(#[error(not(source))] usize),

    /// Starting turn must be 0 or 1.
    #[display("Invalid starting turn: {}", _0)]
    InvalidTurn(#[error(not(source))] usize),

    /// Both players were given the same mark.
    #[display("Both players use mark {}", _0)]
    DuplicateMarks(#[error(not(source))] Mark),
}

/// Error raised by move selection.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum IntelError {
    /// No unmarked cell is left to play.
    #[display("No moves available")]
    NoMovesAvailable,

    /// Good and bad marks must differ.
    #[display("Agent cannot play both sides with mark {}", _0)]
    DuplicateMarks(#[error(not(source))] Mark),
}

/// Error raised while playing a move at a table or from an agenda.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum PlayError {
    /// Grid rejected the operation.
    #[display("{}", _0)]
    Grid(GridError),

    /// An agent could not move.
    #[display("{}", _0)]
    Intel(IntelError),

    /// A human tried to move while an agent owns the turn.
    #[display("It's the agent's turn ({})", _0)]
    #[from(ignore)]
    NotHumanTurn(#[error(not(source))] Mark),

    /// More agents requested than there are marks.
    #[display("At most 2 agents can be seated, got {}", _0)]
    #[from(ignore)]
    TooManyAgents(#[error(not(source))] u8),
}

/// Crate-level error.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum Error {
    /// Grid error.
    #[display("{}", _0)]
    Grid(GridError),
    /// Intel error.
    #[display("{}", _0)]
    Intel(IntelError),
    /// Play error.
    #[display("{}", _0)]
    Play(PlayError),
    /// Configuration error.
    #[display("{}", _0)]
    Config(ConfigError),
}

/// Configuration error with caller location.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Crate-level result.
pub type Result<T> = std::result::Result<T, Error>;
