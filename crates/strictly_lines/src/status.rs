//! Game status after each move.

use crate::lines::Line;
use serde::{Deserialize, Serialize};

/// Terminal or non-terminal classification of a grid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// No moves made yet.
    #[default]
    Empty,
    /// Moves made, game not decided.
    Ongoing,
    /// The given line was completed by a single mark.
    Won(Line),
    /// Board full without a completed line.
    Tied,
}

impl Status {
    /// Returns true once the game is won or tied.
    pub fn is_over(&self) -> bool {
        matches!(self, Status::Won(_) | Status::Tied)
    }

    /// Returns true while moves are still accepted.
    pub fn is_live(&self) -> bool {
        !self.is_over()
    }

    /// The winning line, if any.
    pub fn winning_line(&self) -> Option<&Line> {
        match self {
            Status::Won(line) => Some(line),
            _ => None,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Empty => write!(f, "Empty"),
            Status::Ongoing => write!(f, "Ongoing"),
            Status::Won(line) => write!(f, "Won {}", line),
            Status::Tied => write!(f, "Tied"),
        }
    }
}
