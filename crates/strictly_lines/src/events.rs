//! Notifications emitted by a grid after each mutation.

use crate::grid::Grid;
use crate::status::Status;
use crate::types::Mark;
use serde::{Deserialize, Serialize};

/// A grid mutation, delivered to observers once it has fully applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridEvent {
    /// The board was cleared (also sent after a resize).
    Reset,
    /// A mark was placed.
    Mark {
        /// Status after the move.
        status: Status,
        /// Cell that was marked.
        position: usize,
        /// Mark placed.
        mark: Mark,
    },
}

/// Handle returned by [`Grid::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(pub(crate) u64);

/// Receives grid notifications.
///
/// Observers see the grid by shared reference; mutating it in response
/// goes through a deferred queue such as [`crate::Agenda`].
pub trait GridObserver {
    /// Called after each reset or mark.
    fn on_event(&mut self, grid: &Grid, event: &GridEvent);
}

impl<F> GridObserver for F
where
    F: FnMut(&Grid, &GridEvent),
{
    fn on_event(&mut self, grid: &Grid, event: &GridEvent) {
        self(grid, event)
    }
}
