//! Automated agents bound to a grid.
//!
//! An agent subscribes to its grid and, whenever its turn comes up in a
//! live game, queues a deferred move on an [`Agenda`]. The front end
//! decides when to run queued moves (typically after a pacing delay), so
//! each move re-checks its preconditions before touching the grid and
//! silently drops out if the game moved on in the meantime.

use crate::error::{GridError, PlayError};
use crate::events::{GridEvent, ObserverId};
use crate::grid::Grid;
use crate::intel::Intel;
use crate::status::Status;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use tracing::{debug, info, instrument};

/// An agent shared between its grid observer and its owner.
pub type SharedIntel = Rc<RefCell<Intel>>;

/// A queued agent move.
#[derive(Debug, Clone)]
struct Deferred {
    intel: SharedIntel,
    size: usize,
}

/// Queue of deferred agent moves, run in FIFO order.
#[derive(Debug, Clone, Default)]
pub struct Agenda {
    jobs: Rc<RefCell<VecDeque<Deferred>>>,
}

impl Agenda {
    /// Creates an empty agenda.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued moves, stale ones included.
    pub fn len(&self) -> usize {
        self.jobs.borrow().len()
    }

    /// Returns true when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.jobs.borrow().is_empty()
    }

    /// Drops every queued move.
    pub fn clear(&self) {
        self.jobs.borrow_mut().clear();
    }

    fn push(&self, job: Deferred) {
        self.jobs.borrow_mut().push_back(job);
    }

    /// Runs the oldest queued move.
    ///
    /// Returns `Ok(None)` when the queue is empty or the move is stale: the
    /// game is over, the board was resized, or it is no longer the agent's
    /// turn. Otherwise returns the status after the agent's mark.
    #[instrument(skip_all, fields(queued = self.len()))]
    pub fn run_next(&self, grid: &mut Grid) -> Result<Option<Status>, PlayError> {
        let Some(job) = self.jobs.borrow_mut().pop_front() else {
            return Ok(None);
        };

        let mark = job.intel.borrow().good_mark();
        if grid.is_over() || grid.size() != job.size || grid.turn_mark() != mark {
            debug!(%mark, "Dropping stale agent move");
            return Ok(None);
        }

        let position = job.intel.borrow_mut().think(grid)?;
        let status = grid.mark(position, mark)?;
        Ok(Some(status))
    }

    /// Runs queued moves until the agenda is empty.
    ///
    /// Two agents playing each other keep refilling the queue until the
    /// game ends, which takes at most one move per cell.
    #[instrument(skip_all)]
    pub fn drain(&self, grid: &mut Grid) -> Result<Vec<Status>, PlayError> {
        let mut statuses = Vec::new();
        let limit = grid.cells().len() * 2 + self.len();
        for _ in 0..limit {
            if self.is_empty() {
                break;
            }
            if let Some(status) = self.run_next(grid)? {
                statuses.push(status);
            }
        }
        Ok(statuses)
    }
}

/// Binds `intel` to `grid`: it learns every winning line the grid reports
/// and queues a move on `agenda` whenever its turn comes up.
///
/// Returns the observer id, for [`Grid::unsubscribe`].
#[instrument(skip_all, fields(mark = %intel.borrow().good_mark()))]
pub fn auto_play(intel: SharedIntel, grid: &mut Grid, agenda: &Agenda) -> ObserverId {
    intel.borrow_mut().bind(grid.size());
    schedule(&intel, grid, agenda);

    let observed = Rc::clone(&intel);
    let queue = agenda.clone();
    let id = grid.subscribe(move |grid: &Grid, event: &GridEvent| {
        observed.borrow_mut().bind(grid.size());
        if let GridEvent::Mark {
            status: Status::Won(line),
            ..
        } = event
        {
            observed.borrow_mut().learn(line.clone());
        }
        schedule(&observed, grid, &queue);
    });
    info!(?id, "Agent bound to grid");
    id
}

fn schedule(intel: &SharedIntel, grid: &Grid, agenda: &Agenda) {
    let mark = intel.borrow().good_mark();
    if grid.status().is_live() && grid.turn_mark() == mark {
        debug!(%mark, "Scheduling agent move");
        agenda.push(Deferred {
            intel: Rc::clone(intel),
            size: grid.size(),
        });
    }
}

/// Convenience for a single agent move outside any agenda.
///
/// Fails with `GameAlreadyOver` if the grid is terminal.
#[instrument(skip_all)]
pub fn play_once(intel: &SharedIntel, grid: &mut Grid) -> Result<Status, PlayError> {
    if grid.is_over() {
        return Err(GridError::GameAlreadyOver.into());
    }
    let mark = intel.borrow().good_mark();
    let position = intel.borrow_mut().think(grid)?;
    Ok(grid.mark(position, mark)?)
}
