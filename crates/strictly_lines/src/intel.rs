//! Heuristic move selection over learned winning lines.
//!
//! An `Intel` remembers every line it has seen win a game. To pick a move
//! it classifies those lines against the current board:
//!
//! - **Offense**: holds only the agent's own marks (and open cells).
//! - **Defense**: holds only the opponent's marks.
//! - **Neutral**: holds no marks yet.
//!
//! Lines with both marks can no longer be won by anyone and are ignored.
//! Each open cell then collects a score from every plan passing through
//! it, and the best-scoring cell is played. The search looks one ply
//! ahead at most: it never simulates replies.

use crate::error::IntelError;
use crate::grid::Grid;
use crate::lines::Line;
use crate::types::{Mark, Tally};
use rand::SeedableRng;
use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use tracing::{debug, info, instrument, trace};

/// How a known line relates to the agent right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display)]
pub enum PlanKind {
    /// Nobody has claimed the line.
    Neutral,
    /// Only the agent's marks are on the line.
    Offense,
    /// Only the opponent's marks are on the line.
    Defense,
}

impl PlanKind {
    /// Fixed per-plan bonus; defense outranks offense outranks neutral.
    pub fn weight(self) -> u128 {
        match self {
            PlanKind::Neutral => 1,
            PlanKind::Offense => 2,
            PlanKind::Defense => 3,
        }
    }
}

/// A known line classified against the current board.
#[derive(Debug, Clone, PartialEq, Eq, derive_new::new)]
pub struct Plan {
    /// Classification.
    pub kind: PlanKind,
    /// The line.
    pub line: Line,
    /// Unmarked cells on the line, ascending.
    pub open: Vec<usize>,
}

/// Score added for a plan with `open` cells left on a board of `size`.
///
/// A cell lies on at most four lines, and four plans one step further
/// from completion always sum to less than a single plan one step closer.
pub fn urgency_weight(size: usize, open: usize) -> u128 {
    let steps = size.saturating_sub(open) as u32;
    4 * 16u128.pow(steps)
}

/// Rule-based agent that learns from finished games.
#[derive(Debug)]
pub struct Intel {
    good: Mark,
    bad: Mark,
    knowledge: Vec<Line>,
    bound_size: Option<usize>,
    rng: StdRng,
}

impl Intel {
    /// Creates an agent playing `good` against `bad`, seeded from the OS.
    #[instrument]
    pub fn new(good: Mark, bad: Mark) -> Result<Self, IntelError> {
        Self::with_rng(good, bad, StdRng::from_os_rng())
    }

    /// Creates an agent with a deterministic tie-break sequence.
    #[instrument]
    pub fn with_seed(good: Mark, bad: Mark, seed: u64) -> Result<Self, IntelError> {
        Self::with_rng(good, bad, StdRng::seed_from_u64(seed))
    }

    /// Creates an agent using the given random source for tie-breaks.
    #[instrument(skip(rng))]
    pub fn with_rng(good: Mark, bad: Mark, rng: StdRng) -> Result<Self, IntelError> {
        if good == bad {
            return Err(IntelError::DuplicateMarks(good));
        }
        Ok(Self {
            good,
            bad,
            knowledge: Vec::new(),
            bound_size: None,
            rng,
        })
    }

    /// The agent's own mark.
    pub fn good_mark(&self) -> Mark {
        self.good
    }

    /// The opponent's mark.
    pub fn bad_mark(&self) -> Mark {
        self.bad
    }

    /// Board size the knowledge was gathered on, if any.
    pub fn bound_size(&self) -> Option<usize> {
        self.bound_size
    }

    /// Lines learned so far, in learning order.
    pub fn knowledge(&self) -> &[Line] {
        &self.knowledge
    }

    /// Reassigns marks, forgetting everything if either changed.
    #[instrument(skip(self))]
    pub fn set_marks(&mut self, good: Mark, bad: Mark) -> Result<(), IntelError> {
        if good == bad {
            return Err(IntelError::DuplicateMarks(good));
        }
        if (good, bad) != (self.good, self.bad) {
            info!(forgotten = self.knowledge.len(), "Marks changed, clearing knowledge");
            self.knowledge.clear();
            self.good = good;
            self.bad = bad;
        }
        Ok(())
    }

    /// Binds to a board size, forgetting everything if it changed.
    ///
    /// The first bind adopts the size and keeps anything learned before it.
    #[instrument(skip(self))]
    pub fn bind(&mut self, size: usize) {
        match self.bound_size {
            Some(bound) if bound == size => {}
            Some(bound) => {
                info!(
                    from = bound,
                    forgotten = self.knowledge.len(),
                    "Board size changed, clearing knowledge"
                );
                self.knowledge.clear();
                self.bound_size = Some(size);
            }
            None => self.bound_size = Some(size),
        }
    }

    /// Adds a line unless it is already known. Returns true if it was new.
    #[instrument(skip(self), fields(line = %line))]
    pub fn learn(&mut self, line: Line) -> bool {
        if self.knowledge.contains(&line) {
            trace!("Line already known");
            return false;
        }
        debug!(known = self.knowledge.len() + 1, "Learned line");
        self.knowledge.push(line);
        true
    }

    /// Adds every unseen line. Returns how many were new.
    pub fn learn_all(&mut self, lines: impl IntoIterator<Item = Line>) -> usize {
        lines.into_iter().filter(|line| self.learn(line.clone())).count()
    }

    /// Classifies every known line against the grid.
    pub fn plans(&self, grid: &Grid) -> Vec<Plan> {
        let board = grid.board();
        self.knowledge
            .iter()
            .filter_map(|line| {
                let tally = Tally::of(&board.pick(line.cells()));
                if tally.open == 0 {
                    return None;
                }
                let kind = match (tally.count(self.good), tally.count(self.bad)) {
                    (0, 0) => PlanKind::Neutral,
                    (_, 0) => PlanKind::Offense,
                    (0, _) => PlanKind::Defense,
                    _ => return None,
                };
                let open = line
                    .cells()
                    .iter()
                    .copied()
                    .filter(|&c| board.is_empty(c))
                    .collect();
                Some(Plan::new(kind, line.clone(), open))
            })
            .collect()
    }

    /// Scores every open cell, ascending by position.
    pub fn rank(&self, grid: &Grid) -> Vec<(usize, u128)> {
        let mut ranks: Vec<(usize, u128)> =
            grid.open_cells().into_iter().map(|pos| (pos, 0)).collect();
        for plan in self.plans(grid) {
            let score = plan.kind.weight() + urgency_weight(grid.size(), plan.open.len());
            for cell in &plan.open {
                if let Ok(i) = ranks.binary_search_by_key(cell, |(pos, _)| *pos) {
                    ranks[i].1 += score;
                }
            }
        }
        ranks
    }

    /// Picks a cell to play on the grid.
    ///
    /// An offense plan one cell from completion wins outright and is taken
    /// immediately. Otherwise the highest-ranked open cell is chosen, with
    /// ties broken uniformly at random.
    ///
    /// # Errors
    ///
    /// Returns `NoMovesAvailable` if the board is full.
    #[instrument(skip(self, grid), fields(good = %self.good, known = self.knowledge.len()))]
    pub fn think(&mut self, grid: &Grid) -> Result<usize, IntelError> {
        self.bind(grid.size());
        if grid.board().is_full() {
            return Err(IntelError::NoMovesAvailable);
        }

        let plans = self.plans(grid);
        if let Some(plan) = plans
            .iter()
            .find(|plan| plan.kind == PlanKind::Offense && plan.open.len() == 1)
        {
            debug!(position = plan.open[0], line = %plan.line, "Taking winning move");
            return Ok(plan.open[0]);
        }

        let ranks = self.rank(grid);
        let best = ranks.iter().map(|(_, score)| *score).max().unwrap_or(0);
        let candidates: Vec<usize> = ranks
            .iter()
            .filter(|(_, score)| *score == best)
            .map(|(pos, _)| *pos)
            .collect();

        let choice = candidates
            .choose(&mut self.rng)
            .copied()
            .ok_or(IntelError::NoMovesAvailable)?;
        debug!(position = choice, score = %best, tied = candidates.len(), "Chose move");
        Ok(choice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridConfig;

    fn grid(size: usize) -> Grid {
        Grid::new(GridConfig::with_size(size)).expect("valid config")
    }

    fn intel() -> Intel {
        Intel::with_seed(Mark::X, Mark::O, 7).expect("distinct marks")
    }

    #[test]
    fn test_learn_is_idempotent() {
        let mut intel = intel();
        assert!(intel.learn(Line::from([0, 1, 2])));
        assert!(!intel.learn(Line::from([0, 1, 2])));
        assert!(!intel.learn(Line::from([2, 1, 0])));
        assert_eq!(intel.knowledge(), &[Line::from([0, 1, 2])]);
    }

    #[test]
    fn test_learn_all_counts_new_lines() {
        let mut intel = intel();
        let added = intel.learn_all(vec![
            Line::from([0, 1, 2]),
            Line::from([3, 4, 5]),
            Line::from([0, 1, 2]),
        ]);
        assert_eq!(added, 2);
        assert_eq!(intel.knowledge().len(), 2);
    }

    #[test]
    fn test_duplicate_marks_rejected() {
        assert_eq!(
            Intel::with_seed(Mark::O, Mark::O, 1).unwrap_err(),
            IntelError::DuplicateMarks(Mark::O)
        );
        let mut intel = intel();
        assert!(intel.set_marks(Mark::X, Mark::X).is_err());
    }

    #[test]
    fn test_immediate_win_taken() {
        let mut grid = grid(3);
        grid.mark(0, Mark::X).unwrap();
        grid.mark(1, Mark::X).unwrap();
        let mut intel = intel();
        intel.learn(Line::from([0, 1, 2]));
        assert_eq!(intel.think(&grid), Ok(2));
    }

    #[test]
    fn test_classification() {
        let mut grid = grid(3);
        grid.mark(0, Mark::X).unwrap();
        grid.mark(4, Mark::O).unwrap();
        grid.mark(8, Mark::O).unwrap();

        let mut intel = intel();
        intel.learn_all([
            Line::from([0, 1, 2]), // offense
            Line::from([3, 4, 5]), // defense
            Line::from([6, 7, 8]), // defense
            Line::from([2, 5, 8]), // defense
            Line::from([0, 4, 8]), // mixed, full
            Line::from([0, 3, 6]), // offense
            Line::from([2, 4, 6]), // defense
        ]);
        intel.learn(Line::from([1, 4, 7]));
        let kinds: Vec<(PlanKind, Vec<usize>)> = intel
            .plans(&grid)
            .into_iter()
            .map(|plan| (plan.kind, plan.open))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (PlanKind::Offense, vec![1, 2]),
                (PlanKind::Defense, vec![3, 5]),
                (PlanKind::Defense, vec![6, 7]),
                (PlanKind::Defense, vec![2, 5]),
                (PlanKind::Offense, vec![3, 6]),
                (PlanKind::Defense, vec![2, 6]),
                (PlanKind::Defense, vec![1, 7]),
            ]
        );
    }

    #[test]
    fn test_mixed_lines_ignored() {
        let mut grid = grid(3);
        grid.mark(0, Mark::X).unwrap();
        grid.mark(1, Mark::O).unwrap();
        let mut intel = intel();
        intel.learn(Line::from([0, 1, 2]));
        assert!(intel.plans(&grid).is_empty());
    }

    #[test]
    fn test_blocks_opponent_before_building() {
        let mut grid = grid(3);
        grid.mark(3, Mark::O).unwrap();
        grid.mark(4, Mark::O).unwrap();
        grid.mark(0, Mark::X).unwrap();

        let mut intel = intel();
        intel.learn(Line::from([3, 4, 5]));
        intel.learn(Line::from([0, 1, 2]));
        assert_eq!(intel.think(&grid), Ok(5));
    }

    #[test]
    fn test_defense_outranks_offense_at_equal_urgency() {
        let mut grid = grid(3);
        grid.mark(0, Mark::X).unwrap();
        grid.mark(8, Mark::O).unwrap();

        let mut intel = intel();
        intel.learn(Line::from([0, 1, 2]));
        intel.learn(Line::from([6, 7, 8]));
        let ranks = intel.rank(&grid);
        let score = |pos: usize| ranks.iter().find(|(p, _)| *p == pos).map(|(_, s)| *s);
        assert!(score(7) > score(1));
        assert_eq!(intel.think(&grid).map(|pos| [6, 7].contains(&pos)), Ok(true));
    }

    #[test]
    fn test_closer_defense_outranks_shared_offense() {
        // O needs only 2 on [0,1,2]; X's two offense lines meet at 4.
        let mut grid = grid(3);
        grid.mark(0, Mark::O).unwrap();
        grid.mark(1, Mark::O).unwrap();
        grid.mark(5, Mark::X).unwrap();
        grid.mark(6, Mark::X).unwrap();

        let mut intel = intel();
        intel.learn_all([
            Line::from([0, 1, 2]),
            Line::from([3, 4, 5]),
            Line::from([2, 4, 6]),
        ]);
        let ranks = intel.rank(&grid);
        let score = |pos: usize| ranks.iter().find(|(p, _)| *p == pos).map(|(_, s)| *s);
        assert_eq!(
            score(4),
            Some(2 * (PlanKind::Offense.weight() + urgency_weight(3, 2)))
        );
        assert!(score(2) > score(4));
        assert_eq!(intel.think(&grid), Ok(2));
    }

    #[test]
    fn test_neutral_ranks_below_offense() {
        let mut grid = grid(3);
        grid.mark(0, Mark::X).unwrap();

        let mut intel = intel();
        intel.learn(Line::from([0, 1, 2]));
        intel.learn(Line::from([6, 7, 8]));
        let ranks = intel.rank(&grid);
        let score = |pos: usize| ranks.iter().find(|(p, _)| *p == pos).map(|(_, s)| *s);
        assert!(score(1) > score(7));
        assert!(score(7) > score(4));
        assert_eq!(score(4), Some(0));
    }

    #[test]
    fn test_urgency_dominates_weight() {
        for size in 3..=8 {
            for open in 2..=size {
                let closer = urgency_weight(size, open - 1) + PlanKind::Neutral.weight();
                let farther = urgency_weight(size, open) + PlanKind::Defense.weight();
                assert!(closer > 4 * farther);
            }
        }
    }

    #[test]
    fn test_empty_knowledge_picks_any_open_cell() {
        let mut grid = grid(3);
        grid.mark(4, Mark::O).unwrap();
        let mut intel = intel();
        let choice = intel.think(&grid).unwrap();
        assert!(choice < 9 && choice != 4);
    }

    #[test]
    fn test_full_board_has_no_moves() {
        let mut grid = grid(3);
        for (pos, mark) in [
            (0, Mark::X),
            (2, Mark::O),
            (1, Mark::X),
            (3, Mark::O),
            (5, Mark::X),
            (4, Mark::O),
            (6, Mark::X),
            (7, Mark::O),
            (8, Mark::X),
        ] {
            grid.mark(pos, mark).unwrap();
        }
        assert_eq!(intel().think(&grid), Err(IntelError::NoMovesAvailable));
    }

    #[test]
    fn test_seeded_choices_repeat() {
        let grid = grid(5);
        let mut a = Intel::with_seed(Mark::O, Mark::X, 99).unwrap();
        let mut b = Intel::with_seed(Mark::O, Mark::X, 99).unwrap();
        let first: Vec<usize> = (0..10).map(|_| a.think(&grid).unwrap()).collect();
        let second: Vec<usize> = (0..10).map(|_| b.think(&grid).unwrap()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_knowledge_cleared_on_rebind() {
        let mut intel = intel();
        intel.bind(3);
        intel.learn(Line::from([0, 1, 2]));
        intel.bind(3);
        assert_eq!(intel.knowledge().len(), 1);
        assert_eq!(intel.bound_size(), Some(3));
        intel.bind(4);
        assert!(intel.knowledge().is_empty());

        intel.learn(Line::from([0, 1, 2, 3]));
        intel.set_marks(Mark::X, Mark::O).unwrap();
        assert_eq!(intel.knowledge().len(), 1);
        intel.set_marks(Mark::O, Mark::X).unwrap();
        assert!(intel.knowledge().is_empty());
    }
}
