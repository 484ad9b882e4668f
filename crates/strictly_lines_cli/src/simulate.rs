//! Agent-versus-agent series.

use anyhow::Result;
use serde::Serialize;
use strictly_lines::{Line, Mark, Status, Table, TableConfig};
use tracing::{info, instrument};

/// Outcome tallies for a series of games on one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Board side length.
    pub size: usize,
    /// Games played.
    pub games: usize,
    /// Games won by X.
    pub x_wins: usize,
    /// Games won by O.
    pub o_wins: usize,
    /// Tied games.
    pub ties: usize,
    /// Lines the X agent knows after the series.
    pub learned: Vec<Line>,
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} games on a {}×{} board", self.games, self.size, self.size)?;
        writeln!(f, "  X wins: {}", self.x_wins)?;
        writeln!(f, "  O wins: {}", self.o_wins)?;
        writeln!(f, "  Ties:   {}", self.ties)?;
        write!(f, "  Learned {} lines", self.learned.len())?;
        for line in &self.learned {
            write!(f, "\n    {}", line)?;
        }
        Ok(())
    }
}

/// Plays `games` games between two agents; knowledge carries across games.
#[instrument(skip(config))]
pub fn run(config: TableConfig, games: usize) -> Result<Summary> {
    let mut table = Table::new(config.with_agents(2))?;
    let mut summary = Summary {
        size: table.grid().size(),
        ..Summary::default()
    };

    for game in 0..games {
        table.settle()?;
        match table.grid().status() {
            Status::Won(_) => {
                let winner = table.grid().history().last().map(|m| m.mark);
                match winner {
                    Some(Mark::X) => summary.x_wins += 1,
                    Some(Mark::O) => summary.o_wins += 1,
                    None => {}
                }
            }
            Status::Tied => summary.ties += 1,
            Status::Empty | Status::Ongoing => anyhow::bail!("Game {} stalled", game),
        }
        summary.games += 1;
        table.reset();
    }

    if let Some(agent) = table.agent(Mark::X) {
        summary.learned = agent.borrow().knowledge().to_vec();
    }
    info!(games = summary.games, ties = summary.ties, "Series finished");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_tallies_every_game() {
        let config = TableConfig::default().with_seed(Some(9));
        let summary = run(config, 25).unwrap();
        assert_eq!(summary.games, 25);
        assert_eq!(summary.x_wins + summary.o_wins + summary.ties, 25);
        assert!(summary.learned.len() <= 8);
    }

    #[test]
    fn test_seeded_series_repeats() {
        let config = TableConfig::default().with_size(4).with_seed(Some(17));
        let first = run(config.clone(), 10).unwrap();
        let second = run(config, 10).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_summary_serializes() {
        let summary = Summary {
            size: 3,
            games: 1,
            x_wins: 1,
            learned: vec![Line::from([0, 4, 8])],
            ..Summary::default()
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["learned"], serde_json::json!([[0, 4, 8]]));
        assert_eq!(json["x_wins"], 1);
    }
}
