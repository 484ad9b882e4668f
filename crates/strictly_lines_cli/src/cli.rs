//! Command-line interface for strictly_lines.

use clap::{Args, Parser, Subcommand};
use strictly_lines::{ConfigError, TableConfig};

/// Strictly Lines - N×N tic-tac-toe against a learning opponent
#[derive(Parser, Debug)]
#[command(name = "strictly_lines")]
#[command(about = "N×N tic-tac-toe against a line-learning opponent", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play interactively in the terminal
    Play {
        /// Table settings
        #[command(flatten)]
        table: TableArgs,
    },

    /// Let two agents play a series of games against each other
    Simulate {
        /// Number of games to play
        #[arg(short, long, default_value = "100")]
        games: usize,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,

        /// Table settings (agent count is forced to 2)
        #[command(flatten)]
        table: TableArgs,
    },
}

/// Table settings shared by every command. Flags override the config file.
#[derive(Args, Debug, Clone)]
pub struct TableArgs {
    /// Path to a TOML table config
    #[arg(short, long)]
    pub config: Option<std::path::PathBuf>,

    /// Board side length
    #[arg(short, long)]
    pub size: Option<usize>,

    /// Number of automated agents (0, 1 or 2)
    #[arg(short, long)]
    pub agents: Option<u8>,

    /// Which mark moves first (0 or 1)
    #[arg(long)]
    pub first_turn: Option<usize>,

    /// Seed for agent tie-breaks
    #[arg(long)]
    pub seed: Option<u64>,

    /// Delay before each agent move, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,
}

impl TableArgs {
    /// Loads the config file, if any, and applies flag overrides.
    pub fn resolve(&self) -> Result<TableConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => TableConfig::from_file(path)?,
            None => TableConfig::default(),
        };
        if let Some(size) = self.size {
            config = config.with_size(size);
        }
        if let Some(agents) = self.agents {
            config = config.with_agents(agents);
        }
        if let Some(first_turn) = self.first_turn {
            config = config.with_first_turn(first_turn);
        }
        if self.seed.is_some() {
            config = config.with_seed(self.seed);
        }
        if let Some(delay_ms) = self.delay_ms {
            config = config.with_delay_ms(delay_ms);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "size = 5\nagents = 0\ndelay_ms = 10").unwrap();

        let cli = Cli::parse_from([
            "strictly_lines",
            "play",
            "--config",
            file.path().to_str().unwrap(),
            "--agents",
            "2",
            "--seed",
            "7",
        ]);
        let Command::Play { table } = cli.command else {
            panic!("expected play");
        };
        let config = table.resolve().unwrap();
        assert_eq!(*config.size(), 5);
        assert_eq!(*config.agents(), 2);
        assert_eq!(*config.delay_ms(), 10);
        assert_eq!(*config.seed(), Some(7));
    }

    #[test]
    fn test_simulate_defaults() {
        let cli = Cli::parse_from(["strictly_lines", "simulate", "--json"]);
        let Command::Simulate { games, json, table } = cli.command else {
            panic!("expected simulate");
        };
        assert_eq!(games, 100);
        assert!(json);
        assert_eq!(table.resolve().unwrap(), TableConfig::default());
    }

    #[test]
    fn test_missing_config_file() {
        let cli = Cli::parse_from(["strictly_lines", "play", "-c", "/nonexistent/table.toml"]);
        let Command::Play { table } = cli.command else {
            panic!("expected play");
        };
        let err = table.resolve().unwrap_err();
        assert!(err.message.starts_with("Failed to read config file"));
    }
}
