//! Strictly Lines - terminal front end
//!
//! Plays N×N tic-tac-toe against learning agents, or pits two agents
//! against each other.

#![warn(missing_docs)]

mod cli;
mod play;
mod simulate;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Play { table } => {
            let config = table.resolve()?;
            info!(?config, "Starting play");
            play::run(config).await
        }
        Command::Simulate { games, json, table } => {
            let config = table.resolve()?;
            info!(?config, games, "Starting simulation");
            let summary = simulate::run(config, games)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{}", summary);
            }
            Ok(())
        }
    }
}
