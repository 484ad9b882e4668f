//! Interactive terminal play.

use anyhow::Result;
use std::time::Duration;
use strictly_lines::{Grid, GridEvent, PlayError, Status, Table, TableConfig};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, instrument};

/// A line of player input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Mark a cell (raw, unvalidated index).
    Place(i64),
    /// Start over on the same board.
    Reset,
    /// Start over on a board of another size.
    Resize(usize),
    /// Show the commands.
    Help,
    /// Leave.
    Quit,
    /// Anything else.
    Unknown(String),
}

impl Input {
    /// Parses one line of input.
    pub fn parse(line: &str) -> Self {
        let mut words = line.split_whitespace();
        match (words.next(), words.next()) {
            (Some("quit" | "q" | "exit"), None) => Input::Quit,
            (Some("reset" | "r"), None) => Input::Reset,
            (Some("help" | "h" | "?"), None) => Input::Help,
            (Some("size"), Some(n)) => match n.parse() {
                Ok(size) => Input::Resize(size),
                Err(_) => Input::Unknown(line.trim().to_string()),
            },
            (Some(word), None) => match word.parse() {
                Ok(raw) => Input::Place(raw),
                Err(_) => Input::Unknown(word.to_string()),
            },
            _ => Input::Unknown(line.trim().to_string()),
        }
    }
}

const HELP: &str = "Enter a cell number to mark it. Commands: reset, size <n>, help, quit.";

fn announce(grid: &Grid, event: &GridEvent) {
    match event {
        GridEvent::Reset => {
            println!("\nNew game on a {0}×{0} board.", grid.size());
            println!("{}\n", grid.render());
        }
        GridEvent::Mark {
            status,
            position,
            mark,
        } => {
            println!("\n{} marks {}", mark, position);
            println!("{}\n", grid.render());
            match status {
                Status::Won(line) => println!("{} wins along {}!", mark, line),
                Status::Tied => println!("It's a tie."),
                Status::Empty | Status::Ongoing => {}
            }
        }
    }
}

/// Runs an interactive game until the player quits or input ends.
#[instrument(skip(config))]
pub async fn run(config: TableConfig) -> Result<()> {
    let delay = Duration::from_millis(*config.delay_ms());
    let mut table = Table::new(config)?;
    table.grid_mut().subscribe(announce);
    info!(size = table.grid().size(), "Starting interactive game");

    println!("{}", HELP);
    println!("{}\n", table.grid().render());

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    loop {
        while !table.agenda().is_empty() {
            tokio::time::sleep(delay).await;
            table.step()?;
        }

        if table.grid().is_over() {
            println!("Type 'reset' to play again or 'quit' to leave.");
        } else if table.awaits_human() {
            println!("{} to move:", table.grid().turn_mark());
        }

        let Some(line) = input.next_line().await? else {
            debug!("Input closed");
            break;
        };

        match Input::parse(&line) {
            Input::Quit => break,
            Input::Reset => table.reset(),
            Input::Help => println!("{}", HELP),
            Input::Resize(size) => {
                if let Err(e) = table.resize(size) {
                    println!("{}", e);
                }
            }
            Input::Place(raw) => {
                let played = table
                    .grid()
                    .check_position(raw)
                    .map_err(PlayError::from)
                    .and_then(|position| table.play(position));
                if let Err(e) = played {
                    println!("{}", e);
                }
            }
            Input::Unknown(word) => println!("Unrecognised input '{}'. {}", word, HELP),
        }
    }

    Ok(())
}
