//! A configured game table: one grid plus zero, one or two agents.

use crate::autoplay::{self, Agenda, SharedIntel};
use crate::error::{ConfigError, PlayError};
use crate::grid::{Grid, GridConfig};
use crate::intel::Intel;
use crate::status::Status;
use crate::types::Mark;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use tracing::{debug, info, instrument, warn};

/// Settings owned by the front end and passed into the core.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Board side length.
    size: usize,

    /// Index into `marks` of the mark that moves first.
    first_turn: usize,

    /// The two marks in turn order.
    marks: [Mark; 2],

    /// Number of automated agents (0, 1 or 2).
    agents: u8,

    /// Seed for agent tie-breaks; random when absent.
    seed: Option<u64>,

    /// Pacing delay before each agent move, in milliseconds.
    delay_ms: u64,
}

impl Default for TableConfig {
    fn default() -> Self {
        let grid = GridConfig::default();
        Self {
            size: grid.size,
            first_turn: grid.first_turn,
            marks: grid.marks,
            agents: 1,
            seed: None,
            delay_ms: 400,
        }
    }
}

impl TableConfig {
    /// Loads configuration from a TOML file. Missing keys take defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        info!(size = config.size, agents = config.agents, "Config loaded");
        Ok(config)
    }

    /// Sets the board size.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Sets the starting turn.
    pub fn with_first_turn(mut self, first_turn: usize) -> Self {
        self.first_turn = first_turn;
        self
    }

    /// Sets the marks in turn order.
    pub fn with_marks(mut self, marks: [Mark; 2]) -> Self {
        self.marks = marks;
        self
    }

    /// Sets the number of agents.
    pub fn with_agents(mut self, agents: u8) -> Self {
        self.agents = agents;
        self
    }

    /// Sets the tie-break seed.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the pacing delay.
    pub fn with_delay_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Grid portion of the configuration.
    pub fn grid(&self) -> GridConfig {
        GridConfig {
            size: self.size,
            first_turn: self.first_turn,
            marks: self.marks,
        }
    }
}

/// An agent seated at a table.
#[derive(Debug, Clone)]
pub struct Seat {
    mark: Mark,
    intel: SharedIntel,
}

impl Seat {
    /// Mark the agent plays.
    pub fn mark(&self) -> Mark {
        self.mark
    }

    /// The agent.
    pub fn intel(&self) -> &SharedIntel {
        &self.intel
    }
}

/// A grid with its automated agents and their pending moves.
#[derive(Debug)]
pub struct Table {
    config: TableConfig,
    grid: Grid,
    seats: Vec<Seat>,
    agenda: Agenda,
}

impl Table {
    /// Builds the grid and seats agents on the last `agents` marks.
    ///
    /// With one agent it plays `marks[1]`; with two, both marks.
    #[instrument]
    pub fn new(config: TableConfig) -> Result<Self, PlayError> {
        if config.agents > 2 {
            return Err(PlayError::TooManyAgents(config.agents));
        }
        let mut grid = Grid::new(config.grid())?;
        let agenda = Agenda::new();

        let seated = &config.marks[2 - config.agents as usize..];
        let mut seats = Vec::with_capacity(seated.len());
        for (i, &mark) in seated.iter().enumerate() {
            let opponent = mark.opponent();
            let intel = match config.seed {
                Some(seed) => Intel::with_seed(mark, opponent, seed.wrapping_add(i as u64))?,
                None => Intel::new(mark, opponent)?,
            };
            let intel = Rc::new(RefCell::new(intel));
            autoplay::auto_play(Rc::clone(&intel), &mut grid, &agenda);
            seats.push(Seat { mark, intel });
        }

        info!(size = config.size, agents = seats.len(), "Table ready");
        Ok(Self {
            config,
            grid,
            seats,
            agenda,
        })
    }

    /// The configuration the table was built from.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// The grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable grid access, for subscribing observers.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Seated agents.
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    /// The agent playing `mark`, if any.
    pub fn agent(&self, mark: Mark) -> Option<&SharedIntel> {
        self.seats
            .iter()
            .find(|seat| seat.mark == mark)
            .map(Seat::intel)
    }

    /// Returns true if an agent plays `mark`.
    pub fn is_agent(&self, mark: Mark) -> bool {
        self.agent(mark).is_some()
    }

    /// Returns true if a human owns the current turn of a live game.
    pub fn awaits_human(&self) -> bool {
        self.grid.status().is_live() && !self.is_agent(self.grid.turn_mark())
    }

    /// Pending agent moves.
    pub fn agenda(&self) -> &Agenda {
        &self.agenda
    }

    /// Plays a human move for the current turn's mark.
    #[instrument(skip(self))]
    pub fn play(&mut self, position: usize) -> Result<Status, PlayError> {
        let mark = self.grid.turn_mark();
        if self.grid.status().is_live() && self.is_agent(mark) {
            warn!(%mark, "Human move attempted on agent's turn");
            return Err(PlayError::NotHumanTurn(mark));
        }
        Ok(self.grid.mark(position, mark)?)
    }

    /// Runs the next pending agent move, if any is still valid.
    #[instrument(skip(self))]
    pub fn step(&mut self) -> Result<Option<Status>, PlayError> {
        self.agenda.run_next(&mut self.grid)
    }

    /// Runs agent moves until none are pending.
    #[instrument(skip(self))]
    pub fn settle(&mut self) -> Result<Vec<Status>, PlayError> {
        self.agenda.drain(&mut self.grid)
    }

    /// Starts a new game on the same board.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.agenda.clear();
        self.grid.reset();
    }

    /// Starts a new game on a board of a different size.
    #[instrument(skip(self))]
    pub fn resize(&mut self, size: usize) -> Result<(), PlayError> {
        self.config.clone().with_size(size).grid().validate()?;
        self.agenda.clear();
        self.grid.resize(size)?;
        self.config.size = size;
        Ok(())
    }
}
