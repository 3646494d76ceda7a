use std::time::Duration;

use thiserror::Error;

use crate::grid::{Cell, Grid};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid must be at least 1x1, got {cols}x{rows}")]
    EmptyGrid { cols: u16, rows: u16 },
    #[error("start cell ({col}, {row}) is outside the grid")]
    StartOutOfBounds { col: i32, row: i32 },
    #[error("initial food ({col}, {row}) is outside the grid")]
    FoodOutOfBounds { col: i32, row: i32 },
    #[error("initial food cannot share the start cell")]
    FoodOnStart,
    #[error("tick interval must be non-zero")]
    ZeroTickInterval,
    #[error("blink interval must be non-zero")]
    ZeroBlinkInterval,
}

/// Everything needed to build a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub grid: Grid,
    /// Where the single-cell snake starts after every reset.
    pub start: Cell,
    /// Food placement after every reset.
    pub initial_food: Cell,
    /// Simulation cadence used by the host scheduler.
    pub tick_interval: Duration,
    /// Food blink cadence; purely presentational.
    pub blink_interval: Duration,
    /// Seed for food placement. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            grid: Grid::new(30, 20),
            start: Cell::new(5, 5),
            initial_food: Cell::new(10, 10),
            tick_interval: Duration::from_millis(100),
            blink_interval: Duration::from_millis(500),
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn new(cols: u16, rows: u16) -> Self {
        GameConfig {
            grid: Grid::new(cols, rows),
            ..Default::default()
        }
    }

    pub fn with_start(mut self, start: Cell) -> Self {
        self.start = start;
        self
    }

    pub fn with_initial_food(mut self, food: Cell) -> Self {
        self.initial_food = food;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn with_blink_interval(mut self, interval: Duration) -> Self {
        self.blink_interval = interval;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let Grid { cols, rows } = self.grid;
        if cols == 0 || rows == 0 {
            return Err(ConfigError::EmptyGrid { cols, rows });
        }
        if !self.grid.in_bounds(self.start) {
            return Err(ConfigError::StartOutOfBounds {
                col: self.start.col,
                row: self.start.row,
            });
        }
        if !self.grid.in_bounds(self.initial_food) {
            return Err(ConfigError::FoodOutOfBounds {
                col: self.initial_food.col,
                row: self.initial_food.row,
            });
        }
        if self.initial_food == self.start {
            return Err(ConfigError::FoodOnStart);
        }
        if self.tick_interval.is_zero() {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.blink_interval.is_zero() {
            return Err(ConfigError::ZeroBlinkInterval);
        }
        Ok(())
    }
}
