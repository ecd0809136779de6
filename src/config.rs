use std::time::Duration;

use crate::grid::{Direction, Grid};

pub const WINDOW_WIDTH: u32 = 600;
pub const WINDOW_HEIGHT: u32 = 400;
pub const CELL_SIZE: u32 = 20;

pub const INITIAL_SNAKE_LENGTH: usize = 3;
pub const INITIAL_DIRECTION: Direction = Direction::Right;

const STEPS_PER_SECOND: u64 = 10;
const FRAME_INTERVAL_MS: u64 = 16;

/// Random probes before food placement falls back to a full scan.
pub const RANDOM_PLACEMENT_ATTEMPTS: usize = 20;

/// Everything a round needs to start, fixed at compile time.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub grid: Grid,
    pub initial_length: usize,
    pub initial_direction: Direction,
    /// Time between two simulation steps.
    pub step_interval: Duration,
    /// Upper bound on how long the loop waits for input before redrawing.
    pub frame_interval: Duration,
    pub food_attempts: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            grid: Grid::from_window(WINDOW_WIDTH, WINDOW_HEIGHT, CELL_SIZE),
            initial_length: INITIAL_SNAKE_LENGTH,
            initial_direction: INITIAL_DIRECTION,
            step_interval: Duration::from_millis(1000 / STEPS_PER_SECOND),
            frame_interval: Duration::from_millis(FRAME_INTERVAL_MS),
            food_attempts: RANDOM_PLACEMENT_ATTEMPTS,
        }
    }
}

impl GameConfig {
    /// Same rules on a different board.
    #[cfg(test)]
    pub fn with_grid(grid: Grid) -> Self {
        GameConfig { grid, ..Default::default() }
    }
}
