use thiserror::Error;

use crate::grid::Position;

/// Terminal outcomes of a simulation step. They end a round, they never abort the process.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SimError {
    #[error("snake hit the wall at {0}")]
    WallCollision(Position),

    #[error("snake ran into itself at {0}")]
    SelfCollision(Position),

    #[error("no free cell left for food")]
    BoardFull,
}

impl SimError {
    /// A full board means every cell is snake: the player won.
    pub fn is_win(&self) -> bool {
        matches!(self, SimError::BoardFull)
    }
}
