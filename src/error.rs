use thiserror::Error;

/// Failures raised while building a maze or placing entities on it.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("maze template must be at least 3x3, got {rows}x{cols}")]
    TooSmall { rows: usize, cols: usize },

    #[error("maze row {row} has width {found}, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown legend character {ch:?} at row {row}, column {col}")]
    Legend { row: usize, col: usize, ch: char },

    #[error("power pellet corner at row {row}, column {col} is a wall")]
    WalledCorner { row: usize, col: usize },

    #[error("{what} spawn at row {row}, column {col} is not a passable tile")]
    BlockedSpawn {
        what: &'static str,
        row: i32,
        col: i32,
    },
}

pub type GameResult<T> = Result<T, GameError>;
