//! Error types for the game-state core

use thiserror::Error;

use crate::types::{CardId, CardVisualState, MAX_GRID_CELLS};

#[derive(Error, Debug)]
pub enum GameError {
    /// Zero-sized, odd or oversized grid. Raised at new-game time; the running game is untouched.
    #[error(
        "Invalid grid size: {width}x{height} (cell count must be positive, even and at most {max})",
        max = MAX_GRID_CELLS
    )]
    InvalidGridSize { width: u32, height: u32 },

    /// A save could not be decoded into a consistent snapshot. Callers fall back to a new game.
    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(String),

    #[error("Illegal transition: cannot {action} card {card_id} while {from:?}")]
    IllegalTransition {
        card_id: CardId,
        from: CardVisualState,
        action: &'static str,
    },

    #[error("Unknown card: {0}")]
    UnknownCard(CardId),

    #[error("No game in progress")]
    NoActiveGame,

    #[error("Snapshot encoding failed: {0}")]
    Encode(String),

    #[error("Save slot error: {0}")]
    Slot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
