//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are plain data with no game logic attached, so they are usable in
//! any context (core state machines, host presentation layers, the adapter protocol).
//!
//! # Board
//!
//! A board is a `width x height` grid of cards stored row-major. Card ids are the
//! positions `0..width*height`. Every pair key is carried by exactly two cards, so
//! `width * height` must be even, and at most [`MAX_GRID_CELLS`].
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `FLIP_DURATION_MS` | 300 | Card flip animation budget |
//! | `MATCH_DELAY_MS` | 1000 | Time both cards stay visible before resolution |
//! | `COMPLETE_DELAY_MS` | 1000 | Pause between the final match and `GameComplete` |
//!
//! A turn resolves `FLIP_DURATION_MS + MATCH_DELAY_MS` after its second card is revealed.
//!
//! # Examples
//!
//! ```
//! use memory_pairs_types::{CardVisualState, GridSize};
//!
//! let grid = GridSize::new(4, 3);
//! assert_eq!(grid.cell_count(), 12);
//! assert_eq!(grid.total_pairs(), 6);
//! assert!(grid.is_valid());
//! assert_eq!(grid.position(7), (3, 1));
//!
//! assert!(!GridSize::new(3, 3).is_valid());
//! assert!(!GridSize::new(u32::MAX, 2).is_valid());
//! assert!(CardVisualState::Matched.is_face_up());
//! ```

use serde::{Deserialize, Serialize};

/// Default grid width (4 columns)
pub const DEFAULT_GRID_WIDTH: u32 = 4;

/// Default grid height (4 rows)
pub const DEFAULT_GRID_HEIGHT: u32 = 4;

/// Largest board accepted, in cards.
pub const MAX_GRID_CELLS: usize = 1024;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Card flip animation budget.
pub const FLIP_DURATION_MS: u32 = 300;

/// Time both cards of a turn stay face up before the turn resolves.
pub const MATCH_DELAY_MS: u32 = 1000;

/// Pause between the final match and the completion signal.
pub const COMPLETE_DELAY_MS: u32 = 1000;

/// Points awarded for every match.
pub const BASE_MATCH_POINTS: u32 = 100;

/// Extra points per combo step beyond the first consecutive match.
pub const COMBO_INCREMENT: u32 = 50;

/// Position of a card on the board (row-major index).
pub type CardId = u32;

/// Identity shared by exactly two cards.
pub type PairKey = u32;


/// Board dimensions in cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    pub width: u32,
    pub height: u32,
}

impl GridSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of cells (cards) on the board.
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn total_pairs(&self) -> u32 {
        (self.cell_count() / 2) as u32
    }

    /// Both dimensions positive, an even number of cells and no more than [`MAX_GRID_CELLS`].
    pub fn is_valid(&self) -> bool {
        let cells = u64::from(self.width) * u64::from(self.height);
        cells > 0 && cells % 2 == 0 && cells <= MAX_GRID_CELLS as u64
    }

    /// Column and row of a card id.
    pub fn position(&self, id: CardId) -> (u32, u32) {
        (id % self.width, id / self.width)
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_WIDTH, DEFAULT_GRID_HEIGHT)
    }
}

/// Visual state of a single card.
///
/// - **Hidden**: face down (initial)
/// - **Flipped**: face up, part of the current turn
/// - **Matched**: face up and locked for the rest of the game (terminal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CardVisualState {
    #[default]
    Hidden,
    Flipped,
    Matched,
}

impl CardVisualState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardVisualState::Hidden => "hidden",
            CardVisualState::Flipped => "flipped",
            CardVisualState::Matched => "matched",
        }
    }

    /// Whether the card's face is visible.
    pub fn is_face_up(&self) -> bool {
        !matches!(self, CardVisualState::Hidden)
    }
}

/// Output events emitted by the core, in the order their transitions occurred.
///
/// Presentation and audio layers consume these; they never feed back into game logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GameEvent {
    /// A card went Hidden -> Flipped.
    CardRevealed { card_id: CardId },
    /// A card went Flipped -> Hidden after a mismatch.
    CardHidden { card_id: CardId },
    /// A card went Flipped -> Matched.
    CardMatched { card_id: CardId },
    /// The second card of a turn was revealed.
    MoveRegistered { moves: u32 },
    /// A turn resolved as a match.
    MatchFound {
        pair_key: PairKey,
        score: u32,
        combo: u32,
    },
    /// A turn resolved as a mismatch.
    MismatchFound,
    /// Every pair has been found. Fires once per game.
    GameComplete { final_score: u32, final_moves: u32 },
}

impl GameEvent {
    /// camelCase event name used by the adapter protocol.
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::CardRevealed { .. } => "cardRevealed",
            GameEvent::CardHidden { .. } => "cardHidden",
            GameEvent::CardMatched { .. } => "cardMatched",
            GameEvent::MoveRegistered { .. } => "moveRegistered",
            GameEvent::MatchFound { .. } => "matchFound",
            GameEvent::MismatchFound => "mismatchFound",
            GameEvent::GameComplete { .. } => "gameComplete",
        }
    }
}
