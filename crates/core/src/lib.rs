//! Core game logic - pure, deterministic, and testable
//!
//! This crate holds the whole game-state core of a memory-matching ("pairs") game.
//! It has **no dependencies** on rendering, input devices or networking:
//!
//! - **Deterministic**: a seeded shuffle deals the same board every time
//! - **Clock-free**: time only advances through `tick(elapsed_ms)`
//! - **Portable**: any host (terminal, GUI, headless, socket client) drives it the same way
//!
//! # Module Structure
//!
//! - [`board`]: paired pair-key generation and reconstruction from a snapshot
//! - [`card`]: per-card `Hidden -> Flipped -> Matched` state machine with flip guard
//! - [`turn`]: the turn coordinator (admission gate, delayed resolution, completion)
//! - [`scoring`]: move counter, combo multiplier and match points
//! - [`snapshot`]: the persisted game shape and its JSON codec
//! - [`store`]: save/load/clear over a host-provided named slot
//! - [`session`]: one running game plus new-game/restore lifecycle
//! - [`config`]: options with defaults and `PAIRS_*` environment overrides
//! - [`rng`]: LCG and shuffle variants
//!
//! # Example
//!
//! ```
//! use memory_pairs_core::{GameConfig, GameSession, Identity};
//! use memory_pairs_core::types::{GameEvent, GridSize};
//!
//! let mut session = GameSession::new(GameConfig::default());
//! session.new_game_with(GridSize::new(2, 2), &mut Identity).unwrap();
//!
//! // Board is [0, 0, 1, 1]: cards 0 and 1 are a pair.
//! session.select_card(0).unwrap();
//! session.select_card(1).unwrap();
//! session.tick(1300);
//!
//! let events = session.drain_events();
//! assert!(events.contains(&GameEvent::MatchFound { pair_key: 0, score: 100, combo: 1 }));
//! ```

pub mod board;
pub mod card;
pub mod config;
pub mod error;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;
pub mod store;
pub mod turn;

pub use memory_pairs_types as types;

// Re-export commonly used types for convenience
pub use card::Card;
pub use config::GameConfig;
pub use error::{GameError, Result};
pub use rng::{Identity, Shuffler, SimpleRng, Unbiased};
pub use scoring::{calculate_match_points, ScoreEngine, ScoreRules, ScoreState};
pub use session::{CardView, GameSession, Observation};
pub use snapshot::{CardRecord, GameSnapshot};
pub use store::{FileSlot, GameStateStore, MemorySlot, SaveSlot, CURRENT_SAVE_KEY};
pub use turn::{TurnCoordinator, TurnPhase, TurnState, TurnTiming};
