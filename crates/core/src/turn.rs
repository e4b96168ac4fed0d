//! Turn coordinator - arbitrates card selections into turns
//!
//! Phases follow the number of pending (revealed, unresolved) cards:
//!
//! | Phase | Pending | Locked |
//! |-------|---------|--------|
//! | `Idle` | 0 | no |
//! | `OneRevealed` | 1 | no |
//! | `Resolving` | 2 | yes |
//!
//! The second reveal registers a move, locks the turn and arms the resolution timer
//! (`flip_duration_ms + match_delay_ms`). Time only advances through [`TurnCoordinator::tick`],
//! so a coordinator that is dropped or cancelled can never resolve a stale turn.

use arrayvec::ArrayVec;
use tracing::{debug, warn};

use crate::board;
use crate::card::Card;
use crate::error::{GameError, Result};
use crate::scoring::{ScoreEngine, ScoreRules, ScoreState};
use crate::snapshot::GameSnapshot;
use crate::types::{
    CardId, GameEvent, GridSize, PairKey, COMPLETE_DELAY_MS, FLIP_DURATION_MS, MATCH_DELAY_MS,
};

/// Delays used by the coordinator, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnTiming {
    pub flip_duration_ms: u32,
    pub match_delay_ms: u32,
    pub complete_delay_ms: u32,
}

impl TurnTiming {
    /// Delay between the second reveal and resolution.
    pub fn resolution_delay_ms(&self) -> u32 {
        self.flip_duration_ms.saturating_add(self.match_delay_ms)
    }
}

impl Default for TurnTiming {
    fn default() -> Self {
        Self {
            flip_duration_ms: FLIP_DURATION_MS,
            match_delay_ms: MATCH_DELAY_MS,
            complete_delay_ms: COMPLETE_DELAY_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnPhase {
    Idle,
    OneRevealed,
    Resolving,
}

impl TurnPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnPhase::Idle => "idle",
            TurnPhase::OneRevealed => "oneRevealed",
            TurnPhase::Resolving => "resolving",
        }
    }
}

/// Cards revealed in the current turn. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnState {
    pending: ArrayVec<CardId, 2>,
    locked: bool,
}

impl TurnState {
    pub fn pending(&self) -> &[CardId] {
        &self.pending
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn phase(&self) -> TurnPhase {
        match self.pending.len() {
            0 => TurnPhase::Idle,
            1 => TurnPhase::OneRevealed,
            _ => TurnPhase::Resolving,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TurnCoordinator {
    grid: GridSize,
    cards: Vec<Card>,
    score: ScoreEngine,
    turn: TurnState,
    timing: TurnTiming,
    /// Monotonic id of the game this coordinator drives (assigned by the owner).
    episode_id: u32,
    resolution_timer_ms: Option<u32>,
    completion_timer_ms: Option<u32>,
    completed: bool,
    events: Vec<GameEvent>,
}

impl TurnCoordinator {
    /// Start a fresh game over an already dealt board.
    pub fn new(
        grid: GridSize,
        keys: &[PairKey],
        rules: ScoreRules,
        timing: TurnTiming,
    ) -> Result<Self> {
        board::validate_grid(grid)?;
        if keys.len() != grid.cell_count() {
            return Err(GameError::InvalidGridSize {
                width: grid.width,
                height: grid.height,
            });
        }
        debug_assert!(board::is_paired(keys));

        let cards = keys
            .iter()
            .enumerate()
            .map(|(id, &key)| Card::new(id as CardId, key))
            .collect();

        Ok(Self {
            grid,
            cards,
            score: ScoreEngine::new(rules),
            turn: TurnState::default(),
            timing,
            episode_id: 0,
            resolution_timer_ms: None,
            completion_timer_ms: None,
            completed: false,
            events: Vec::new(),
        })
    }

    /// Resume from a snapshot.
    ///
    /// Cards saved face up mid-turn come back Hidden and the turn starts empty and unlocked.
    /// A finished board comes back finished: `GameComplete` already fired for that game
    /// and is not emitted again.
    pub fn from_snapshot(
        snapshot: &GameSnapshot,
        rules: ScoreRules,
        timing: TurnTiming,
    ) -> Result<Self> {
        snapshot.validate()?;

        let keys = board::reconstruct(&snapshot.cards);
        let mut coordinator = Self::new(snapshot.grid_size, &keys, rules, timing)?;
        coordinator.cards = snapshot.cards.iter().map(Card::restore).collect();
        coordinator.score = ScoreEngine::with_state(rules, snapshot.score);
        coordinator.completed = coordinator.score.is_complete(coordinator.total_pairs());
        Ok(coordinator)
    }

    pub fn with_episode(mut self, episode_id: u32) -> Self {
        self.episode_id = episode_id;
        self
    }

    /// Single entry point for player input.
    ///
    /// Returns whether the selection was admitted. Rejected selections change nothing.
    pub fn handle_card_selected(&mut self, card_id: CardId) -> bool {
        if self.turn.locked {
            debug!(card_id, "selection ignored: turn is resolving");
            return false;
        }
        let flip_ms = self.timing.flip_duration_ms;
        let Some(card) = self.cards.get_mut(card_id as usize) else {
            debug!(card_id, "selection ignored: {}", GameError::UnknownCard(card_id));
            return false;
        };
        if !card.can_reveal() {
            debug!(card_id, state = card.state().as_str(), "selection ignored: card cannot be revealed");
            return false;
        }
        if let Err(e) = card.reveal(flip_ms) {
            debug!(card_id, error = %e, "selection ignored");
            return false;
        }

        self.turn.pending.push(card_id);
        self.events.push(GameEvent::CardRevealed { card_id });

        if self.turn.pending.is_full() {
            self.turn.locked = true;
            self.score.register_move();
            self.events.push(GameEvent::MoveRegistered {
                moves: self.score.state().moves,
            });
            self.resolution_timer_ms = Some(self.timing.resolution_delay_ms());
        }
        true
    }

    /// Advance time by `elapsed_ms`.
    pub fn tick(&mut self, elapsed_ms: u32) {
        for card in &mut self.cards {
            card.tick(elapsed_ms);
        }

        // Completion is checked before resolution so a freshly armed completion
        // timer waits out its full delay.
        if let Some(remaining) = self.completion_timer_ms {
            let remaining = remaining.saturating_sub(elapsed_ms);
            if remaining == 0 {
                self.completion_timer_ms = None;
                self.emit_complete();
            } else {
                self.completion_timer_ms = Some(remaining);
            }
        }

        if let Some(remaining) = self.resolution_timer_ms {
            let remaining = remaining.saturating_sub(elapsed_ms);
            if remaining == 0 {
                self.resolution_timer_ms = None;
                self.resolve();
            } else {
                self.resolution_timer_ms = Some(remaining);
            }
        }
    }

    /// Drop any scheduled resolution or completion. Returns whether anything was pending.
    pub fn cancel_pending(&mut self) -> bool {
        let had_pending = self.resolution_timer_ms.is_some() || self.completion_timer_ms.is_some();
        self.resolution_timer_ms = None;
        self.completion_timer_ms = None;
        had_pending
    }

    /// Take the events emitted since the last drain, in order.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn resolve(&mut self) {
        let &[first, second] = self.turn.pending.as_slice() else {
            warn!(
                pending = self.turn.pending.len(),
                "resolution fired without two pending cards"
            );
            self.clear_turn();
            return;
        };
        let (first, second) = (first as usize, second as usize);

        let pair_key = self.cards[first].pair_key();
        if pair_key == self.cards[second].pair_key() {
            for idx in [first, second] {
                let card = &mut self.cards[idx];
                match card.mark_matched() {
                    Ok(()) => self.events.push(GameEvent::CardMatched { card_id: card.id() }),
                    Err(e) => warn!(error = %e, "match resolution skipped a card"),
                }
            }
            self.score.register_match();
            let state = self.score.state();
            self.events.push(GameEvent::MatchFound {
                pair_key,
                score: state.score,
                combo: state.combo_multiplier,
            });
            if self.score.is_complete(self.total_pairs()) && !self.completed {
                self.completion_timer_ms = Some(self.timing.complete_delay_ms);
            }
        } else {
            let flip_ms = self.timing.flip_duration_ms;
            for idx in [first, second] {
                let card = &mut self.cards[idx];
                match card.hide(flip_ms) {
                    Ok(()) => self.events.push(GameEvent::CardHidden { card_id: card.id() }),
                    Err(e) => warn!(error = %e, "mismatch resolution skipped a card"),
                }
            }
            self.score.register_mismatch();
            self.events.push(GameEvent::MismatchFound);
        }

        self.clear_turn();
    }

    fn clear_turn(&mut self) {
        self.turn.pending.clear();
        self.turn.locked = false;
    }

    fn emit_complete(&mut self) {
        if self.completed {
            return;
        }
        self.completed = true;
        let state = self.score.state();
        self.events.push(GameEvent::GameComplete {
            final_score: state.score,
            final_moves: state.moves,
        });
    }

    pub fn phase(&self) -> TurnPhase {
        self.turn.phase()
    }

    pub fn turn(&self) -> &TurnState {
        &self.turn
    }

    /// Number of cards revealed in the current turn (0, 1 or 2).
    pub fn revealed_count(&self) -> usize {
        self.turn.pending.len()
    }

    pub fn is_locked(&self) -> bool {
        self.turn.locked
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, card_id: CardId) -> Option<&Card> {
        self.cards.get(card_id as usize)
    }

    pub fn score(&self) -> ScoreState {
        self.score.state()
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    pub fn timing(&self) -> TurnTiming {
        self.timing
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn total_pairs(&self) -> u32 {
        self.grid.total_pairs()
    }

    /// All pairs matched (the completion signal may still be pending).
    pub fn is_complete(&self) -> bool {
        self.score.is_complete(self.total_pairs())
    }

    /// Whether `GameComplete` has been emitted.
    pub fn completion_emitted(&self) -> bool {
        self.completed
    }

    pub fn has_pending_resolution(&self) -> bool {
        self.resolution_timer_ms.is_some()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(self.grid, &self.cards, self.score.state())
    }
}
