//! Card module - one cell's state machine
//!
//! `Hidden -> Flipped -> Matched`, with `Flipped -> Hidden` on a mismatch. Every flip
//! arms a short timer standing in for the flip animation; a card cannot be revealed
//! again until that timer has run out.

use crate::error::{GameError, Result};
use crate::snapshot::CardRecord;
use crate::types::{CardId, CardVisualState, PairKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    id: CardId,
    pair_key: PairKey,
    state: CardVisualState,
    flip_timer_ms: u32,
}

impl Card {
    pub fn new(id: CardId, pair_key: PairKey) -> Self {
        Self {
            id,
            pair_key,
            state: CardVisualState::Hidden,
            flip_timer_ms: 0,
        }
    }

    /// Rebuild a card from a saved record.
    ///
    /// A card saved mid-turn comes back face down: turns in flight are never restored.
    pub fn restore(record: &CardRecord) -> Self {
        let state = match record.visual_state {
            CardVisualState::Matched => CardVisualState::Matched,
            CardVisualState::Hidden | CardVisualState::Flipped => CardVisualState::Hidden,
        };
        Self {
            id: record.id,
            pair_key: record.pair_key,
            state,
            flip_timer_ms: 0,
        }
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn pair_key(&self) -> PairKey {
        self.pair_key
    }

    pub fn state(&self) -> CardVisualState {
        self.state
    }

    pub fn is_flipping(&self) -> bool {
        self.flip_timer_ms > 0
    }

    pub fn can_reveal(&self) -> bool {
        self.state == CardVisualState::Hidden && !self.is_flipping()
    }

    /// Hidden -> Flipped.
    pub fn reveal(&mut self, flip_duration_ms: u32) -> Result<()> {
        if !self.can_reveal() {
            return Err(self.illegal("reveal"));
        }
        self.state = CardVisualState::Flipped;
        self.flip_timer_ms = flip_duration_ms;
        Ok(())
    }

    /// Flipped -> Hidden.
    pub fn hide(&mut self, flip_duration_ms: u32) -> Result<()> {
        if self.state != CardVisualState::Flipped {
            return Err(self.illegal("hide"));
        }
        self.state = CardVisualState::Hidden;
        self.flip_timer_ms = flip_duration_ms;
        Ok(())
    }

    /// Flipped -> Matched. Terminal.
    pub fn mark_matched(&mut self) -> Result<()> {
        if self.state != CardVisualState::Flipped {
            return Err(self.illegal("match"));
        }
        self.state = CardVisualState::Matched;
        self.flip_timer_ms = 0;
        Ok(())
    }

    /// Advance the flip timer.
    pub fn tick(&mut self, elapsed_ms: u32) {
        self.flip_timer_ms = self.flip_timer_ms.saturating_sub(elapsed_ms);
    }

    pub fn record(&self) -> CardRecord {
        CardRecord {
            id: self.id,
            pair_key: self.pair_key,
            visual_state: self.state,
        }
    }

    fn illegal(&self, action: &'static str) -> GameError {
        GameError::IllegalTransition {
            card_id: self.id,
            from: self.state,
            action,
        }
    }
}
