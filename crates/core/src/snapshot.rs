//! Snapshot module - the persisted shape of a game
//!
//! A [`GameSnapshot`] is the grid, every card (index = board position) and the score.
//! On the wire it is one flat camelCase JSON object:
//!
//! ```text
//! {"gridWidth":2,"gridHeight":2,"score":100,"moves":1,"matchedPairs":1,"comboMultiplier":1,
//!  "cards":[{"id":0,"pairKey":0,"visualState":"Matched"},...]}
//! ```
//!
//! Decoding either yields a snapshot that passes [`GameSnapshot::validate`] or fails with
//! [`GameError::MalformedSnapshot`]; there is no partial recovery.

use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::error::{GameError, Result};
use crate::scoring::ScoreState;
use crate::types::{CardId, CardVisualState, GridSize, PairKey, MAX_GRID_CELLS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardRecord {
    pub id: CardId,
    pub pair_key: PairKey,
    pub visual_state: CardVisualState,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub grid_size: GridSize,
    pub cards: Vec<CardRecord>,
    pub score: ScoreState,
}

impl GameSnapshot {
    /// Project live game state into a snapshot. No I/O.
    pub fn capture(grid_size: GridSize, cards: &[Card], score: ScoreState) -> Self {
        Self {
            grid_size,
            cards: cards.iter().map(Card::record).collect(),
            score,
        }
    }

    pub fn total_pairs(&self) -> u32 {
        self.grid_size.total_pairs()
    }

    /// Structural checks applied to every decoded snapshot.
    pub fn validate(&self) -> Result<()> {
        let grid = self.grid_size;
        if !grid.is_valid() {
            return Err(malformed(format!(
                "grid {}x{} must be positive, even and at most {} cells",
                grid.width, grid.height, MAX_GRID_CELLS
            )));
        }
        if self.cards.len() != grid.cell_count() {
            return Err(malformed(format!(
                "expected {} cards for a {}x{} grid, found {}",
                grid.cell_count(),
                grid.width,
                grid.height,
                self.cards.len()
            )));
        }
        if let Some((pos, card)) = self
            .cards
            .iter()
            .enumerate()
            .find(|(pos, c)| c.id as usize != *pos)
        {
            return Err(malformed(format!("card at position {} has id {}", pos, card.id)));
        }

        let mut by_key: Vec<&CardRecord> = self.cards.iter().collect();
        by_key.sort_by_key(|c| c.pair_key);
        let mut matched_pairs = 0u32;
        for (i, pair) in by_key.chunks(2).enumerate() {
            let [a, b] = pair else {
                return Err(malformed(format!(
                    "pair key {} appears only once",
                    pair[0].pair_key
                )));
            };
            if a.pair_key != b.pair_key {
                return Err(malformed(format!(
                    "pair key {} appears only once",
                    a.pair_key
                )));
            }
            if let Some(next) = by_key.get(2 * i + 2) {
                if next.pair_key == a.pair_key {
                    return Err(malformed(format!(
                        "pair key {} appears more than twice",
                        a.pair_key
                    )));
                }
            }
            let a_matched = a.visual_state == CardVisualState::Matched;
            let b_matched = b.visual_state == CardVisualState::Matched;
            if a_matched != b_matched {
                return Err(malformed(format!(
                    "pair key {} is matched on only one card",
                    a.pair_key
                )));
            }
            if a_matched {
                matched_pairs += 1;
            }
        }

        if self.score.matched_pairs != matched_pairs {
            return Err(malformed(format!(
                "matchedPairs is {} but the board shows {}",
                self.score.matched_pairs, matched_pairs
            )));
        }
        Ok(())
    }
}

fn malformed(message: String) -> GameError {
    GameError::MalformedSnapshot(message)
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CardEntry {
    id: CardId,
    pair_key: PairKey,
    visual_state: CardVisualState,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveData {
    grid_width: u32,
    grid_height: u32,
    score: u32,
    moves: u32,
    matched_pairs: u32,
    combo_multiplier: u32,
    cards: Vec<CardEntry>,
}

impl From<&GameSnapshot> for SaveData {
    fn from(s: &GameSnapshot) -> Self {
        Self {
            grid_width: s.grid_size.width,
            grid_height: s.grid_size.height,
            score: s.score.score,
            moves: s.score.moves,
            matched_pairs: s.score.matched_pairs,
            combo_multiplier: s.score.combo_multiplier,
            cards: s
                .cards
                .iter()
                .map(|c| CardEntry {
                    id: c.id,
                    pair_key: c.pair_key,
                    visual_state: c.visual_state,
                })
                .collect(),
        }
    }
}

impl From<SaveData> for GameSnapshot {
    fn from(d: SaveData) -> Self {
        Self {
            grid_size: GridSize::new(d.grid_width, d.grid_height),
            cards: d
                .cards
                .into_iter()
                .map(|c| CardRecord {
                    id: c.id,
                    pair_key: c.pair_key,
                    visual_state: c.visual_state,
                })
                .collect(),
            score: ScoreState {
                score: d.score,
                moves: d.moves,
                matched_pairs: d.matched_pairs,
                combo_multiplier: d.combo_multiplier,
            },
        }
    }
}

/// Encode a snapshot as JSON text.
pub fn serialize(snapshot: &GameSnapshot) -> Result<String> {
    serde_json::to_string(&SaveData::from(snapshot)).map_err(|e| GameError::Encode(e.to_string()))
}

/// Decode and validate JSON text.
pub fn deserialize(text: &str) -> Result<GameSnapshot> {
    let data: SaveData = serde_json::from_str(text).map_err(|e| malformed(e.to_string()))?;
    let snapshot = GameSnapshot::from(data);
    snapshot.validate()?;
    Ok(snapshot)
}
