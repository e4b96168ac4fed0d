//! Scoring module - move counter, combo multiplier and match points
//!
//! Rules:
//! - Every completed turn (second card revealed) is one move.
//! - A match raises the combo multiplier by one (minimum 1) and scores
//!   `base_points + combo_increment * (combo - 1)`.
//! - A mismatch resets the combo multiplier to 0. Score never decreases.

use serde::{Deserialize, Serialize};

use crate::types::{BASE_MATCH_POINTS, COMBO_INCREMENT};

/// Running score of one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ScoreState {
    pub score: u32,
    pub moves: u32,
    pub matched_pairs: u32,
    pub combo_multiplier: u32,
}

/// Point values for matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreRules {
    pub base_points: u32,
    pub combo_increment: u32,
}

impl Default for ScoreRules {
    fn default() -> Self {
        Self {
            base_points: BASE_MATCH_POINTS,
            combo_increment: COMBO_INCREMENT,
        }
    }
}

/// Points for a match made at `combo` (the multiplier after the match).
pub fn calculate_match_points(rules: ScoreRules, combo: u32) -> u32 {
    let bonus_steps = combo.saturating_sub(1);
    rules
        .base_points
        .saturating_add(rules.combo_increment.saturating_mul(bonus_steps))
}

/// Pure reducer over move/match/mismatch events.
#[derive(Debug, Clone, Default)]
pub struct ScoreEngine {
    state: ScoreState,
    rules: ScoreRules,
}

impl ScoreEngine {
    pub fn new(rules: ScoreRules) -> Self {
        Self {
            state: ScoreState::default(),
            rules,
        }
    }

    /// Resume from a saved score.
    pub fn with_state(rules: ScoreRules, state: ScoreState) -> Self {
        Self { state, rules }
    }

    pub fn state(&self) -> ScoreState {
        self.state
    }

    pub fn rules(&self) -> ScoreRules {
        self.rules
    }

    pub fn register_move(&mut self) {
        self.state.moves = self.state.moves.saturating_add(1);
    }

    /// Returns the points gained.
    pub fn register_match(&mut self) -> u32 {
        self.state.matched_pairs = self.state.matched_pairs.saturating_add(1);
        self.state.combo_multiplier = self.state.combo_multiplier.saturating_add(1).max(1);

        let points = calculate_match_points(self.rules, self.state.combo_multiplier);
        self.state.score = self.state.score.saturating_add(points);
        points
    }

    pub fn register_mismatch(&mut self) {
        self.state.combo_multiplier = 0;
    }

    pub fn is_complete(&self, total_pairs: u32) -> bool {
        self.state.matched_pairs == total_pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_points() {
        let rules = ScoreRules::default();
        assert_eq!(calculate_match_points(rules, 0), 100);
        assert_eq!(calculate_match_points(rules, 1), 100);
        assert_eq!(calculate_match_points(rules, 2), 150);
        assert_eq!(calculate_match_points(rules, 4), 250);
    }

    #[test]
    fn test_custom_rules() {
        let rules = ScoreRules {
            base_points: 10,
            combo_increment: 5,
        };
        assert_eq!(calculate_match_points(rules, 3), 20);
    }

    #[test]
    fn test_combo_chain() {
        let mut engine = ScoreEngine::default();
        assert_eq!(engine.register_match(), 100);
        assert_eq!(engine.register_match(), 150);
        assert_eq!(engine.register_match(), 200);

        let s = engine.state();
        assert_eq!(s.score, 450);
        assert_eq!(s.matched_pairs, 3);
        assert_eq!(s.combo_multiplier, 3);
    }

    #[test]
    fn test_mismatch_resets_combo_not_score() {
        let mut engine = ScoreEngine::default();
        engine.register_match();
        engine.register_match();
        engine.register_mismatch();
        assert_eq!(engine.state().combo_multiplier, 0);
        assert_eq!(engine.state().score, 250);

        assert_eq!(engine.register_match(), 100);
        assert_eq!(engine.state().combo_multiplier, 1);
    }

    #[test]
    fn test_moves_count_turns() {
        let mut engine = ScoreEngine::default();
        engine.register_move();
        engine.register_mismatch();
        engine.register_move();
        assert_eq!(engine.state().moves, 2);
    }

    #[test]
    fn test_is_complete() {
        let mut engine = ScoreEngine::default();
        assert!(!engine.is_complete(2));
        engine.register_match();
        assert!(!engine.is_complete(2));
        engine.register_match();
        assert!(engine.is_complete(2));
    }

    #[test]
    fn test_resume_from_state() {
        let saved = ScoreState {
            score: 250,
            moves: 5,
            matched_pairs: 2,
            combo_multiplier: 2,
        };
        let mut engine = ScoreEngine::with_state(ScoreRules::default(), saved);
        assert_eq!(engine.register_match(), 200);
        assert_eq!(engine.state().score, 450);
    }
}
