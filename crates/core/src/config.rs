//! Game configuration
//!
//! Every option has a default; `from_env` overrides them from `PAIRS_*` variables and
//! silently keeps the default for anything missing or unparsable.

use crate::rng::{Shuffler, SimpleRng, Unbiased};
use crate::scoring::ScoreRules;
use crate::turn::TurnTiming;
use crate::types::{
    GridSize, BASE_MATCH_POINTS, COMBO_INCREMENT, COMPLETE_DELAY_MS, DEFAULT_GRID_HEIGHT,
    DEFAULT_GRID_WIDTH, FLIP_DURATION_MS, MATCH_DELAY_MS,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub grid_width: u32,
    pub grid_height: u32,
    pub base_points: u32,
    pub combo_increment: u32,
    pub flip_duration_ms: u32,
    pub match_delay_ms: u32,
    pub complete_delay_ms: u32,
    /// Fixed board seed. `None` seeds every new board from the clock.
    pub seed: Option<u32>,
    /// Use the uniform `[0, i]` shuffle instead of the full-range one.
    pub unbiased_shuffle: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: DEFAULT_GRID_WIDTH,
            grid_height: DEFAULT_GRID_HEIGHT,
            base_points: BASE_MATCH_POINTS,
            combo_increment: COMBO_INCREMENT,
            flip_duration_ms: FLIP_DURATION_MS,
            match_delay_ms: MATCH_DELAY_MS,
            complete_delay_ms: COMPLETE_DELAY_MS,
            seed: None,
            unbiased_shuffle: false,
        }
    }
}

impl GameConfig {
    /// Create from `PAIRS_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let num = |key: &str, default: u32| -> u32 {
            lookup(key)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(default)
        };

        Self {
            grid_width: num("PAIRS_GRID_WIDTH", defaults.grid_width),
            grid_height: num("PAIRS_GRID_HEIGHT", defaults.grid_height),
            base_points: num("PAIRS_BASE_POINTS", defaults.base_points),
            combo_increment: num("PAIRS_COMBO_INCREMENT", defaults.combo_increment),
            flip_duration_ms: num("PAIRS_FLIP_MS", defaults.flip_duration_ms),
            match_delay_ms: num("PAIRS_MATCH_DELAY_MS", defaults.match_delay_ms),
            complete_delay_ms: num("PAIRS_COMPLETE_DELAY_MS", defaults.complete_delay_ms),
            seed: lookup("PAIRS_SEED").and_then(|s| s.trim().parse().ok()),
            unbiased_shuffle: lookup("PAIRS_UNBIASED_SHUFFLE")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.unbiased_shuffle),
        }
    }

    pub fn grid(&self) -> GridSize {
        GridSize::new(self.grid_width, self.grid_height)
    }

    pub fn score_rules(&self) -> ScoreRules {
        ScoreRules {
            base_points: self.base_points,
            combo_increment: self.combo_increment,
        }
    }

    pub fn timing(&self) -> TurnTiming {
        TurnTiming {
            flip_duration_ms: self.flip_duration_ms,
            match_delay_ms: self.match_delay_ms,
            complete_delay_ms: self.complete_delay_ms,
        }
    }

    /// Shuffler for the next board.
    pub fn shuffler(&self) -> Box<dyn Shuffler> {
        let rng = match self.seed {
            Some(seed) => SimpleRng::new(seed),
            None => SimpleRng::from_entropy(),
        };
        if self.unbiased_shuffle {
            Box::new(Unbiased(rng))
        } else {
            Box::new(rng)
        }
    }
}
