//! Game session - owns the current game and its lifecycle
//!
//! A session holds at most one [`TurnCoordinator`]. Starting a new game or restoring a
//! snapshot replaces it wholesale: the old board, its pending resolution and any events it
//! had not yet handed out are dropped, and the episode id moves forward so hosts can tell
//! games apart.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::board;
use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::rng::Shuffler;
use crate::scoring::ScoreState;
use crate::snapshot::GameSnapshot;
use crate::store::{GameStateStore, SaveSlot};
use crate::turn::TurnCoordinator;
use crate::types::{CardId, CardVisualState, GameEvent, GridSize, PairKey};

/// One card as a host may see it. The pair key stays hidden while the card is face down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub id: CardId,
    pub col: u32,
    pub row: u32,
    pub state: CardVisualState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pair_key: Option<PairKey>,
}

/// Read-only projection of the running game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Observation {
    pub episode_id: u32,
    pub grid: GridSize,
    pub cards: Vec<CardView>,
    pub score: ScoreState,
    pub total_pairs: u32,
    pub phase: &'static str,
    pub revealed: usize,
    pub locked: bool,
    pub complete: bool,
}

#[derive(Debug, Default)]
pub struct GameSession {
    config: GameConfig,
    episode_id: u32,
    game: Option<TurnCoordinator>,
}

impl GameSession {
    /// A session with no game yet.
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            episode_id: 0,
            game: None,
        }
    }

    /// Resume the saved game, or start a fresh one if there is none or it is unusable.
    pub fn load_or_new<S: SaveSlot>(config: GameConfig, store: &GameStateStore<S>) -> Result<Self> {
        let mut session = Self::new(config);
        match session.load(store) {
            Ok(true) => return Ok(session),
            Ok(false) => debug!("no saved game, starting fresh"),
            Err(e) => warn!(error = %e, "saved game unusable, starting fresh"),
        }
        let grid = session.config.grid();
        session.new_game(grid)?;
        Ok(session)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn game(&self) -> Option<&TurnCoordinator> {
        self.game.as_ref()
    }

    /// Deal a new board using the configured shuffle.
    pub fn new_game(&mut self, grid: GridSize) -> Result<()> {
        let mut shuffler = self.config.shuffler();
        self.new_game_with(grid, shuffler.as_mut())
    }

    /// Deal a new board with an explicit shuffler.
    ///
    /// An invalid grid is rejected before the running game is touched.
    pub fn new_game_with(&mut self, grid: GridSize, shuffler: &mut dyn Shuffler) -> Result<()> {
        let keys = board::generate(grid, shuffler)?;
        let game = TurnCoordinator::new(grid, &keys, self.config.score_rules(), self.config.timing())?;
        self.replace(game);
        info!(
            episode_id = self.episode_id,
            width = grid.width,
            height = grid.height,
            "new game"
        );
        Ok(())
    }

    /// Replace the running game with one rebuilt from `snapshot`.
    pub fn restore(&mut self, snapshot: &GameSnapshot) -> Result<()> {
        let game = TurnCoordinator::from_snapshot(
            snapshot,
            self.config.score_rules(),
            self.config.timing(),
        )?;
        self.replace(game);
        info!(
            episode_id = self.episode_id,
            matched_pairs = snapshot.score.matched_pairs,
            total_pairs = snapshot.total_pairs(),
            "game restored"
        );
        Ok(())
    }

    fn replace(&mut self, game: TurnCoordinator) {
        if let Some(mut old) = self.game.take() {
            if old.cancel_pending() {
                debug!(episode_id = self.episode_id, "cancelled pending resolution");
            }
            let dropped = old.drain_events().len();
            if dropped > 0 {
                debug!(episode_id = self.episode_id, dropped, "discarded undelivered events");
            }
        }
        self.episode_id = self.episode_id.wrapping_add(1);
        self.game = Some(game.with_episode(self.episode_id));
    }

    pub fn snapshot(&self) -> Result<GameSnapshot> {
        self.active().map(TurnCoordinator::snapshot)
    }

    /// Forward a card selection. `Ok(false)` when the selection was ignored.
    pub fn select_card(&mut self, card_id: CardId) -> Result<bool> {
        Ok(self.active_mut()?.handle_card_selected(card_id))
    }

    pub fn tick(&mut self, elapsed_ms: u32) {
        if let Some(game) = self.game.as_mut() {
            game.tick(elapsed_ms);
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        let events = self
            .game
            .as_mut()
            .map(TurnCoordinator::drain_events)
            .unwrap_or_default();
        if events
            .iter()
            .any(|e| matches!(e, GameEvent::GameComplete { .. }))
        {
            let score = self.game.as_ref().map(TurnCoordinator::score);
            info!(episode_id = self.episode_id, ?score, "game complete");
        }
        events
    }

    pub fn save<S: SaveSlot>(&self, store: &mut GameStateStore<S>) -> Result<()> {
        let snapshot = self.snapshot()?;
        store.save(&snapshot)?;
        info!(
            episode_id = self.episode_id,
            key = store.key(),
            moves = snapshot.score.moves,
            "game saved"
        );
        Ok(())
    }

    /// Restore from the store. `Ok(false)` when nothing is saved.
    pub fn load<S: SaveSlot>(&mut self, store: &GameStateStore<S>) -> Result<bool> {
        match store.load()? {
            Some(snapshot) => {
                self.restore(&snapshot)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.game.as_ref().is_some_and(TurnCoordinator::is_complete)
    }

    pub fn observation(&self) -> Option<Observation> {
        let game = self.game.as_ref()?;
        let grid = game.grid();
        let cards = game
            .cards()
            .iter()
            .map(|card| {
                let (col, row) = grid.position(card.id());
                CardView {
                    id: card.id(),
                    col,
                    row,
                    state: card.state(),
                    pair_key: card.state().is_face_up().then(|| card.pair_key()),
                }
            })
            .collect();
        Some(Observation {
            episode_id: self.episode_id,
            grid,
            cards,
            score: game.score(),
            total_pairs: game.total_pairs(),
            phase: game.phase().as_str(),
            revealed: game.revealed_count(),
            locked: game.is_locked(),
            complete: game.is_complete(),
        })
    }

    fn active(&self) -> Result<&TurnCoordinator> {
        self.game.as_ref().ok_or(GameError::NoActiveGame)
    }

    fn active_mut(&mut self) -> Result<&mut TurnCoordinator> {
        self.game.as_mut().ok_or(GameError::NoActiveGame)
    }
}
