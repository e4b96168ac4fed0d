//! Headless memory-pairs runner (default binary).
//!
//! Resumes the saved game (or deals a new one), serves it over the adapter socket and
//! advances it on a fixed timestep. Presentation lives in whatever client connects.

use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::info;

use memory_pairs::adapter::{Adapter, Dispatcher};
use memory_pairs::core::{FileSlot, GameConfig, GameSession, GameStateStore};
use memory_pairs::types::TICK_MS;

fn init_tracing() -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_env("PAIRS_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .try_init()?;

    Ok(())
}

fn main() -> Result<()> {
    init_tracing()?;

    let config = GameConfig::from_env();
    let save_dir = std::env::var("PAIRS_SAVE_DIR").unwrap_or_else(|_| "./saves".to_string());
    let mut store = GameStateStore::new(FileSlot::new(&save_dir));
    let mut session = GameSession::load_or_new(config, &store)?;
    info!(save_dir = %save_dir, episode_id = session.episode_id(), "session ready");

    let Some(mut adapter) = Adapter::start_from_env()? else {
        info!(observation = ?session.observation(), "adapter disabled, exiting");
        return Ok(());
    };

    let mut dispatcher = Dispatcher::new();
    let tick_duration = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();

    loop {
        let episode_before = session.episode_id();
        while let Some(inbound) = adapter.try_recv() {
            for msg in dispatcher.handle(&mut session, &mut store, inbound) {
                adapter.send(msg);
            }
        }
        if session.episode_id() != episode_before {
            if let Some(msg) = dispatcher.broadcast_observation(&session) {
                adapter.send(msg);
            }
        }

        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            session.tick(TICK_MS);
        }

        for msg in dispatcher.flush_events(&mut session) {
            adapter.send(msg);
        }

        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or_default();
        thread::sleep(timeout.min(Duration::from_millis(2)));
    }
}
