//! Save/restore over a named slot
//!
//! The store only encodes and decodes; where the bytes live is up to the host, which
//! implements [`SaveSlot`]. Two slots ship with the crate: [`MemorySlot`] for tests and
//! embedding, [`FileSlot`] for one-file-per-key persistence.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{GameError, Result};
use crate::snapshot::{self, GameSnapshot};

/// Key of the single "current save".
pub const CURRENT_SAVE_KEY: &str = "current-save";

/// Host-provided persistence medium.
pub trait SaveSlot {
    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<()>;
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>>;
    fn delete(&mut self, key: &str) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    entries: HashMap<String, Vec<u8>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveSlot for MemorySlot {
    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<()> {
        self.entries.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(GameError::Slot(format!("invalid slot key: {:?}", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl SaveSlot for FileSlot {
    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;
        // Write-then-rename so a crash never leaves a truncated save behind.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Encode/decode snapshots into one named slot.
#[derive(Debug, Clone)]
pub struct GameStateStore<S> {
    slot: S,
    key: String,
}

impl<S: SaveSlot> GameStateStore<S> {
    pub fn new(slot: S) -> Self {
        Self::with_key(slot, CURRENT_SAVE_KEY)
    }

    pub fn with_key(slot: S, key: impl Into<String>) -> Self {
        Self {
            slot,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    pub fn slot_mut(&mut self) -> &mut S {
        &mut self.slot
    }

    pub fn encode(snapshot: &GameSnapshot) -> Result<Vec<u8>> {
        snapshot::serialize(snapshot).map(String::into_bytes)
    }

    pub fn decode(bytes: &[u8]) -> Result<GameSnapshot> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| GameError::MalformedSnapshot(format!("save is not UTF-8: {}", e)))?;
        snapshot::deserialize(text)
    }

    pub fn save(&mut self, snapshot: &GameSnapshot) -> Result<()> {
        let bytes = Self::encode(snapshot)?;
        self.slot.write(&self.key, &bytes)?;
        debug!(key = %self.key, bytes = bytes.len(), "snapshot saved");
        Ok(())
    }

    /// `Ok(None)` when nothing is saved; `MalformedSnapshot` when the save is unusable.
    pub fn load(&self) -> Result<Option<GameSnapshot>> {
        let Some(bytes) = self.slot.read(&self.key)? else {
            return Ok(None);
        };
        match Self::decode(&bytes) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                warn!(key = %self.key, error = %e, "rejecting saved snapshot");
                Err(e)
            }
        }
    }

    pub fn has_save(&self) -> Result<bool> {
        Ok(self.slot.read(&self.key)?.is_some())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.slot.delete(&self.key)
    }
}
