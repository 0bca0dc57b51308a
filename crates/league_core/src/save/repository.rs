//! Snapshot stores and the game repository on top of them.
//!
//! A store maps a game id to opaque snapshot bytes; [`GameRepository`] turns
//! games into snapshots and back.

use std::collections::BTreeMap;
use std::fs::{remove_file, rename, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use super::error::SaveError;
use super::format::Snapshot;
use crate::game::Game;
use crate::serialization::Registry;

const SNAPSHOT_EXTENSION: &str = "sav";

/// Keyed storage of snapshot bytes.
pub trait SnapshotStore {
    fn put(&mut self, game_id: &str, bytes: Vec<u8>) -> Result<(), SaveError>;

    /// `Ok(None)` when nothing is stored under `game_id`.
    fn get(&self, game_id: &str) -> Result<Option<Vec<u8>>, SaveError>;

    /// Returns whether a snapshot was removed.
    fn delete(&mut self, game_id: &str) -> Result<bool, SaveError>;

    /// Stored ids, sorted.
    fn ids(&self) -> Result<Vec<String>, SaveError>;
}

// =============================================================================
// MemoryStore
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    snapshots: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn put(&mut self, game_id: &str, bytes: Vec<u8>) -> Result<(), SaveError> {
        self.snapshots.insert(game_id.to_string(), bytes);
        Ok(())
    }

    fn get(&self, game_id: &str) -> Result<Option<Vec<u8>>, SaveError> {
        Ok(self.snapshots.get(game_id).cloned())
    }

    fn delete(&mut self, game_id: &str) -> Result<bool, SaveError> {
        Ok(self.snapshots.remove(game_id).is_some())
    }

    fn ids(&self) -> Result<Vec<String>, SaveError> {
        Ok(self.snapshots.keys().cloned().collect())
    }
}

// =============================================================================
// DirectoryStore
// =============================================================================

/// One `<game_id>.sav` file per game.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, game_id: &str) -> Result<PathBuf, SaveError> {
        let valid = !game_id.is_empty()
            && game_id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(SaveError::InvalidGameId { game_id: game_id.to_string() });
        }
        Ok(self.root.join(format!("{}.{}", game_id, SNAPSHOT_EXTENSION)))
    }
}

impl SnapshotStore for DirectoryStore {
    fn put(&mut self, game_id: &str, bytes: Vec<u8>) -> Result<(), SaveError> {
        let path = self.path_for(game_id)?;
        std::fs::create_dir_all(&self.root)?;

        // Atomic save: write to temp file, then rename
        let temp_path = path.with_extension("tmp");
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&bytes)?;
            file.flush()?;
            file.sync_all()?;
        }
        rename(&temp_path, &path)?;

        log::debug!("Saved {} bytes to {:?}", bytes.len(), path);
        Ok(())
    }

    fn get(&self, game_id: &str) -> Result<Option<Vec<u8>>, SaveError> {
        let path = self.path_for(game_id)?;
        if !path.exists() {
            return Ok(None);
        }

        let mut file = File::open(&path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        log::debug!("Loaded {} bytes from {:?}", data.len(), path);
        Ok(Some(data))
    }

    fn delete(&mut self, game_id: &str) -> Result<bool, SaveError> {
        let path = self.path_for(game_id)?;
        if !path.exists() {
            return Ok(false);
        }
        remove_file(&path)?;
        Ok(true)
    }

    fn ids(&self) -> Result<Vec<String>, SaveError> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(SNAPSHOT_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }
}

// =============================================================================
// GameRepository
// =============================================================================

/// Saves and loads games by id.
pub struct GameRepository<S: SnapshotStore> {
    store: S,
    registry: Registry,
}

impl<S: SnapshotStore> GameRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store, registry: Registry::with_domain_types() }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn save(&mut self, game: &Game) -> Result<(), SaveError> {
        let state = self.registry.encode(game)?;
        let snapshot = Snapshot::new(game.game_id(), state);
        let bytes = snapshot.to_bytes()?;
        self.store.put(game.game_id(), bytes)?;

        log::info!("Game {} saved (season {}, day {})", game.game_id(), game.season(), game.day());
        Ok(())
    }

    pub fn load(&self, game_id: &str) -> Result<Game, SaveError> {
        let bytes = self
            .store
            .get(game_id)?
            .ok_or_else(|| SaveError::NotFound { game_id: game_id.to_string() })?;

        let snapshot = Snapshot::from_bytes(&bytes)?;
        if snapshot.game_id != game_id {
            log::warn!("Snapshot under {} belongs to game {}", game_id, snapshot.game_id);
            return Err(SaveError::Corrupted);
        }
        let game: Game = self.registry.decode(snapshot.state)?;

        log::info!("Game {} loaded", game_id);
        Ok(game)
    }

    pub fn exists(&self, game_id: &str) -> Result<bool, SaveError> {
        Ok(self.store.get(game_id)?.is_some())
    }

    pub fn game_ids(&self) -> Result<Vec<String>, SaveError> {
        self.store.ids()
    }

    pub fn delete(&mut self, game_id: &str) -> Result<bool, SaveError> {
        let deleted = self.store.delete(game_id)?;
        if deleted {
            log::info!("Deleted game {}", game_id);
        }
        Ok(deleted)
    }
}
