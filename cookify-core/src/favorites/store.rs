//! Durable favorite set.
//!
//! Every operation goes back to storage; nothing here caches the set. Two
//! surfaces holding their own store handle over the same storage therefore
//! always see whatever was last written.
//!
//! ## Concurrency
//!
//! `add`, `remove` and `toggle` are read-modify-write cycles over a single
//! key. Storage offers no compare-and-swap, so under
//! [`WriteMode::LastWriteWins`] two mutations racing on the same key can lose
//! an update: both read the same set, and the second write replaces the
//! first. [`WriteMode::Serialized`] queues mutations issued through one store
//! handle behind an async mutex, so each cycle sees the previous one's write.
//! Neither mode coordinates across separate handles or processes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tokio::sync::{Mutex, MutexGuard};

use super::error::FavoritesError;
use crate::favorite_id::{FavoriteId, FavoriteSet};
use crate::storage::{KeyValueStore, StorageError};

/// Storage key holding the serialized favorite set.
pub const FAVORITES_KEY: &str = "@Cookify:favorites";

/// How concurrent mutations through one store are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Unordered read-modify-write; racing mutations may lose an update.
    #[default]
    LastWriteWins,
    /// Single-writer queue over the key.
    Serialized,
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteMode::LastWriteWins => write!(f, "last_write_wins"),
            WriteMode::Serialized => write!(f, "serialized"),
        }
    }
}

impl FromStr for WriteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "last_write_wins" | "last-write-wins" => Ok(WriteMode::LastWriteWins),
            "serialized" => Ok(WriteMode::Serialized),
            other => Err(format!(
                "Unknown write mode '{}' (expected 'serialized' or 'last_write_wins')",
                other
            )),
        }
    }
}

/// The favorite set, persisted under one namespaced key.
pub struct FavoriteStore<S> {
    storage: S,
    key: String,
    mode: WriteMode,
    writer: Mutex<()>,
}

impl<S: KeyValueStore> FavoriteStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            key: FAVORITES_KEY.to_string(),
            mode: WriteMode::default(),
            writer: Mutex::new(()),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_write_mode(mut self, mode: WriteMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn write_mode(&self) -> WriteMode {
        self.mode
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Current favorites, in the order they were added.
    ///
    /// Missing, unreadable or corrupt data all yield an empty set; the
    /// failure is logged, not returned.
    pub async fn list(&self) -> FavoriteSet {
        match self.storage.get(&self.key).await {
            Ok(Some(raw)) => self.decode(&raw),
            Ok(None) => FavoriteSet::new(),
            Err(e) => {
                tracing::error!(key = %self.key, error = %e, "failed to load favorites");
                FavoriteSet::new()
            }
        }
    }

    pub async fn contains(&self, id: &FavoriteId) -> bool {
        self.list().await.contains(id)
    }

    /// Adds `id` at the end of the set. No-op if already present.
    pub async fn add(&self, id: &FavoriteId) -> Result<(), FavoritesError> {
        self.update(|set| set.insert(id.clone())).await?;
        Ok(())
    }

    /// Removes `id`. No-op if absent.
    pub async fn remove(&self, id: &FavoriteId) -> Result<(), FavoritesError> {
        self.update(|set| set.remove(id)).await?;
        Ok(())
    }

    /// Flips `id` in one read-modify-write cycle; returns the new state.
    pub async fn toggle(&self, id: &FavoriteId) -> Result<bool, FavoritesError> {
        self.update(|set| {
            if set.remove(id) {
                false
            } else {
                set.insert(id.clone());
                true
            }
        })
        .await
    }

    /// Deletes the persisted record entirely.
    pub async fn clear(&self) -> Result<(), FavoritesError> {
        let _writer = self.lock_writer().await;
        self.storage
            .remove(&self.key)
            .await
            .map_err(FavoritesError::Write)?;
        tracing::debug!(key = %self.key, "cleared favorites");
        Ok(())
    }

    async fn lock_writer(&self) -> Option<MutexGuard<'_, ()>> {
        match self.mode {
            WriteMode::Serialized => Some(self.writer.lock().await),
            WriteMode::LastWriteWins => None,
        }
    }

    /// One read-modify-write cycle. The full set is written back only if `f`
    /// changed it.
    async fn update<T, F>(&self, f: F) -> Result<T, FavoritesError>
    where
        F: FnOnce(&mut FavoriteSet) -> T + Send,
        T: Send,
    {
        let _writer = self.lock_writer().await;

        // A failed read must not turn into "empty" here, or the write below
        // would wipe the set.
        let current = match self
            .storage
            .get(&self.key)
            .await
            .map_err(FavoritesError::Read)?
        {
            Some(raw) => self.decode(&raw),
            None => FavoriteSet::new(),
        };

        let mut next = current.clone();
        let out = f(&mut next);

        if next != current {
            self.save(&next).await?;
        }
        Ok(out)
    }

    async fn save(&self, set: &FavoriteSet) -> Result<(), FavoritesError> {
        let raw = serde_json::to_string(set)
            .map_err(|e| FavoritesError::Write(StorageError::Backend(e.to_string())))?;
        self.storage
            .set(&self.key, &raw)
            .await
            .map_err(FavoritesError::Write)?;
        tracing::debug!(key = %self.key, count = set.len(), "saved favorites");
        Ok(())
    }

    fn decode(&self, raw: &str) -> FavoriteSet {
        match serde_json::from_str(raw) {
            Ok(set) => set,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "ignoring corrupt favorites");
                FavoriteSet::new()
            }
        }
    }
}
