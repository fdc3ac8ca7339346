//! Durable key-value storage.
//!
//! The favorites store only needs "one namespaced key maps to one string
//! value". Writes replace the whole value; there are no partial writes.

mod file;
mod memory;

use async_trait::async_trait;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub use file::FileKeyValueStore;
pub use memory::MemoryKeyValueStore;

/// Errors that can occur during key-value storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error for {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] io::Error),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Async string key-value storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns `Ok(None)` if the key has never been written (or was removed).
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replaces the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing a missing key succeeds.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key).await
    }
}
