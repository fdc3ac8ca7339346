//! Test doubles shared by the favorites tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::favorite_id::FavoriteId;
use crate::lookup::{LookupError, RecipeLookup};
use crate::models::Recipe;
use crate::storage::{KeyValueStore, MemoryKeyValueStore, StorageError};

/// Memory storage whose reads and writes can be made to fail, and whose
/// reads can yield to the scheduler after the value is taken.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryKeyValueStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    yield_after_read: AtomicBool,
    writes: AtomicUsize,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn yielding() -> Self {
        let store = Self::default();
        store.yield_after_read.store(true, Ordering::SeqCst);
        store
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub async fn raw(&self, key: &str) -> Option<String> {
        self.inner.get(key).await.unwrap()
    }

    pub async fn put_raw(&self, key: &str, value: &str) {
        self.inner.set(key, value).await.unwrap();
    }
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("read refused".into()));
        }
        let value = self.inner.get(key).await?;
        if self.yield_after_read.load(Ordering::SeqCst) {
            tokio::task::yield_now().await;
        }
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("disk full".into()));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("disk full".into()));
        }
        self.inner.remove(key).await
    }
}

/// Canned catalog: each id maps to a latency and an outcome.
#[derive(Default)]
pub struct StubLookup {
    outcomes: HashMap<String, (Duration, Result<Option<Recipe>, LookupError>)>,
    calls: AtomicUsize,
    order: Mutex<Vec<String>>,
}

impl StubLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_recipe(self, id: &str, name: &str) -> Self {
        self.with_delayed_recipe(id, name, Duration::ZERO)
    }

    pub fn with_delayed_recipe(mut self, id: &str, name: &str, delay: Duration) -> Self {
        self.outcomes
            .insert(id.to_string(), (delay, Ok(Some(Recipe::new(id, name)))));
        self
    }

    pub fn with_failure(mut self, id: &str, error: LookupError) -> Self {
        self.outcomes
            .insert(id.to_string(), (Duration::ZERO, Err(error)));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Ids in the order their lookups completed.
    pub fn completion_order(&self) -> Vec<String> {
        self.order.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecipeLookup for StubLookup {
    async fn search(&self, query: &str) -> Result<Vec<Recipe>, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let query = query.to_lowercase();
        let mut found: Vec<Recipe> = self
            .outcomes
            .values()
            .filter_map(|(_, outcome)| outcome.clone().ok().flatten())
            .filter(|recipe| recipe.name.to_lowercase().contains(&query))
            .collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(found)
    }

    async fn lookup(&self, id: &FavoriteId) -> Result<Option<Recipe>, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let Some((delay, outcome)) = self.outcomes.get(id.as_str()).cloned() else {
            return Ok(None);
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.order.lock().unwrap().push(id.to_string());
        outcome
    }
}
