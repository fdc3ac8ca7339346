//! Remote recipe catalog.
//!
//! The favorites subsystem only consumes two operations: free-text search
//! and lookup by id. Both are remote and may fail or come back empty.

mod mealdb;

use async_trait::async_trait;
use thiserror::Error;

use crate::favorite_id::FavoriteId;
use crate::models::Recipe;

pub use mealdb::{parse_meals, MealDbClient, DEFAULT_API_URL};

/// Errors from a single catalog request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Catalog returned status {0}")]
    Status(u16),

    #[error("Failed to decode catalog response: {0}")]
    Decode(String),

    #[error("Request timed out")]
    Timeout,
}

/// Recipe catalog collaborator.
#[async_trait]
pub trait RecipeLookup: Send + Sync {
    /// Zero or more recipes matching `query`.
    async fn search(&self, query: &str) -> Result<Vec<Recipe>, LookupError>;

    /// The recipe with `id`, or `None` if the catalog does not know it.
    async fn lookup(&self, id: &FavoriteId) -> Result<Option<Recipe>, LookupError>;
}

#[async_trait]
impl<T: RecipeLookup + ?Sized> RecipeLookup for std::sync::Arc<T> {
    async fn search(&self, query: &str) -> Result<Vec<Recipe>, LookupError> {
        (**self).search(query).await
    }

    async fn lookup(&self, id: &FavoriteId) -> Result<Option<Recipe>, LookupError> {
        (**self).lookup(id).await
    }
}
