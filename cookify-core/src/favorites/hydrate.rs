//! Turning favorite ids into displayable recipes.

use futures::future::join_all;
use serde::Serialize;
use std::time::Duration;
use tokio::time::timeout;

use super::error::HydrationError;
use crate::favorite_id::FavoriteId;
use crate::lookup::{LookupError, RecipeLookup};
use crate::models::Recipe;

/// Per-lookup deadline used when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Why a favorite could not be shown.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", content = "error", rename_all = "snake_case")]
pub enum Unresolved {
    /// The catalog answered but no longer knows this id.
    NotFound,
    /// The lookup itself failed or timed out.
    Failed(#[serde(serialize_with = "display")] LookupError),
}

fn display<S: serde::Serializer>(e: &LookupError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(e)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    Resolved(Recipe),
    Unresolved(Unresolved),
}

/// A favorite id paired with its lookup outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HydratedFavorite {
    pub id: FavoriteId,
    pub resolution: Resolution,
}

impl HydratedFavorite {
    pub fn recipe(&self) -> Option<&Recipe> {
        match &self.resolution {
            Resolution::Resolved(recipe) => Some(recipe),
            Resolution::Unresolved(_) => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.recipe().is_some()
    }
}

/// Outcome of one hydration batch, in the order the ids were given.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Hydration {
    entries: Vec<HydratedFavorite>,
}

impl Hydration {
    pub fn entries(&self) -> &[HydratedFavorite] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn resolved(&self) -> impl Iterator<Item = (&FavoriteId, &Recipe)> {
        self.entries
            .iter()
            .filter_map(|entry| entry.recipe().map(|recipe| (&entry.id, recipe)))
    }

    pub fn unresolved_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.is_resolved()).count()
    }

    /// Non-empty batch in which nothing resolved.
    pub fn is_total_failure(&self) -> bool {
        !self.entries.is_empty() && self.entries.iter().all(|e| !e.is_resolved())
    }

    /// The batch-level error, if there is one.
    ///
    /// Only a total failure with at least one lookup error counts. A batch
    /// where every id is simply gone from the catalog is an empty view, not
    /// an error.
    pub fn failure(&self) -> Option<HydrationError> {
        if !self.is_total_failure() {
            return None;
        }
        self.entries.iter().find_map(|entry| match &entry.resolution {
            Resolution::Unresolved(Unresolved::Failed(cause)) => {
                Some(HydrationError::AllUnresolved {
                    count: self.entries.len(),
                    cause: cause.clone(),
                })
            }
            _ => None,
        })
    }

    pub fn into_result(self) -> Result<Vec<HydratedFavorite>, HydrationError> {
        match self.failure() {
            Some(e) => Err(e),
            None => Ok(self.entries),
        }
    }
}

/// Resolves favorite ids against a recipe catalog.
pub struct Hydrator<L> {
    lookup: L,
    request_timeout: Duration,
}

impl<L: RecipeLookup> Hydrator<L> {
    pub fn new(lookup: L) -> Self {
        Self {
            lookup,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Looks up every id concurrently and waits for all of them.
    ///
    /// A failed, timed-out or empty lookup marks only its own entry as
    /// unresolved. The result keeps the order of `ids`. Nothing is retried.
    pub async fn hydrate(&self, ids: &[FavoriteId]) -> Hydration {
        if ids.is_empty() {
            return Hydration::default();
        }

        let entries = join_all(ids.iter().map(|id| self.resolve(id))).await;

        let hydration = Hydration { entries };
        tracing::debug!(
            requested = ids.len(),
            unresolved = hydration.unresolved_count(),
            "hydrated favorites"
        );
        hydration
    }

    async fn resolve(&self, id: &FavoriteId) -> HydratedFavorite {
        let resolution = match timeout(self.request_timeout, self.lookup.lookup(id)).await {
            Ok(Ok(Some(recipe))) => Resolution::Resolved(recipe),
            Ok(Ok(None)) => {
                tracing::warn!(%id, "favorite not found in catalog");
                Resolution::Unresolved(Unresolved::NotFound)
            }
            Ok(Err(e)) => {
                tracing::warn!(%id, error = %e, "favorite lookup failed");
                Resolution::Unresolved(Unresolved::Failed(e))
            }
            Err(_) => {
                tracing::warn!(%id, timeout = ?self.request_timeout, "favorite lookup timed out");
                Resolution::Unresolved(Unresolved::Failed(LookupError::Timeout))
            }
        };

        HydratedFavorite {
            id: id.clone(),
            resolution,
        }
    }
}
