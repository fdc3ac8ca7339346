//! Favorites: the durable id set, hydration into recipes, and the surfaces
//! that display them.
//!
//! ## Flow
//!
//! 1. A surface calls [`Favorites::list`] for the current ids
//! 2. It passes them to [`Favorites::hydrate`]
//! 3. It renders the resolved entries
//!
//! Toggles go through [`Favorites::add`] / [`Favorites::remove`] only.

mod error;
mod hydrate;
mod store;
pub mod surface;

pub use error::{FavoritesError, HydrationError};
pub use hydrate::{
    HydratedFavorite, Hydration, Hydrator, Resolution, Unresolved, DEFAULT_REQUEST_TIMEOUT,
};
pub use store::{FavoriteStore, WriteMode, FAVORITES_KEY};
pub use surface::{FavoriteIndicator, FavoritesListSurface};

use crate::favorite_id::{FavoriteId, FavoriteSet};
use crate::lookup::RecipeLookup;
use crate::storage::KeyValueStore;

/// The public favorites surface: a store plus a hydrator.
pub struct Favorites<S, L> {
    store: FavoriteStore<S>,
    hydrator: Hydrator<L>,
}

impl<S: KeyValueStore, L: RecipeLookup> Favorites<S, L> {
    pub fn new(store: FavoriteStore<S>, hydrator: Hydrator<L>) -> Self {
        Self { store, hydrator }
    }

    pub fn store(&self) -> &FavoriteStore<S> {
        &self.store
    }

    pub fn hydrator(&self) -> &Hydrator<L> {
        &self.hydrator
    }

    pub async fn list(&self) -> FavoriteSet {
        self.store.list().await
    }

    pub async fn add(&self, id: &FavoriteId) -> Result<(), FavoritesError> {
        self.store.add(id).await
    }

    pub async fn remove(&self, id: &FavoriteId) -> Result<(), FavoritesError> {
        self.store.remove(id).await
    }

    pub async fn hydrate(&self, ids: &[FavoriteId]) -> Hydration {
        self.hydrator.hydrate(ids).await
    }

    pub async fn is_favorite(&self, id: &FavoriteId) -> bool {
        self.store.contains(id).await
    }

    /// `list()` followed by `hydrate()`.
    pub async fn load(&self) -> Hydration {
        let ids = self.list().await;
        self.hydrate(ids.as_slice()).await
    }
}
