//! Cookify Core Library
//!
//! Favorite recipes for the Cookify client: the durable favorite set, the
//! pipeline that hydrates favorite ids into recipes, and the recipe catalog
//! client those recipes come from.

pub mod favorite_id;
pub mod favorites;
pub mod lookup;
pub mod models;
pub mod storage;

#[cfg(test)]
mod testing;

pub use favorite_id::{FavoriteId, FavoriteSet};
pub use favorites::{
    FavoriteIndicator, FavoriteStore, Favorites, FavoritesError, FavoritesListSurface,
    HydratedFavorite, Hydration, HydrationError, Hydrator, Resolution, Unresolved, WriteMode,
    DEFAULT_REQUEST_TIMEOUT, FAVORITES_KEY,
};
pub use lookup::{LookupError, MealDbClient, RecipeLookup, DEFAULT_API_URL};
pub use models::{Ingredient, Recipe};
pub use storage::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, StorageError};
