//! Display surfaces that depend on favorite state.
//!
//! There is no push channel between surfaces. Each one re-reads the store
//! when it becomes the active surface again, which is how a toggle made on
//! a detail surface shows up on the favorites list and vice versa.
//!
//! A surface that activates while another surface's toggle is still in
//! flight may observe the set either before or after that toggle. Both are
//! valid sets; the next activation converges.

use super::error::{FavoritesError, HydrationError};
use super::hydrate::{HydratedFavorite, Hydration};
use super::Favorites;
use crate::favorite_id::FavoriteId;
use crate::lookup::RecipeLookup;
use crate::models::Recipe;
use crate::storage::KeyValueStore;

/// The favorites list screen.
#[derive(Debug, Default)]
pub struct FavoritesListSurface {
    hydration: Hydration,
    activations: u64,
}

impl FavoritesListSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-reads the favorite set and re-hydrates it. Call on every
    /// activation, not only the first.
    pub async fn activate<S, L>(&mut self, favorites: &Favorites<S, L>) -> &Hydration
    where
        S: KeyValueStore,
        L: RecipeLookup,
    {
        self.hydration = favorites.load().await;
        self.activations += 1;
        &self.hydration
    }

    pub fn activations(&self) -> u64 {
        self.activations
    }

    pub fn entries(&self) -> &[HydratedFavorite] {
        self.hydration.entries()
    }

    /// Entries worth rendering: unresolved ones are dropped.
    pub fn visible(&self) -> impl Iterator<Item = (&FavoriteId, &Recipe)> {
        self.hydration.resolved()
    }

    pub fn last_error(&self) -> Option<HydrationError> {
        self.hydration.failure()
    }
}

/// The favorite marker on a single recipe's detail screen.
#[derive(Debug, Clone)]
pub struct FavoriteIndicator {
    id: FavoriteId,
    is_favorite: bool,
}

impl FavoriteIndicator {
    pub fn new(id: impl Into<FavoriteId>) -> Self {
        Self {
            id: id.into(),
            is_favorite: false,
        }
    }

    pub fn id(&self) -> &FavoriteId {
        &self.id
    }

    /// Last observed state. Only meaningful after `activate`.
    pub fn is_favorite(&self) -> bool {
        self.is_favorite
    }

    pub async fn activate<S, L>(&mut self, favorites: &Favorites<S, L>) -> bool
    where
        S: KeyValueStore,
        L: RecipeLookup,
    {
        self.is_favorite = favorites.is_favorite(&self.id).await;
        self.is_favorite
    }

    /// Adds or removes the recipe, based on the state last observed here.
    ///
    /// On failure the indicator keeps its previous state. `&mut self` means
    /// a surface cannot start a second toggle while one is in flight.
    pub async fn toggle<S, L>(&mut self, favorites: &Favorites<S, L>) -> Result<bool, FavoritesError>
    where
        S: KeyValueStore,
        L: RecipeLookup,
    {
        if self.is_favorite {
            favorites.remove(&self.id).await?;
        } else {
            favorites.add(&self.id).await?;
        }
        self.is_favorite = !self.is_favorite;
        Ok(self.is_favorite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favorites::{FavoriteStore, Hydrator};
    use crate::lookup::LookupError;
    use crate::testing::{FlakyStore, StubLookup};

    fn favorites(lookup: StubLookup) -> Favorites<FlakyStore, StubLookup> {
        Favorites::new(FavoriteStore::new(FlakyStore::new()), Hydrator::new(lookup))
    }

    fn catalog() -> StubLookup {
        StubLookup::new()
            .with_recipe("52772", "Teriyaki Chicken Casserole")
            .with_recipe("52899", "Spicy Chicken")
    }

    #[tokio::test]
    async fn test_list_resyncs_on_every_activation() {
        let favorites = favorites(catalog());
        let mut list = FavoritesListSurface::new();
        let mut detail = FavoriteIndicator::new("52899");

        assert!(list.activate(&favorites).await.is_empty());

        // Detail screen toggles while the list is in the background.
        detail.activate(&favorites).await;
        assert!(detail.toggle(&favorites).await.unwrap());

        // Nothing changes on the list until it becomes active again.
        assert!(list.entries().is_empty());
        list.activate(&favorites).await;

        let names: Vec<&str> = list.visible().map(|(_, r)| r.name.as_str()).collect();
        assert_eq!(names, vec!["Spicy Chicken"]);
        assert_eq!(list.activations(), 2);
    }

    #[tokio::test]
    async fn test_indicator_reflects_changes_from_other_surfaces() {
        let favorites = favorites(catalog());
        let mut first = FavoriteIndicator::new("52772");
        let mut second = FavoriteIndicator::new("52772");

        first.activate(&favorites).await;
        first.toggle(&favorites).await.unwrap();

        assert!(!second.is_favorite());
        assert!(second.activate(&favorites).await);

        second.toggle(&favorites).await.unwrap();
        assert!(!first.activate(&favorites).await);
    }

    #[tokio::test]
    async fn test_stale_indicator_toggle_converges() {
        let favorites = favorites(catalog());
        let mut stale = FavoriteIndicator::new("52772");
        stale.activate(&favorites).await;

        // Another surface favorites it after `stale` last looked.
        favorites.add(&"52772".into()).await.unwrap();

        // `stale` believes it is not a favorite, so it adds; the add is a
        // no-op and the indicator ends up matching the store.
        assert!(stale.toggle(&favorites).await.unwrap());
        assert!(favorites.is_favorite(stale.id()).await);
        assert_eq!(favorites.list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_toggle_keeps_previous_state() {
        let favorites = favorites(catalog());
        let mut detail = FavoriteIndicator::new("52772");
        detail.activate(&favorites).await;

        favorites.store().storage().fail_writes(true);
        let err = detail.toggle(&favorites).await.unwrap_err();

        assert!(matches!(err, FavoritesError::Write(_)));
        assert!(!detail.is_favorite());
    }

    #[tokio::test]
    async fn test_list_hides_unresolved_but_keeps_entries() {
        let lookup = catalog().with_failure("1", LookupError::Http("boom".into()));
        let favorites = favorites(lookup);
        favorites.add(&"1".into()).await.unwrap();
        favorites.add(&"52772".into()).await.unwrap();

        let mut list = FavoritesListSurface::new();
        list.activate(&favorites).await;

        assert_eq!(list.entries().len(), 2);
        assert_eq!(list.visible().count(), 1);
        assert!(list.last_error().is_none());
    }

    #[tokio::test]
    async fn test_list_reports_total_failure() {
        let lookup = StubLookup::new().with_failure("1", LookupError::Timeout);
        let favorites = favorites(lookup);
        favorites.add(&"1".into()).await.unwrap();

        let mut list = FavoritesListSurface::new();
        list.activate(&favorites).await;

        assert_eq!(list.visible().count(), 0);
        assert!(matches!(
            list.last_error(),
            Some(HydrationError::AllUnresolved { count: 1, .. })
        ));
    }
}
