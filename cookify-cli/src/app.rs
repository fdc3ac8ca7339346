//! Wiring from configuration to the core services.

use cookify_core::{
    FavoriteStore, Favorites, FileKeyValueStore, Hydrator, LookupError, MealDbClient,
};

use crate::config::Config;

pub type AppFavorites = Favorites<FileKeyValueStore, MealDbClient>;

/// Services shared by every command.
pub struct App {
    pub catalog: MealDbClient,
    pub favorites: AppFavorites,
}

impl App {
    pub fn from_config(config: &Config) -> Result<Self, LookupError> {
        let catalog = MealDbClient::with_timeout(&config.api_url.value, config.request_timeout())?;

        let store = FavoriteStore::new(FileKeyValueStore::new(config.data_dir.value.clone()))
            .with_write_mode(config.write_mode.value);
        let hydrator =
            Hydrator::new(catalog.clone()).with_request_timeout(config.request_timeout());

        tracing::debug!(
            data_dir = %config.data_dir.value.display(),
            api_url = %config.api_url.value,
            write_mode = %config.write_mode.value,
            "initialized services"
        );

        Ok(Self {
            catalog,
            favorites: Favorites::new(store, hydrator),
        })
    }
}
