use thiserror::Error;

use crate::lookup::LookupError;
use crate::storage::StorageError;

/// Failures of a favorites mutation.
///
/// Reads through `FavoriteStore::list` never fail; they degrade to an empty
/// set. Mutations do fail, because proceeding would drop the user's change.
#[derive(Error, Debug)]
pub enum FavoritesError {
    /// The current set could not be read, so it was not safe to rewrite it.
    #[error("Failed to read favorites: {0}")]
    Read(#[source] StorageError),

    /// The new set could not be durably recorded.
    #[error("Failed to save favorites: {0}")]
    Write(#[source] StorageError),
}

/// Batch-level hydration failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HydrationError {
    #[error("None of the {count} favorites could be loaded: {cause}")]
    AllUnresolved { count: usize, cause: LookupError },
}
