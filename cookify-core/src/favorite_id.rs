//! Favorite identifiers and the ordered favorite set.
//!
//! A `FavoriteId` is the catalog's recipe id, kept as an opaque string.
//! A `FavoriteSet` is the durable list of those ids in the order they were
//! favorited, with no duplicates.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Opaque identifier of a recipe in the external catalog.
///
/// Equality is exact string equality. No trimming or case folding is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoriteId(String);

impl FavoriteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for FavoriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FavoriteId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for FavoriteId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for FavoriteId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Ordered, duplicate-free sequence of favorite ids (first-favorited first).
///
/// Serializes as a plain JSON array of strings, e.g. `["52899","52772"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FavoriteSet(Vec<FavoriteId>);

impl FavoriteSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends `id` if absent. Returns `true` if the set changed.
    pub fn insert(&mut self, id: FavoriteId) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.0.push(id);
        true
    }

    /// Removes `id` if present. Returns `true` if the set changed.
    pub fn remove(&mut self, id: &FavoriteId) -> bool {
        let before = self.0.len();
        self.0.retain(|existing| existing != id);
        self.0.len() != before
    }

    pub fn contains(&self, id: &FavoriteId) -> bool {
        self.0.iter().any(|existing| existing == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FavoriteId> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[FavoriteId] {
        &self.0
    }
}

impl FromIterator<FavoriteId> for FavoriteSet {
    /// Later duplicates are dropped; the first occurrence keeps its position.
    fn from_iter<I: IntoIterator<Item = FavoriteId>>(iter: I) -> Self {
        let mut set = FavoriteSet::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

impl IntoIterator for FavoriteSet {
    type Item = FavoriteId;
    type IntoIter = std::vec::IntoIter<FavoriteId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a FavoriteSet {
    type Item = &'a FavoriteId;
    type IntoIter = std::slice::Iter<'a, FavoriteId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'de> Deserialize<'de> for FavoriteSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let ids = Vec::<FavoriteId>::deserialize(deserializer)?;
        Ok(ids.into_iter().collect())
    }
}
