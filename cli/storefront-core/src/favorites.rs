//! The persisted set of favorite products.
//!
//! The set is stored as a JSON array of product ids under [FAVORITES_KEY].
//! Storage problems never reach the caller:
//! an unreadable set loads as empty, and a failed write leaves the
//! toggled set in effect for the current session only.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use storefront_catalog::ProductId;
use tracing::{debug, warn};

use crate::storage::{KeyValueStore, StorageError};

/// Record under which the favorites are stored.
pub const FAVORITES_KEY: &str = "product-favorites";

/// A set of favorite product ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoriteSet(BTreeSet<ProductId>);

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.0.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ProductId> + '_ {
        self.0.iter().copied()
    }

    /// A copy of this set with `id` removed if present, or added if absent.
    pub fn toggled(&self, id: ProductId) -> Self {
        let mut toggled = self.clone();
        if !toggled.0.remove(&id) {
            toggled.0.insert(id);
        }
        toggled
    }
}

impl FromIterator<ProductId> for FavoriteSet {
    fn from_iter<I: IntoIterator<Item = ProductId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Serializes the favorite set to and from a [KeyValueStore].
///
/// The store never holds the current set itself;
/// callers keep it in memory and pass it to [FavoritesStore::toggle].
#[derive(Debug, Clone)]
pub struct FavoritesStore<S> {
    storage: S,
}

impl<S: KeyValueStore> FavoritesStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Read the persisted set.
    ///
    /// Returns an empty set if nothing is stored, the record is not a list
    /// of ids, or the storage cannot be read.
    pub fn load(&self) -> FavoriteSet {
        let stored = match self.storage.load(FAVORITES_KEY) {
            Ok(Some(stored)) => stored,
            Ok(None) => {
                debug!("no favorites stored");
                return FavoriteSet::new();
            },
            Err(StorageError::Unavailable) => {
                debug!("no persistent storage, favorites start empty");
                return FavoriteSet::new();
            },
            Err(e) => {
                warn!(error = %e, "failed to read favorites");
                return FavoriteSet::new();
            },
        };

        match serde_json::from_str::<FavoriteSet>(&stored) {
            Ok(favorites) => {
                debug!(n_favorites = favorites.len(), "loaded favorites");
                favorites
            },
            Err(e) => {
                warn!(error = %e, "ignoring unreadable favorites record");
                FavoriteSet::new()
            },
        }
    }

    /// Toggle `id` in `current`, persist the whole resulting set, and return it.
    ///
    /// The returned set reflects the toggle even if persisting it failed.
    pub fn toggle(&self, id: ProductId, current: &FavoriteSet) -> FavoriteSet {
        let toggled = current.toggled(id);
        if let Err(e) = self.save(&toggled) {
            warn!(error = %e, %id, "failed to save favorites");
        }
        toggled
    }

    fn save(&self, favorites: &FavoriteSet) -> Result<(), StorageError> {
        let value = serde_json::to_string(favorites).map_err(StorageError::Encode)?;
        self.storage.save(FAVORITES_KEY, &value)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use storefront_test_utils::IsolatedDataDir;

    use super::*;
    use crate::storage::{FileStore, MemoryStore, NoStorage};

    fn set(ids: &[u64]) -> FavoriteSet {
        ids.iter().copied().map(ProductId::new).collect()
    }

    fn stored(storage: &MemoryStore) -> Option<String> {
        storage.load(FAVORITES_KEY).unwrap()
    }

    #[test]
    fn load_without_record_is_empty() {
        let store = FavoritesStore::new(MemoryStore::new());
        assert_eq!(store.load(), FavoriteSet::new());
    }

    #[test]
    fn load_parses_stored_ids() {
        let storage = MemoryStore::new();
        storage.save(FAVORITES_KEY, "[3, 1, 2]").unwrap();

        let store = FavoritesStore::new(storage);
        assert_eq!(store.load(), set(&[1, 2, 3]));
    }

    #[test]
    fn load_corrupt_record_is_empty() {
        let storage = MemoryStore::new();
        storage.save(FAVORITES_KEY, "{not json").unwrap();
        assert_eq!(FavoritesStore::new(&storage).load(), FavoriteSet::new());

        storage.save(FAVORITES_KEY, r#"["a", "b"]"#).unwrap();
        assert_eq!(FavoritesStore::new(&storage).load(), FavoriteSet::new());
    }

    #[test]
    fn load_without_storage_is_empty() {
        assert_eq!(FavoritesStore::new(NoStorage).load(), FavoriteSet::new());
    }

    #[test]
    fn toggle_removes_present_id_and_persists() {
        let storage = MemoryStore::new();
        let store = FavoritesStore::new(storage.clone());

        let favorites = store.toggle(ProductId::new(5), &set(&[5]));

        assert_eq!(favorites, FavoriteSet::new());
        assert_eq!(stored(&storage).as_deref(), Some("[]"));
    }

    #[test]
    fn toggle_twice_restores_membership() {
        let storage = MemoryStore::new();
        let store = FavoritesStore::new(storage.clone());
        let id = ProductId::new(5);

        let once = store.toggle(id, &set(&[5]));
        assert!(!once.contains(id));
        assert_eq!(stored(&storage).as_deref(), Some("[]"));

        let twice = store.toggle(id, &once);
        assert!(twice.contains(id));
        assert_eq!(stored(&storage).as_deref(), Some("[5]"));
        assert_eq!(store.load(), set(&[5]));
    }

    #[test]
    fn toggle_does_not_read_storage() {
        let storage = MemoryStore::new();
        storage.save(FAVORITES_KEY, "[1, 2]").unwrap();
        let store = FavoritesStore::new(storage.clone());

        // the caller's copy wins over whatever is stored
        let favorites = store.toggle(ProductId::new(3), &FavoriteSet::new());
        assert_eq!(favorites, set(&[3]));
        assert_eq!(stored(&storage).as_deref(), Some("[3]"));
    }

    #[test]
    fn toggle_without_storage_still_toggles() {
        let store = FavoritesStore::new(NoStorage);
        let favorites = store.toggle(ProductId::new(1), &FavoriteSet::new());
        assert_eq!(favorites, set(&[1]));
    }

    #[test]
    fn favorites_survive_in_file_store() {
        let data_dir = IsolatedDataDir::new();
        let store = FavoritesStore::new(FileStore::new(data_dir.path()));

        let favorites = store.toggle(ProductId::new(2), &FavoriteSet::new());
        let favorites = store.toggle(ProductId::new(9), &favorites);

        let reloaded = FavoritesStore::new(FileStore::new(data_dir.path())).load();
        assert_eq!(reloaded, favorites);
        assert_eq!(reloaded, set(&[2, 9]));
    }

    proptest! {
        #[test]
        fn toggle_is_an_involution(ids in proptest::collection::btree_set(1..50_u64, 0..10), id in 1..50_u64) {
            let current: FavoriteSet = ids.iter().copied().map(ProductId::new).collect();
            let id = ProductId::new(id);

            let once = current.toggled(id);
            prop_assert_eq!(once.contains(id), !current.contains(id));
            prop_assert_eq!(once.toggled(id), current);
        }
    }
}
