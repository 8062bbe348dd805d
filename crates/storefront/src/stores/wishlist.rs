//! Wishlist store.

use tracing::debug;

use shopfront_core::ProductId;

use super::{keys, load_snapshot, persist_snapshot};
use crate::persistence::SharedStorage;

/// Products the visitor saved for later. Set semantics, insertion order.
#[derive(Debug)]
pub struct WishlistStore {
    ids: Vec<ProductId>,
    storage: SharedStorage,
}

impl WishlistStore {
    /// Load the wishlist from `storage`, collapsing duplicate ids and
    /// dropping non-positive ones.
    #[must_use]
    pub fn load(storage: SharedStorage) -> Self {
        let raw: Vec<ProductId> =
            load_snapshot(storage.as_ref(), keys::WISHLIST).unwrap_or_default();

        let mut ids = Vec::with_capacity(raw.len());
        for id in raw {
            if id.is_positive() && !ids.contains(&id) {
                ids.push(id);
            }
        }
        debug!(entries = ids.len(), "wishlist loaded");
        Self { ids, storage }
    }

    /// Save `product_id`. Already saved and non-positive ids are left alone.
    pub fn add(&mut self, product_id: ProductId) {
        if !product_id.is_positive() || self.contains(product_id) {
            return;
        }
        self.ids.push(product_id);
        debug!(%product_id, "wishlist add");
        self.persist();
    }

    /// Forget `product_id`. Absent ids are ignored.
    pub fn remove(&mut self, product_id: ProductId) {
        let before = self.ids.len();
        self.ids.retain(|id| *id != product_id);
        if self.ids.len() != before {
            debug!(%product_id, "wishlist remove");
            self.persist();
        }
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        if self.ids.is_empty() {
            return;
        }
        self.ids.clear();
        debug!("wishlist cleared");
        self.persist();
    }

    /// Membership test.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.ids.contains(&product_id)
    }

    /// Saved ids in the order they were added.
    #[must_use]
    pub fn ids(&self) -> &[ProductId] {
        &self.ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn persist(&self) {
        persist_snapshot(self.storage.as_ref(), keys::WISHLIST, &self.ids);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::persistence::{KeyValueStore, MemoryStore};

    fn id(n: i32) -> ProductId {
        ProductId::new(n)
    }

    #[test]
    fn test_add_is_idempotent() {
        let storage = Arc::new(MemoryStore::new());
        let mut once = WishlistStore::load(Arc::new(MemoryStore::new()));
        let mut twice = WishlistStore::load(storage.clone());

        once.add(id(4));
        twice.add(id(4));
        twice.add(id(4));

        assert_eq!(once.ids(), twice.ids());
        assert_eq!(storage.write_count(), 1);
        assert_eq!(storage.get(keys::WISHLIST).unwrap().as_deref(), Some("[4]"));
    }

    #[test]
    fn test_remove_and_contains() {
        let mut wishlist = WishlistStore::load(Arc::new(MemoryStore::new()));
        wishlist.add(id(1));
        wishlist.add(id(2));
        assert!(wishlist.contains(id(1)));

        wishlist.remove(id(1));
        assert!(!wishlist.contains(id(1)));
        assert_eq!(wishlist.ids(), &[id(2)]);

        // absent id
        wishlist.remove(id(42));
        assert_eq!(wishlist.len(), 1);
    }

    #[test]
    fn test_clear_persists_empty_list() {
        let storage = Arc::new(MemoryStore::new());
        let mut wishlist = WishlistStore::load(storage.clone());
        wishlist.add(id(1));
        wishlist.clear();
        assert!(wishlist.is_empty());
        assert_eq!(storage.get(keys::WISHLIST).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_load_round_trip_and_dedup() {
        let storage = Arc::new(MemoryStore::with_entries([(keys::WISHLIST, "[3,1,3,2]")]));
        let wishlist = WishlistStore::load(storage);
        assert_eq!(wishlist.ids(), &[id(3), id(1), id(2)]);
    }

    #[test]
    fn test_non_positive_ids_rejected() {
        let storage = Arc::new(MemoryStore::with_entries([(keys::WISHLIST, "[0,7,-2]")]));
        let mut wishlist = WishlistStore::load(storage.clone());
        assert_eq!(wishlist.ids(), &[id(7)]);

        wishlist.add(id(-1));
        assert_eq!(wishlist.len(), 1);
        assert_eq!(storage.write_count(), 0);
    }

    #[test]
    fn test_malformed_snapshot_starts_empty() {
        let storage = Arc::new(MemoryStore::with_entries([(keys::WISHLIST, r#"["a","b"]"#)]));
        let wishlist = WishlistStore::load(storage);
        assert!(wishlist.is_empty());
    }
}
