//! Cart store.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use shopfront_core::{CartEntry, ProductId};

use super::{keys, load_snapshot, persist_snapshot};
use crate::catalog::CatalogSnapshot;
use crate::persistence::SharedStorage;
use crate::views;

/// The visitor's cart: at most one entry per product, every quantity >= 1.
///
/// Entries keep insertion order, which is the order the cart page lists
/// them in.
#[derive(Debug)]
pub struct CartStore {
    entries: Vec<CartEntry>,
    storage: SharedStorage,
}

impl CartStore {
    /// Load the cart from `storage`.
    ///
    /// A snapshot that decodes but breaks the entry invariants is repaired:
    /// zero quantities and non-positive ids are dropped and duplicate ids
    /// are merged.
    #[must_use]
    pub fn load(storage: SharedStorage) -> Self {
        let raw: Vec<CartEntry> = load_snapshot(storage.as_ref(), keys::CART).unwrap_or_default();
        let entries = normalize(raw);
        debug!(entries = entries.len(), "cart loaded");
        Self { entries, storage }
    }

    /// Add one unit of `product_id`, creating the entry if needed.
    /// Non-positive ids are ignored.
    pub fn add(&mut self, product_id: ProductId) {
        if !product_id.is_positive() {
            debug!(%product_id, "ignoring invalid product id");
            return;
        }
        if let Some(entry) = self.entry_mut(product_id) {
            entry.quantity = entry.quantity.saturating_add(1);
        } else {
            self.entries.push(CartEntry::single(product_id));
        }
        debug!(%product_id, "cart add");
        self.persist();
    }

    /// Drop the entry for `product_id`. Absent ids are ignored.
    pub fn remove(&mut self, product_id: ProductId) {
        let before = self.entries.len();
        self.entries.retain(|e| e.product_id != product_id);
        if self.entries.len() != before {
            debug!(%product_id, "cart remove");
            self.persist();
        }
    }

    /// Overwrite the quantity of an existing entry.
    ///
    /// A quantity below 1 removes the entry. Setting a quantity on a product
    /// that is not in the cart does nothing; it never inserts.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: i64) {
        if quantity < 1 {
            self.remove(product_id);
            return;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        let Some(entry) = self.entry_mut(product_id) else {
            return;
        };
        if entry.quantity == quantity {
            return;
        }
        entry.quantity = quantity;
        debug!(%product_id, quantity, "cart set quantity");
        self.persist();
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.entries.clear();
        debug!("cart cleared");
        self.persist();
    }

    /// Total units across all entries, including entries the catalog no
    /// longer knows about.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        views::item_count(&self.entries)
    }

    /// Sum of `quantity x price` over entries the catalog can resolve.
    #[must_use]
    pub fn subtotal(&self, catalog: &CatalogSnapshot) -> Decimal {
        views::subtotal(&self.entries, catalog)
    }

    /// Current entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Owned copy of the entries.
    #[must_use]
    pub fn snapshot(&self) -> Vec<CartEntry> {
        self.entries.clone()
    }

    /// Quantity held for `product_id`, if it is in the cart.
    #[must_use]
    pub fn quantity_of(&self, product_id: ProductId) -> Option<u32> {
        self.entries
            .iter()
            .find(|e| e.product_id == product_id)
            .map(|e| e.quantity)
    }

    /// Whether `product_id` has an entry.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.quantity_of(product_id).is_some()
    }

    /// Whether the cart has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry_mut(&mut self, product_id: ProductId) -> Option<&mut CartEntry> {
        self.entries.iter_mut().find(|e| e.product_id == product_id)
    }

    fn persist(&self) {
        persist_snapshot(self.storage.as_ref(), keys::CART, &self.entries);
    }
}

/// Drop zero-quantity entries and non-positive ids, and merge duplicates
/// keeping first position.
fn normalize(raw: Vec<CartEntry>) -> Vec<CartEntry> {
    let mut entries: Vec<CartEntry> = Vec::with_capacity(raw.len());
    let mut repaired = false;

    for entry in raw {
        if entry.quantity == 0 || !entry.product_id.is_positive() {
            repaired = true;
            continue;
        }
        if let Some(existing) = entries
            .iter_mut()
            .find(|e| e.product_id == entry.product_id)
        {
            existing.quantity = existing.quantity.saturating_add(entry.quantity);
            repaired = true;
        } else {
            entries.push(entry);
        }
    }

    if repaired {
        warn!("repaired cart snapshot with invalid entries");
    }
    entries
}
