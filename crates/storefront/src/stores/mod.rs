//! Client-side state containers.
//!
//! Each store owns one slice of visitor state and one storage key:
//!
//! | store | key | snapshot |
//! |---|---|---|
//! | [`CartStore`] | `cart` | `[{"id":1,"quantity":2}]` |
//! | [`WishlistStore`] | `wishlist` | `[1,5]` |
//! | [`SessionStore`] | `user` | `{"id":"1","name":..}` |
//!
//! Stores read their key once when loaded and write the full snapshot
//! synchronously whenever a mutation changes their state. A missing or
//! malformed snapshot yields an empty store; storage failures are logged
//! and never surface to callers.

mod cart;
mod session;
mod wishlist;

pub use cart::CartStore;
pub use session::SessionStore;
pub use wishlist::WishlistStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::persistence::KeyValueStore;

/// Storage keys, one per store.
pub mod keys {
    /// Cart entries.
    pub const CART: &str = "cart";

    /// Wishlisted product ids.
    pub const WISHLIST: &str = "wishlist";

    /// Signed-in identity.
    pub const USER: &str = "user";
}

/// Read and decode the snapshot under `key`.
///
/// Returns `None` when the key is absent, unreadable or malformed.
fn load_snapshot<T: DeserializeOwned>(storage: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(key, error = %e, "failed to read snapshot, starting empty");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "discarding malformed snapshot");
            None
        }
    }
}

/// Encode and write `value` under `key`. Failures are logged, not returned.
fn persist_snapshot<T: Serialize + ?Sized>(storage: &dyn KeyValueStore, key: &str, value: &T) {
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(key, error = %e, "failed to encode snapshot");
            return;
        }
    };

    if let Err(e) = storage.set(key, &raw) {
        warn!(key, error = %e, "failed to persist snapshot");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use shopfront_core::{Email, Identity, ProductId};

    use super::*;
    use crate::persistence::SharedStorage;
    use crate::persistence::test_support::FailingStore;

    fn failing() -> SharedStorage {
        Arc::new(FailingStore)
    }

    #[test]
    fn test_unreadable_storage_loads_empty() {
        assert!(CartStore::load(failing()).is_empty());
        assert!(WishlistStore::load(failing()).is_empty());
        assert!(SessionStore::load(failing()).current().is_none());
    }

    #[test]
    fn test_unwritable_storage_keeps_memory_state() {
        let mut cart = CartStore::load(failing());
        cart.add(ProductId::new(1));
        cart.add(ProductId::new(1));
        assert_eq!(cart.quantity_of(ProductId::new(1)), Some(2));
        cart.clear();
        assert!(cart.is_empty());

        let mut wishlist = WishlistStore::load(failing());
        wishlist.add(ProductId::new(5));
        assert!(wishlist.contains(ProductId::new(5)));

        let mut session = SessionStore::load(failing());
        session.sign_in(Identity {
            id: "1".to_string(),
            display_name: "Demo User".to_string(),
            email: Email::parse("demo@example.com").unwrap(),
            session_token: None,
        });
        assert!(session.is_authenticated());
        session.sign_out();
        assert!(session.current().is_none());
    }
}
