//! Persistence port for store snapshots.
//!
//! The stores never talk to a concrete backend. They receive a shared
//! [`KeyValueStore`] at construction, read their key once, and write the
//! full snapshot back after every state-changing mutation.
//!
//! # Backends
//!
//! - [`MemoryStore`] - process-local map, used by tests and ephemeral runs
//! - [`FileStore`] - one `<key>.json` file per key under a data directory
//!
//! Methods take `&self` so a single backend can be shared behind an
//! [`Arc`] by the cart, wishlist and session stores; implementations use
//! interior mutability where they need it.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::fmt::Debug;
use std::sync::Arc;

use thiserror::Error;

/// Errors raised by a storage backend.
///
/// Stores log and swallow these; they never reach store callers.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The key contains characters the backend cannot address.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Filesystem operation failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend's lock was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Durable key to string storage, scoped to one visitor.
pub trait KeyValueStore: Send + Sync + Debug {
    /// Read a value. `Ok(None)` when the key was never written or was removed.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or overwrite a value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Removing an absent key is `Ok(())`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Shared handle the stores hold onto.
pub type SharedStorage = Arc<dyn KeyValueStore>;

/// Keys are used verbatim as file names by [`FileStore`], so they are
/// limited to ASCII letters, digits, `-` and `_`.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_owned()))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("cart").is_ok());
        assert!(validate_key("recently_viewed-2").is_ok());
        assert!(matches!(validate_key(""), Err(StorageError::InvalidKey(_))));
        assert!(matches!(
            validate_key("../etc/passwd"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(
            validate_key("cart.json"),
            Err(StorageError::InvalidKey(_))
        ));
    }
}
