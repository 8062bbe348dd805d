//! Session store.

use tracing::{debug, warn};

use shopfront_core::Identity;

use super::{keys, load_snapshot, persist_snapshot};
use crate::persistence::SharedStorage;

/// Holds the signed-in identity, if any.
///
/// This store does not check credentials. Whoever calls [`sign_in`]
/// has already done so; see [`crate::services::auth`].
///
/// [`sign_in`]: SessionStore::sign_in
#[derive(Debug)]
pub struct SessionStore {
    current: Option<Identity>,
    storage: SharedStorage,
}

impl SessionStore {
    /// Restore the identity persisted under `user`, if it decodes.
    #[must_use]
    pub fn load(storage: SharedStorage) -> Self {
        let current: Option<Identity> = load_snapshot(storage.as_ref(), keys::USER);
        debug!(authenticated = current.is_some(), "session loaded");
        Self { current, storage }
    }

    /// Replace the current identity unconditionally and persist it.
    pub fn sign_in(&mut self, identity: Identity) {
        debug!(user_id = %identity.id, "session sign in");
        persist_snapshot(self.storage.as_ref(), keys::USER, &identity);
        self.current = Some(identity);
    }

    /// Forget the identity and remove it from storage.
    pub fn sign_out(&mut self) {
        self.current = None;
        if let Err(e) = self.storage.remove(keys::USER) {
            warn!(error = %e, "failed to remove persisted identity");
        }
        debug!("session sign out");
    }

    /// The active identity.
    #[must_use]
    pub const fn current(&self) -> Option<&Identity> {
        self.current.as_ref()
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }
}
