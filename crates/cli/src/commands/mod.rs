//! CLI command implementations.

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod products;
pub mod wishlist;

use tracing::warn;

use shopfront::catalog::FakeStoreClient;
use shopfront::error::AppError;
use shopfront::state::AppState;
use shopfront_core::ProductId;

/// Session state backed by the HTTP catalog.
pub type Shop = AppState<FakeStoreClient>;

/// Reject ids the catalog can never resolve.
fn ensure_positive(id: ProductId) -> Result<(), AppError> {
    if id.is_positive() {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!("invalid product id {id}")))
    }
}

/// Refresh the catalog for a read-only view. A failure is logged and the
/// view renders against whatever snapshot is there.
async fn refresh_for_view(state: &mut Shop) {
    if let Err(e) = state.refresh_catalog().await {
        warn!(error = %e, "showing without current prices");
    }
}
