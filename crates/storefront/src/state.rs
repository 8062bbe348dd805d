//! Application state for one shopping session.

use tracing::{info, warn};

use shopfront_core::{Product, ProductId};

use crate::catalog::{CatalogError, CatalogSnapshot, ProductCatalog};
use crate::checkout::{CheckoutError, CheckoutFlow, OrderConfirmation, OrderSummary};
use crate::config::StorefrontConfig;
use crate::persistence::SharedStorage;
use crate::stores::{CartStore, SessionStore, WishlistStore};
use crate::views::{self, CartSummary};

/// Everything one visitor session works with.
///
/// Bundles configuration, the catalog collaborator, the three stores (all on
/// the same storage backend) and the last catalog snapshot that resolved.
/// Mutations go through `&mut self`, one action at a time.
#[derive(Debug)]
pub struct AppState<C> {
    config: StorefrontConfig,
    catalog: C,
    snapshot: CatalogSnapshot,
    cart: CartStore,
    wishlist: WishlistStore,
    session: SessionStore,
}

impl<C: ProductCatalog> AppState<C> {
    /// Restore every store from `storage`. The catalog snapshot starts
    /// empty until [`refresh_catalog`](Self::refresh_catalog) succeeds.
    #[must_use]
    pub fn load(config: StorefrontConfig, catalog: C, storage: SharedStorage) -> Self {
        Self {
            config,
            catalog,
            snapshot: CatalogSnapshot::default(),
            cart: CartStore::load(storage.clone()),
            wishlist: WishlistStore::load(storage.clone()),
            session: SessionStore::load(storage),
        }
    }

    /// Fetch the product list and replace the snapshot.
    ///
    /// # Errors
    ///
    /// Returns the catalog error; the previous snapshot stays in place.
    pub async fn refresh_catalog(&mut self) -> Result<&CatalogSnapshot, CatalogError> {
        match self.catalog.list_products().await {
            Ok(products) => {
                self.snapshot = CatalogSnapshot::new(products);
                info!(products = self.snapshot.len(), "catalog refreshed");
                Ok(&self.snapshot)
            }
            Err(e) => {
                warn!(error = %e, "catalog refresh failed, keeping last snapshot");
                Err(e)
            }
        }
    }

    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    #[must_use]
    pub const fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Last catalog snapshot that resolved.
    #[must_use]
    pub const fn snapshot(&self) -> &CatalogSnapshot {
        &self.snapshot
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub const fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    #[must_use]
    pub const fn wishlist(&self) -> &WishlistStore {
        &self.wishlist
    }

    pub const fn wishlist_mut(&mut self) -> &mut WishlistStore {
        &mut self.wishlist
    }

    #[must_use]
    pub const fn session(&self) -> &SessionStore {
        &self.session
    }

    pub const fn session_mut(&mut self) -> &mut SessionStore {
        &mut self.session
    }

    // =========================================================================
    // Derived reads
    // =========================================================================

    /// Cart page view against the current snapshot.
    #[must_use]
    pub fn cart_summary(&self) -> CartSummary<'_> {
        views::cart_summary(self.cart.entries(), &self.snapshot)
    }

    /// Subtotal plus shipping and tax.
    #[must_use]
    pub fn order_summary(&self) -> OrderSummary {
        OrderSummary::from_subtotal(self.cart.subtotal(&self.snapshot), &self.config.pricing)
    }

    /// Wishlisted products the snapshot knows about.
    #[must_use]
    pub fn wishlist_products(&self) -> Vec<&Product> {
        views::wishlist_products(self.wishlist.ids(), &self.snapshot)
    }

    #[must_use]
    pub fn is_in_wishlist(&self, product_id: ProductId) -> bool {
        self.wishlist.contains(product_id)
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    // =========================================================================
    // Actions spanning stores
    // =========================================================================

    /// Add a wishlisted product to the cart. The wishlist keeps it.
    pub fn move_to_cart(&mut self, product_id: ProductId) {
        self.cart.add(product_id);
    }

    /// Start checkout for the signed-in visitor.
    ///
    /// # Errors
    ///
    /// See [`CheckoutFlow::begin`].
    pub fn begin_checkout(&self) -> Result<CheckoutFlow, CheckoutError> {
        CheckoutFlow::begin(&self.session, &self.cart)
    }

    /// Place the order under review with the configured pricing and delay.
    ///
    /// # Errors
    ///
    /// See [`CheckoutFlow::place_order`].
    pub async fn place_order(
        &mut self,
        flow: &mut CheckoutFlow,
    ) -> Result<OrderConfirmation, CheckoutError> {
        flow.place_order(
            &mut self.cart,
            &self.snapshot,
            &self.config.pricing,
            self.config.order_delay,
        )
        .await
    }
}
