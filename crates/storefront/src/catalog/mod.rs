//! Product catalog collaborator.
//!
//! # Architecture
//!
//! - The catalog is read-only and remote; stores never mutate it
//! - [`ProductCatalog`] is the seam; [`FakeStoreClient`] speaks the
//!   `fakestoreapi.com` REST shape and [`StaticCatalog`] serves a fixed list
//! - In-memory caching via `moka` for HTTP responses (5 minute TTL by default)
//! - Derived views work on a [`CatalogSnapshot`], an immutable copy of the
//!   last product list that resolved
//!
//! No retry policy lives here. Request timeouts are the HTTP client's.

mod cache;
mod client;
mod fixed;

pub use client::FakeStoreClient;
pub use fixed::StaticCatalog;

use std::collections::HashMap;
use std::future::Future;

use rust_decimal::Decimal;
use thiserror::Error;

use shopfront_core::{Category, Product, ProductId};

/// Errors that can occur when talking to the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog answered with a non-success status.
    #[error("catalog returned HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// First part of the response body.
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A list endpoint answered 404 or with an empty body.
    #[error("catalog returned no data for {0}")]
    EmptyResponse(String),

    /// Rate limited by the catalog.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The catalog is switched off (offline fixtures).
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Read-only product source.
///
/// Methods return `Send` futures so callers can hold them across `.await`
/// on a multi-threaded runtime.
pub trait ProductCatalog: Send + Sync {
    /// Every product, in catalog order.
    fn list_products(&self) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send;

    /// One product.
    ///
    /// Resolves to [`CatalogError::NotFound`] when the id is unknown.
    fn get_product(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<Product, CatalogError>> + Send;

    /// Category names.
    fn list_categories(&self) -> impl Future<Output = Result<Vec<Category>, CatalogError>> + Send;

    /// Products in one category. Unknown categories yield an empty list.
    fn list_products_by_category(
        &self,
        category: &str,
    ) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send;
}

/// Immutable point-in-time copy of the catalog.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
}

impl CatalogSnapshot {
    /// Build a snapshot. A repeated id keeps its first occurrence.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        let mut index = HashMap::with_capacity(products.len());
        let mut unique = Vec::with_capacity(products.len());
        for product in products {
            if !index.contains_key(&product.id) {
                index.insert(product.id, unique.len());
                unique.push(product);
            }
        }
        Self {
            products: unique,
            index,
        }
    }

    /// Look up a product.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.index.get(&id).and_then(|&i| self.products.get(i))
    }

    /// Unit price of a product, if the snapshot knows it.
    #[must_use]
    pub fn price_of(&self, id: ProductId) -> Option<Decimal> {
        self.get(id).map(|p| p.price)
    }

    /// Products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl From<Vec<Product>> for CatalogSnapshot {
    fn from(products: Vec<Product>) -> Self {
        Self::new(products)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use rust_decimal::Decimal;

    use shopfront_core::{Product, ProductId, Rating};

    /// Minimal product with the given id and price.
    pub(crate) fn product(id: i32, price: Decimal) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            price,
            description: String::new(),
            category: "electronics".to_string(),
            image: format!("https://img.test/{id}.png"),
            rating: Rating::default(),
        }
    }
}
