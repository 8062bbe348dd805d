//! Integration tests for Shopfront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! Nothing external is needed: the catalog is either a [`StaticCatalog`] or
//! a `wiremock` server speaking the Fake Store API shape, and state lives in
//! a [`MemoryStore`] or a [`FileStore`] under a temporary directory.
//!
//! # Test Categories
//!
//! - `store_persistence` - Cart, wishlist and session snapshots across reloads
//! - `checkout_flow` - Sign in, fill the cart, place an order
//! - `catalog_http` - Session state against a mocked catalog API

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Value, json};
use tempfile::TempDir;

use shopfront::catalog::StaticCatalog;
use shopfront::config::StorefrontConfig;
use shopfront::persistence::{FileStore, MemoryStore, SharedStorage};
use shopfront::state::AppState;
use shopfront_core::{Product, ProductId, Rating};

/// Three products shaped like the Fake Store API's first entries.
#[must_use]
pub fn fixture_products() -> Vec<Product> {
    vec![
        product(1, "Fjallraven Foldsack No. 1 Backpack", 10995, "men's clothing"),
        product(2, "Mens Casual Premium Slim Fit T-Shirts", 2230, "men's clothing"),
        product(5, "John Hardy Women's Legends Naga Bracelet", 69500, "jewelery"),
    ]
}

/// A product with a fixed rating and placeholder image.
#[must_use]
pub fn product(id: i32, title: &str, cents: i64, category: &str) -> Product {
    Product {
        id: ProductId::new(id),
        title: title.to_string(),
        price: Decimal::new(cents, 2),
        description: format!("{title} description"),
        category: category.to_string(),
        image: format!("https://fakestoreapi.com/img/{id}.jpg"),
        rating: Rating {
            rate: 4.0,
            count: 120,
        },
    }
}

/// JSON for `products` in the catalog API's wire shape.
#[must_use]
pub fn products_json(products: &[Product]) -> Value {
    let items: Vec<Value> = products
        .iter()
        .map(|p| {
            json!({
                "id": p.id.as_i32(),
                "title": p.title,
                "price": p.price.to_f64(),
                "description": p.description,
                "category": p.category,
                "image": p.image,
                "rating": { "rate": p.rating.rate, "count": p.rating.count },
            })
        })
        .collect();
    Value::Array(items)
}

/// Configuration with defaults and no order delay.
///
/// # Panics
///
/// Never; the default lookup has no invalid values.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn test_config() -> StorefrontConfig {
    let mut config = StorefrontConfig::from_lookup(|_| None).unwrap();
    config.order_delay = std::time::Duration::ZERO;
    config
}

/// Fresh in-memory storage.
#[must_use]
pub fn memory_storage() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

/// A file store in a temporary directory. Keep the `TempDir` alive for as
/// long as the store is used.
///
/// # Panics
///
/// Panics if the temporary directory cannot be created.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn file_storage() -> (TempDir, SharedStorage) {
    let dir = tempfile::tempdir().unwrap();
    let storage: SharedStorage = Arc::new(FileStore::open(dir.path()).unwrap());
    (dir, storage)
}

/// Session state over the fixture catalog.
#[must_use]
pub fn static_state(storage: SharedStorage) -> AppState<StaticCatalog> {
    AppState::load(
        test_config(),
        StaticCatalog::new(fixture_products()),
        storage,
    )
}
