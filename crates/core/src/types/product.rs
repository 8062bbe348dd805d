//! Catalog product types.
//!
//! These mirror the JSON shape served by the product catalog:
//!
//! ```json
//! {
//!   "id": 1,
//!   "title": "Fjallraven - Foldsack No. 1 Backpack",
//!   "price": 109.95,
//!   "description": "Your perfect pack for everyday use",
//!   "category": "men's clothing",
//!   "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
//!   "rating": { "rate": 3.9, "count": 120 }
//! }
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// Category names are free-form strings chosen by the catalog.
pub type Category = String;

/// A product as served by the catalog. Read-only to this system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    /// Unit price in US dollars.
    pub price: Decimal,
    pub description: String,
    pub category: Category,
    /// Image URL.
    pub image: String,
    #[serde(default)]
    pub rating: Rating,
}

impl Product {
    /// Unit price with currency attached.
    #[must_use]
    pub const fn unit_price(&self) -> Price {
        Price::usd(self.price)
    }
}

/// Aggregate review score.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rating {
    /// Average score, 0 to 5.
    pub rate: f64,
    /// Number of reviews.
    pub count: u32,
}
