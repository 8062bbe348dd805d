//! Cart line entry.

use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// One product the visitor intends to buy, with how many.
///
/// Serialized as `{"id": 1, "quantity": 2}`, the shape persisted under the
/// `cart` storage key. A well-formed entry always has `quantity >= 1`; the
/// cart store drops anything else when loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartEntry {
    #[serde(rename = "id")]
    pub product_id: ProductId,
    pub quantity: u32,
}

impl CartEntry {
    /// A fresh entry holding a single unit.
    #[must_use]
    pub const fn single(product_id: ProductId) -> Self {
        Self {
            product_id,
            quantity: 1,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let entry = CartEntry {
            product_id: ProductId::new(3),
            quantity: 2,
        };
        assert_eq!(
            serde_json::to_string(&entry).unwrap(),
            r#"{"id":3,"quantity":2}"#
        );
    }

    #[test]
    fn test_single() {
        assert_eq!(CartEntry::single(ProductId::new(9)).quantity, 1);
    }
}
