//! Derived views over store and catalog snapshots.
//!
//! Everything here is a pure function of its arguments and is recomputed on
//! every call. Inputs are bounded by one shopping session, so nothing is
//! memoized.
//!
//! Counts and prices split on purpose: [`item_count`] counts every entry,
//! while [`subtotal`] and [`cart_lines`] only see entries the catalog
//! snapshot can resolve. A product that disappeared from the catalog still
//! shows in the badge count but contributes nothing to the money.

use rust_decimal::Decimal;

use shopfront_core::{CartEntry, Identity, Price, Product, ProductId};

use crate::catalog::CatalogSnapshot;

/// Total units across all cart entries.
#[must_use]
pub fn item_count(entries: &[CartEntry]) -> u64 {
    entries.iter().map(|e| u64::from(e.quantity)).sum()
}

/// Sum of `quantity x price` over entries the catalog resolves.
///
/// Saturates at `Decimal::MAX` instead of overflowing.
#[must_use]
pub fn subtotal(entries: &[CartEntry], catalog: &CatalogSnapshot) -> Decimal {
    entries
        .iter()
        .filter_map(|e| {
            catalog
                .price_of(e.product_id)
                .map(|p| p.saturating_mul(Decimal::from(e.quantity)))
        })
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Wishlist membership.
#[must_use]
pub fn is_in_wishlist(wishlist: &[ProductId], product_id: ProductId) -> bool {
    wishlist.contains(&product_id)
}

/// Whether an identity is present.
#[must_use]
pub const fn is_authenticated(identity: Option<&Identity>) -> bool {
    identity.is_some()
}

/// A cart entry joined to its product.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine<'a> {
    pub product: &'a Product,
    pub quantity: u32,
}

impl CartLine<'_> {
    /// Unit price.
    #[must_use]
    pub const fn unit_price(&self) -> Price {
        self.product.unit_price()
    }

    /// `quantity x unit price`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price().times(self.quantity)
    }
}

/// Entries the catalog resolves, in cart order.
#[must_use]
pub fn cart_lines<'a>(entries: &[CartEntry], catalog: &'a CatalogSnapshot) -> Vec<CartLine<'a>> {
    entries
        .iter()
        .filter_map(|e| {
            catalog.get(e.product_id).map(|product| CartLine {
                product,
                quantity: e.quantity,
            })
        })
        .collect()
}

/// Entries the catalog does not know about.
#[must_use]
pub fn unresolved_entries(entries: &[CartEntry], catalog: &CatalogSnapshot) -> Vec<CartEntry> {
    entries
        .iter()
        .filter(|e| catalog.get(e.product_id).is_none())
        .copied()
        .collect()
}

/// Wishlisted products the catalog resolves, in wishlist order.
#[must_use]
pub fn wishlist_products<'a>(
    wishlist: &[ProductId],
    catalog: &'a CatalogSnapshot,
) -> Vec<&'a Product> {
    wishlist.iter().filter_map(|id| catalog.get(*id)).collect()
}

/// The `n` best-rated products, best first. Ties keep catalog order.
#[must_use]
pub fn featured_products(catalog: &CatalogSnapshot, n: usize) -> Vec<&Product> {
    let mut products: Vec<&Product> = catalog.products().iter().collect();
    products.sort_by(|a, b| b.rating.rate.total_cmp(&a.rating.rate));
    products.truncate(n);
    products
}

/// Up to `n` of `candidates` other than `current`, in listing order.
///
/// `candidates` is normally the category listing of the current product.
#[must_use]
pub fn related_products(candidates: &[Product], current: ProductId, n: usize) -> Vec<&Product> {
    candidates
        .iter()
        .filter(|p| p.id != current)
        .take(n)
        .collect()
}

/// Everything the cart page shows.
#[derive(Debug, Clone, PartialEq)]
pub struct CartSummary<'a> {
    pub lines: Vec<CartLine<'a>>,
    /// Entries that could not be priced.
    pub unresolved: Vec<CartEntry>,
    pub item_count: u64,
    pub subtotal: Price,
}

/// Build the cart page view.
#[must_use]
pub fn cart_summary<'a>(entries: &[CartEntry], catalog: &'a CatalogSnapshot) -> CartSummary<'a> {
    CartSummary {
        lines: cart_lines(entries, catalog),
        unresolved: unresolved_entries(entries, catalog),
        item_count: item_count(entries),
        subtotal: Price::usd(subtotal(entries, catalog)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopfront_core::Email;

    use super::*;
    use crate::catalog::test_support::product;

    fn entry(id: i32, quantity: u32) -> CartEntry {
        CartEntry {
            product_id: ProductId::new(id),
            quantity,
        }
    }

    fn catalog() -> CatalogSnapshot {
        CatalogSnapshot::new(vec![
            product(1, Decimal::new(1000, 2)),
            product(2, Decimal::new(500, 2)),
        ])
    }

    #[test]
    fn test_subtotal_joins_prices() {
        let entries = [entry(1, 2), entry(2, 1)];
        assert_eq!(subtotal(&entries, &catalog()), Decimal::new(2500, 2));
        assert_eq!(item_count(&entries), 3);
    }

    #[test]
    fn test_stale_entry_split() {
        let entries = [entry(99, 3)];
        let catalog = catalog();
        assert_eq!(subtotal(&entries, &catalog), Decimal::ZERO);
        assert_eq!(item_count(&entries), 3);
        assert!(cart_lines(&entries, &catalog).is_empty());
        assert_eq!(unresolved_entries(&entries, &catalog), vec![entry(99, 3)]);
    }

    #[test]
    fn test_empty_catalog_prices_nothing() {
        let entries = [entry(1, 2)];
        assert_eq!(subtotal(&entries, &CatalogSnapshot::default()), Decimal::ZERO);
    }

    #[test]
    fn test_huge_quantities_saturate() {
        let price = Decimal::from_i128_with_scale(10_i128.pow(20), 0);
        let catalog = CatalogSnapshot::new(vec![product(1, price), product(2, price)]);
        let entries = [entry(1, u32::MAX), entry(2, u32::MAX)];

        assert_eq!(subtotal(&entries, &catalog), Decimal::MAX);
        let summary = cart_summary(&entries, &catalog);
        assert_eq!(summary.subtotal.amount, Decimal::MAX);
        assert_eq!(
            summary.lines.first().unwrap().line_total().amount,
            Decimal::MAX
        );
    }

    #[test]
    fn test_cart_summary() {
        let entries = [entry(2, 4), entry(42, 1), entry(1, 1)];
        let catalog = catalog();
        let summary = cart_summary(&entries, &catalog);

        assert_eq!(summary.item_count, 6);
        assert_eq!(summary.subtotal.display(), "$30.00");
        let ids: Vec<i32> = summary.lines.iter().map(|l| l.product.id.as_i32()).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(summary.lines.first().unwrap().line_total().display(), "$20.00");
        assert_eq!(summary.unresolved, vec![entry(42, 1)]);
    }

    #[test]
    fn test_wishlist_views() {
        let wishlist = [ProductId::new(2), ProductId::new(77)];
        assert!(is_in_wishlist(&wishlist, ProductId::new(2)));
        assert!(!is_in_wishlist(&wishlist, ProductId::new(1)));

        let catalog = catalog();
        let products = wishlist_products(&wishlist, &catalog);
        assert_eq!(products.len(), 1);
        assert_eq!(products.first().unwrap().id, ProductId::new(2));
    }

    fn rated(id: i32, rate: f64) -> Product {
        let mut p = product(id, Decimal::ONE);
        p.rating.rate = rate;
        p
    }

    #[test]
    fn test_featured_products_by_rating() {
        let catalog = CatalogSnapshot::new(vec![
            rated(1, 3.9),
            rated(2, 4.7),
            rated(3, 2.1),
            rated(4, 4.7),
            rated(5, 4.1),
        ]);
        let ids: Vec<i32> = featured_products(&catalog, 3)
            .iter()
            .map(|p| p.id.as_i32())
            .collect();
        assert_eq!(ids, vec![2, 4, 5]);

        assert_eq!(featured_products(&catalog, 10).len(), 5);
        assert!(featured_products(&CatalogSnapshot::default(), 4).is_empty());
    }

    #[test]
    fn test_related_products_skip_current() {
        let listing: Vec<Product> = (1..=6).map(|id| rated(id, 4.0)).collect();
        let ids: Vec<i32> = related_products(&listing, ProductId::new(2), 4)
            .iter()
            .map(|p| p.id.as_i32())
            .collect();
        assert_eq!(ids, vec![1, 3, 4, 5]);

        let only = [rated(9, 1.0)];
        assert!(related_products(&only, ProductId::new(9), 4).is_empty());
    }

    #[test]
    fn test_is_authenticated() {
        assert!(!is_authenticated(None));
        let identity = Identity {
            id: "1".to_string(),
            display_name: "Demo User".to_string(),
            email: Email::parse("demo@example.com").unwrap(),
            session_token: None,
        };
        assert!(is_authenticated(Some(&identity)));
    }
}
