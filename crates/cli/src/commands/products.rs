//! Catalog browsing.

use std::cmp::Ordering;

use clap::ValueEnum;
use tracing::warn;

use shopfront::catalog::ProductCatalog;
use shopfront::error::Result;
use shopfront::views;
use shopfront_core::{Product, ProductId};

use super::Shop;
use crate::output;

/// Products on the featured shelf.
const FEATURED_LIMIT: usize = 4;

/// Related products under a product detail.
const RELATED_LIMIT: usize = 4;

/// Listing order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    /// Highest id first
    #[default]
    Newest,
    PriceLow,
    PriceHigh,
    Name,
    Rating,
}

/// One page of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-based
    pub number: usize,
    pub size: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self { number: 1, size: 8 }
    }
}

pub async fn list(
    state: &Shop,
    category: Option<&str>,
    sort: SortOrder,
    page: Page,
) -> Result<()> {
    let mut products = match category {
        Some(category) => state.catalog().list_products_by_category(category).await?,
        None => state.catalog().list_products().await?,
    };
    let total = products.len();
    sort_products(&mut products, sort);

    let shown = paginate(&products, page);
    if shown.is_empty() {
        output::line("No products found");
        return Ok(());
    }
    for product in shown {
        output::product_row(product, state.is_in_wishlist(product.id));
    }
    output::line(format!(
        "Page {} of {} ({total} products)",
        page.number,
        total.div_ceil(page.size.max(1))
    ));
    Ok(())
}

pub async fn show(state: &Shop, id: ProductId) -> Result<()> {
    let product = state.catalog().get_product(id).await?;
    output::product_detail(
        &product,
        state.is_in_wishlist(id),
        state.cart().quantity_of(id),
    );

    match state
        .catalog()
        .list_products_by_category(&product.category)
        .await
    {
        Ok(listing) => {
            let related = views::related_products(&listing, id, RELATED_LIMIT);
            if !related.is_empty() {
                output::line("");
                output::line("Related products");
                for product in related {
                    output::product_row(product, state.is_in_wishlist(product.id));
                }
            }
        }
        Err(e) => warn!(error = %e, "related products unavailable"),
    }
    Ok(())
}

/// Best-rated products.
pub async fn featured(state: &mut Shop) -> Result<()> {
    state.refresh_catalog().await?;
    let featured = views::featured_products(state.snapshot(), FEATURED_LIMIT);
    if featured.is_empty() {
        output::line("No products found");
        return Ok(());
    }
    for product in featured {
        output::product_row(product, state.is_in_wishlist(product.id));
    }
    Ok(())
}

pub async fn categories(state: &Shop) -> Result<()> {
    for category in state.catalog().list_categories().await? {
        output::line(category);
    }
    Ok(())
}

fn sort_products(products: &mut [Product], sort: SortOrder) {
    match sort {
        SortOrder::Newest => products.sort_by(|a, b| b.id.cmp(&a.id)),
        SortOrder::PriceLow => products.sort_by(|a, b| a.price.cmp(&b.price)),
        SortOrder::PriceHigh => products.sort_by(|a, b| b.price.cmp(&a.price)),
        SortOrder::Name => products.sort_by(|a, b| a.title.cmp(&b.title)),
        SortOrder::Rating => products.sort_by(|a, b| {
            b.rating
                .rate
                .partial_cmp(&a.rating.rate)
                .unwrap_or(Ordering::Equal)
        }),
    }
}

fn paginate(products: &[Product], page: Page) -> &[Product] {
    let size = page.size.max(1);
    let start = page.number.saturating_sub(1).saturating_mul(size);
    let end = start.saturating_add(size).min(products.len());
    products.get(start..end).unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use shopfront_core::Rating;

    use super::*;

    fn product(id: i32, title: &str, cents: i64, rate: f64) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_string(),
            price: Decimal::new(cents, 2),
            description: String::new(),
            category: "electronics".to_string(),
            image: String::new(),
            rating: Rating { rate, count: 1 },
        }
    }

    fn ids(products: &[Product]) -> Vec<i32> {
        products.iter().map(|p| p.id.as_i32()).collect()
    }

    #[test]
    fn test_sort_orders() {
        let mut products = vec![
            product(1, "Backpack", 10995, 3.9),
            product(2, "T-Shirt", 2230, 4.1),
            product(3, "Jacket", 5599, 4.7),
        ];
        sort_products(&mut products, SortOrder::Newest);
        assert_eq!(ids(&products), vec![3, 2, 1]);
        sort_products(&mut products, SortOrder::PriceLow);
        assert_eq!(ids(&products), vec![2, 3, 1]);
        sort_products(&mut products, SortOrder::PriceHigh);
        assert_eq!(ids(&products), vec![1, 3, 2]);
        sort_products(&mut products, SortOrder::Name);
        assert_eq!(ids(&products), vec![1, 3, 2]);
        sort_products(&mut products, SortOrder::Rating);
        assert_eq!(ids(&products), vec![3, 2, 1]);
    }

    #[test]
    fn test_paginate() {
        let products: Vec<Product> = (1..=10).map(|i| product(i, "p", 100, 1.0)).collect();
        let page = |number, size| Page { number, size };

        assert_eq!(ids(paginate(&products, Page::default())), (1..=8).collect::<Vec<_>>());
        assert_eq!(ids(paginate(&products, page(2, 8))), vec![9, 10]);
        assert!(paginate(&products, page(3, 8)).is_empty());
        assert_eq!(ids(paginate(&products, page(0, 3))), vec![1, 2, 3]);
    }
}
