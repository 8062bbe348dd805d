//! Fixed in-memory catalog.

use std::sync::atomic::{AtomicBool, Ordering};

use shopfront_core::{Category, Product, ProductId};

use super::{CatalogError, ProductCatalog};

/// Catalog serving a fixed product list.
///
/// Used for offline runs and tests. It can be switched off with
/// [`set_available`](Self::set_available) to exercise the
/// "catalog unavailable" path.
#[derive(Debug)]
pub struct StaticCatalog {
    products: Vec<Product>,
    available: AtomicBool,
}

impl StaticCatalog {
    /// Serve `products` in the given order.
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            available: AtomicBool::new(true),
        }
    }

    /// Toggle availability; while off every call fails.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), CatalogError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(CatalogError::Unavailable("static catalog switched off".to_string()))
        }
    }
}

impl ProductCatalog for StaticCatalog {
    async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        self.check()?;
        Ok(self.products.clone())
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.check()?;
        self.products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("product {id}")))
    }

    async fn list_categories(&self) -> Result<Vec<Category>, CatalogError> {
        self.check()?;
        let mut categories: Vec<Category> = Vec::new();
        for product in &self.products {
            if !categories.contains(&product.category) {
                categories.push(product.category.clone());
            }
        }
        Ok(categories)
    }

    async fn list_products_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<Product>, CatalogError> {
        self.check()?;
        Ok(self
            .products
            .iter()
            .filter(|p| p.category == category)
            .cloned()
            .collect())
    }
}
