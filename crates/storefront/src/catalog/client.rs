//! HTTP client for the Fake Store catalog API.
//!
//! Uses `reqwest` for HTTP and caches every response in `moka`
//! (TTL from configuration, 1000 entries).
//!
//! # Endpoints
//!
//! - `GET /products`
//! - `GET /products/{id}`
//! - `GET /products/categories`
//! - `GET /products/category/{category}`

use std::sync::Arc;

use moka::future::Cache;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use shopfront_core::{Category, Product, ProductId};

use super::cache::{CacheKey, CacheValue};
use super::{CatalogError, ProductCatalog};
use crate::config::CatalogConfig;

/// Longest slice of a response body carried into errors and logs.
const BODY_SNIPPET_LEN: usize = 200;

/// Client for the Fake Store REST API.
///
/// Cheap to clone; clones share the connection pool and the cache.
#[derive(Clone)]
pub struct FakeStoreClient {
    inner: Arc<FakeStoreClientInner>,
}

struct FakeStoreClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl std::fmt::Debug for FakeStoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeStoreClient")
            .field("base_url", &self.inner.base_url)
            .field("cached_entries", &self.inner.cache.entry_count())
            .finish()
    }
}

impl FakeStoreClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("shopfront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(FakeStoreClientInner {
                client,
                base_url: config.base_url.as_str().trim_end_matches('/').to_owned(),
                cache,
            }),
        })
    }

    /// Drop every cached response.
    pub fn invalidate_cache(&self) {
        self.inner.cache.invalidate_all();
    }

    /// GET `path` and decode the JSON body.
    ///
    /// The upstream API answers unknown product ids with `200` and an empty
    /// (or `null`) body; that, and a 404, come back as `Ok(None)`. Callers
    /// decide what a missing body means for their endpoint.
    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, CatalogError> {
        let url = format!("{}{path}", self.inner.base_url);

        let response = self
            .inner
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CatalogError::RateLimited(retry_after));
        }

        let body = response.text().await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            tracing::error!(
                status = %status,
                url = %url,
                body = %snippet(&body),
                "catalog returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
                message: snippet(&body),
            });
        }

        let trimmed = body.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(None);
        }

        match serde_json::from_str(trimmed) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    url = %url,
                    body = %snippet(trimmed),
                    "failed to parse catalog response"
                );
                Err(CatalogError::Parse(e))
            }
        }
    }

    async fn cached_products(
        &self,
        key: CacheKey,
        path: &str,
    ) -> Result<Vec<Product>, CatalogError> {
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&key).await {
            debug!(?key, "cache hit");
            return Ok(products);
        }

        // A list endpoint always answers with an array. A missing body is an
        // outage, not an empty catalog, and is never cached.
        let products: Vec<Product> = self
            .fetch(path)
            .await?
            .ok_or_else(|| CatalogError::EmptyResponse(path.to_owned()))?;

        for product in &products {
            self.inner
                .cache
                .insert(
                    CacheKey::Product(product.id),
                    CacheValue::Product(Box::new(product.clone())),
                )
                .await;
        }
        self.inner
            .cache
            .insert(key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }
}

impl ProductCatalog for FakeStoreClient {
    #[instrument(skip(self))]
    async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        self.cached_products(CacheKey::Products, "/products").await
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let key = CacheKey::Product(id);

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!("cache hit for product");
            return Ok(*product);
        }

        let product: Product = self
            .fetch(&format!("/products/{id}"))
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("product {id}")))?;

        self.inner
            .cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    #[instrument(skip(self))]
    async fn list_categories(&self) -> Result<Vec<Category>, CatalogError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("cache hit for categories");
            return Ok(categories);
        }

        let categories: Vec<Category> = self
            .fetch("/products/categories")
            .await?
            .ok_or_else(|| CatalogError::EmptyResponse("/products/categories".to_owned()))?;

        self.inner
            .cache
            .insert(
                CacheKey::Categories,
                CacheValue::Categories(categories.clone()),
            )
            .await;

        Ok(categories)
    }

    #[instrument(skip(self), fields(category = %category))]
    async fn list_products_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<Product>, CatalogError> {
        // Category names contain spaces and apostrophes ("men's clothing").
        let path = format!("/products/category/{}", urlencoding::encode(category));
        self.cached_products(CacheKey::Category(category.to_owned()), &path)
            .await
    }
}

fn snippet(body: &str) -> String {
    body.chars().take(BODY_SNIPPET_LEN).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use rust_decimal::Decimal;
    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> FakeStoreClient {
        let config = CatalogConfig {
            base_url: Url::parse(&server.uri()).unwrap(),
            timeout: Duration::from_secs(5),
            cache_ttl: Duration::from_secs(300),
        };
        FakeStoreClient::new(&config).unwrap()
    }

    fn product_json(id: i32, price: f64, category: &str) -> serde_json::Value {
        json!({
            "id": id,
            "title": format!("Product {id}"),
            "price": price,
            "description": "",
            "category": category,
            "image": "https://fakestoreapi.com/img/x.jpg",
            "rating": { "rate": 4.1, "count": 259 }
        })
    }

    #[tokio::test]
    async fn test_list_products_is_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                product_json(1, 109.95, "men's clothing"),
                product_json(2, 22.3, "men's clothing"),
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let first = client.list_products().await.unwrap();
        let second = client.list_products().await.unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
        assert_eq!(first[0].price, Decimal::new(10995, 2));

        // Served from the per-product entries seeded by the list call.
        let product = client.get_product(ProductId::new(2)).await.unwrap();
        assert_eq!(product.price, Decimal::new(223, 1));
    }

    #[tokio::test]
    async fn test_get_product_empty_body_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/999"))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.get_product(ProductId::new(999)).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_category_path_is_percent_encoded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/category/men%27s%20clothing"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([product_json(1, 109.95, "men's clothing")])),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let products = client
            .list_products_by_category("men's clothing")
            .await
            .unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].category, "men's clothing");
    }

    #[tokio::test]
    async fn test_missing_list_is_an_error_and_not_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(404))
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server);
        for _ in 0..2 {
            assert!(matches!(
                client.list_products().await,
                Err(CatalogError::EmptyResponse(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_null_category_listing_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/category/jewelery"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(matches!(
            client.list_products_by_category("jewelery").await,
            Err(CatalogError::EmptyResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_categories() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/categories"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!(["electronics", "jewelery"])),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert_eq!(
            client.list_categories().await.unwrap(),
            vec!["electronics".to_string(), "jewelery".to_string()]
        );
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "30"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.list_products().await.unwrap_err();
        assert!(matches!(err, CatalogError::RateLimited(30)));
    }

    #[tokio::test]
    async fn test_server_error_is_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        match client.list_products().await.unwrap_err() {
            CatalogError::Status { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "maintenance");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
