//! Session state against a mocked catalog API.

#![allow(clippy::unwrap_used)]

use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shopfront::catalog::{CatalogError, FakeStoreClient, ProductCatalog};
use shopfront::state::AppState;
use shopfront_core::ProductId;
use shopfront_integration_tests::{fixture_products, memory_storage, products_json, test_config};

fn state_for(server: &MockServer) -> AppState<FakeStoreClient> {
    let mut config = test_config();
    config.catalog.base_url = Url::parse(&server.uri()).unwrap();
    let client = FakeStoreClient::new(&config.catalog).unwrap();
    AppState::load(config, client, memory_storage())
}

#[tokio::test]
async fn test_refresh_prices_the_cart() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(products_json(&fixture_products())))
        .mount(&server)
        .await;

    let mut state = state_for(&server);
    state.cart_mut().add(ProductId::new(2));
    state.cart_mut().add(ProductId::new(2));

    state.refresh_catalog().await.unwrap();
    assert_eq!(state.snapshot().len(), 3);
    assert_eq!(state.cart_summary().subtotal.display(), "$44.60");
}

#[tokio::test]
async fn test_outage_keeps_last_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(products_json(&fixture_products())))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut state = state_for(&server);
    state.refresh_catalog().await.unwrap();
    state.catalog().invalidate_cache();

    let err = state.refresh_catalog().await.unwrap_err();
    assert!(matches!(err, CatalogError::Status { status: 503, .. }));
    assert_eq!(state.snapshot().len(), 3);
}

#[tokio::test]
async fn test_missing_product_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/42"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .mount(&server)
        .await;

    let state = state_for(&server);
    let err = state.catalog().get_product(ProductId::new(42)).await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));
}

#[tokio::test]
async fn test_missing_listing_keeps_last_snapshot_and_cart() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(products_json(&fixture_products())))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut state = state_for(&server);
    state.cart_mut().add(ProductId::new(1));
    state.refresh_catalog().await.unwrap();
    state.catalog().invalidate_cache();

    let err = state.refresh_catalog().await.unwrap_err();
    assert!(matches!(err, CatalogError::EmptyResponse(_)));
    assert_eq!(state.snapshot().len(), 3);
    assert_eq!(state.cart_summary().subtotal.display(), "$109.95");
    assert_eq!(state.cart().item_count(), 1);
}
