//! End-to-end checkout over the fixture catalog.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use secrecy::SecretString;

use shopfront::checkout::{
    CardDetails, CheckoutError, CheckoutStep, PaymentMethod, ShippingInfo,
};
use shopfront::error::AppError;
use shopfront::persistence::KeyValueStore;
use shopfront::services::auth::{AcceptAnyCredentials, AccountDirectory, AuthService};
use shopfront::stores::keys;
use shopfront_core::ProductId;
use shopfront_integration_tests::{file_storage, memory_storage, static_state};

fn shipping() -> ShippingInfo {
    ShippingInfo {
        full_name: "Demo User".to_string(),
        address: "1 Market St".to_string(),
        city: "San Francisco".to_string(),
        state: "CA".to_string(),
        zip_code: "94105".to_string(),
        country: "US".to_string(),
        phone: "555-0100".to_string(),
    }
}

#[tokio::test]
async fn test_guest_cannot_check_out() {
    let mut state = static_state(memory_storage());
    state.cart_mut().add(ProductId::new(1));

    let err = AppError::from(state.begin_checkout().unwrap_err());
    assert_eq!(err.user_message(), "Please sign in to check out");
}

#[tokio::test]
async fn test_full_checkout_with_directory_account() {
    let (_dir, storage) = file_storage();
    let mut state = static_state(storage.clone());
    state.refresh_catalog().await.unwrap();

    let auth = AuthService::new(AccountDirectory::with_demo_account().unwrap());
    auth.sign_in(
        state.session_mut(),
        "demo@example.com",
        SecretString::from("password123".to_string()),
    )
    .unwrap();

    // 2 x 109.95 + 1 x 22.30 = 242.20
    state.cart_mut().add(ProductId::new(1));
    state.cart_mut().add(ProductId::new(1));
    state.cart_mut().add(ProductId::new(2));
    state.wishlist_mut().add(ProductId::new(5));

    let mut flow = state.begin_checkout().unwrap();
    flow.submit_shipping(shipping()).unwrap();
    flow.submit_payment(PaymentMethod::CreditCard(CardDetails {
        card_number: SecretString::from("4111 1111 1111 1111".to_string()),
        expiry: "01/29".to_string(),
        cvc: SecretString::from("999".to_string()),
        name_on_card: "Demo User".to_string(),
    }))
    .unwrap();
    assert_eq!(flow.step(), CheckoutStep::Review);

    let review = state.order_summary();
    assert_eq!(review.subtotal.amount, Decimal::new(24220, 2));
    assert_eq!(review.tax.amount, Decimal::new(1938, 2));
    assert_eq!(review.total.display(), "$271.58");

    let confirmation = state.place_order(&mut flow).await.unwrap();
    assert_eq!(confirmation.summary, review);
    assert_eq!(confirmation.lines.len(), 2);
    assert_eq!(confirmation.payment, "Credit Card ending in 1111");

    // Cart emptied and persisted empty; wishlist and session untouched.
    assert!(state.cart().is_empty());
    assert_eq!(storage.get(keys::CART).unwrap().as_deref(), Some("[]"));
    assert!(state.is_in_wishlist(ProductId::new(5)));
    assert!(state.is_authenticated());

    // The wizard is done.
    assert_eq!(
        state.place_order(&mut flow).await.unwrap_err(),
        CheckoutError::WrongStep {
            expected: CheckoutStep::Review,
            actual: CheckoutStep::Confirmation
        }
    );
}

#[tokio::test]
async fn test_cart_emptied_during_review() {
    let mut state = static_state(memory_storage());
    state.refresh_catalog().await.unwrap();
    let auth = AuthService::new(AcceptAnyCredentials);
    auth.sign_in(
        state.session_mut(),
        "shopper@example.com",
        SecretString::from("x".to_string()),
    )
    .unwrap();
    state.cart_mut().add(ProductId::new(2));

    let mut flow = state.begin_checkout().unwrap();
    flow.submit_shipping(shipping()).unwrap();
    flow.submit_payment(PaymentMethod::PayPal).unwrap();

    state.cart_mut().clear();
    assert_eq!(
        state.place_order(&mut flow).await.unwrap_err(),
        CheckoutError::EmptyCart
    );
    assert_eq!(flow.step(), CheckoutStep::Review);
}
