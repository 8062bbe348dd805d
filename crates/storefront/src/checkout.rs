//! Checkout wizard.
//!
//! The flow walks `Shipping -> Payment -> Review -> Confirmation`. It keeps
//! its own form state and only touches the cart when the order is placed,
//! at which point the cart is cleared.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use shopfront_core::{Price, ProductId};

use crate::catalog::CatalogSnapshot;
use crate::config::PricingConfig;
use crate::error::add_breadcrumb;
use crate::stores::{CartStore, SessionStore};
use crate::views;

/// Errors raised while moving through checkout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("sign in to check out")]
    NotAuthenticated,

    #[error("cart is empty")]
    EmptyCart,

    #[error("no cart item could be priced against the catalog")]
    UnresolvedCart,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("expected {expected} step, currently at {actual}")]
    WrongStep {
        expected: CheckoutStep,
        actual: CheckoutStep,
    },
}

/// Wizard position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStep {
    Shipping,
    Payment,
    Review,
    Confirmation,
}

impl std::fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Shipping => "shipping",
            Self::Payment => "payment",
            Self::Review => "review",
            Self::Confirmation => "confirmation",
        })
    }
}

/// Shipping address form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
    pub full_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub phone: String,
}

impl ShippingInfo {
    fn validate(&self) -> Result<(), CheckoutError> {
        let fields = [
            ("full name", &self.full_name),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("zip code", &self.zip_code),
            ("country", &self.country),
            ("phone", &self.phone),
        ];
        require_all(&fields)
    }
}

/// Card form. Number and CVC never appear in `Debug` output.
#[derive(Clone)]
pub struct CardDetails {
    pub card_number: SecretString,
    pub expiry: String,
    pub cvc: SecretString,
    pub name_on_card: String,
}

impl std::fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardDetails")
            .field("card_number", &"[REDACTED]")
            .field("expiry", &self.expiry)
            .field("cvc", &"[REDACTED]")
            .field("name_on_card", &self.name_on_card)
            .finish()
    }
}

impl CardDetails {
    fn validate(&self) -> Result<(), CheckoutError> {
        let fields = [
            ("card number", self.card_number.expose_secret()),
            ("expiry date", self.expiry.as_str()),
            ("CVC", self.cvc.expose_secret()),
            ("name on card", self.name_on_card.as_str()),
        ];
        require_all(&fields)
    }

    /// Last four digits of the card number.
    #[must_use]
    pub fn last4(&self) -> String {
        let digits: Vec<char> = self
            .card_number
            .expose_secret()
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        digits
            .get(digits.len().saturating_sub(4)..)
            .unwrap_or_default()
            .iter()
            .collect()
    }
}

/// How the order is paid.
#[derive(Debug, Clone)]
pub enum PaymentMethod {
    CreditCard(CardDetails),
    PayPal,
}

impl PaymentMethod {
    /// Label shown on the review and confirmation pages.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::CreditCard(card) => format!("Credit Card ending in {}", card.last4()),
            Self::PayPal => "PayPal".to_string(),
        }
    }
}

/// Money breakdown for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub subtotal: Price,
    pub shipping: Price,
    pub tax: Price,
    pub total: Price,
}

impl OrderSummary {
    /// Apply flat shipping and the tax rate to a subtotal. Tax is rounded
    /// to cents.
    #[must_use]
    pub fn from_subtotal(subtotal: Decimal, pricing: &PricingConfig) -> Self {
        let tax = subtotal
            .saturating_mul(pricing.tax_rate)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        Self {
            subtotal: Price::usd(subtotal),
            shipping: Price::usd(pricing.shipping_flat),
            tax: Price::usd(tax),
            total: Price::usd(
                subtotal
                    .saturating_add(pricing.shipping_flat)
                    .saturating_add(tax),
            ),
        }
    }
}

/// One priced line on a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub title: String,
    pub quantity: u32,
    pub unit_price: Price,
    pub line_total: Price,
}

/// Result of a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderConfirmation {
    pub order_id: Uuid,
    pub placed_at: DateTime<Utc>,
    pub lines: Vec<OrderLine>,
    pub summary: OrderSummary,
    pub shipping: ShippingInfo,
    pub payment: String,
}

/// Checkout wizard state.
#[derive(Debug)]
pub struct CheckoutFlow {
    step: CheckoutStep,
    shipping: Option<ShippingInfo>,
    payment: Option<PaymentMethod>,
    confirmation: Option<OrderConfirmation>,
}

impl CheckoutFlow {
    /// Start checkout.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::NotAuthenticated` without an identity and
    /// `CheckoutError::EmptyCart` when there is nothing to buy.
    pub fn begin(session: &SessionStore, cart: &CartStore) -> Result<Self, CheckoutError> {
        if !session.is_authenticated() {
            return Err(CheckoutError::NotAuthenticated);
        }
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        add_breadcrumb("checkout", "Checkout started", None);
        Ok(Self {
            step: CheckoutStep::Shipping,
            shipping: None,
            payment: None,
            confirmation: None,
        })
    }

    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        self.step
    }

    #[must_use]
    pub const fn shipping(&self) -> Option<&ShippingInfo> {
        self.shipping.as_ref()
    }

    #[must_use]
    pub const fn payment(&self) -> Option<&PaymentMethod> {
        self.payment.as_ref()
    }

    #[must_use]
    pub const fn confirmation(&self) -> Option<&OrderConfirmation> {
        self.confirmation.as_ref()
    }

    /// Accept the shipping form and move to payment.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::WrongStep` outside the shipping step and
    /// `CheckoutError::MissingField` for the first blank field.
    pub fn submit_shipping(&mut self, info: ShippingInfo) -> Result<(), CheckoutError> {
        self.expect_step(CheckoutStep::Shipping)?;
        info.validate()?;
        self.shipping = Some(info);
        self.step = CheckoutStep::Payment;
        debug!("shipping accepted");
        Ok(())
    }

    /// Accept the payment form and move to review.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::WrongStep` outside the payment step and
    /// `CheckoutError::MissingField` for the first blank card field.
    pub fn submit_payment(&mut self, method: PaymentMethod) -> Result<(), CheckoutError> {
        self.expect_step(CheckoutStep::Payment)?;
        if let PaymentMethod::CreditCard(card) = &method {
            card.validate()?;
        }
        self.payment = Some(method);
        self.step = CheckoutStep::Review;
        debug!("payment accepted");
        Ok(())
    }

    /// Go back one step. Forms already entered are kept.
    pub fn back(&mut self) -> CheckoutStep {
        self.step = match self.step {
            CheckoutStep::Payment => CheckoutStep::Shipping,
            CheckoutStep::Review => CheckoutStep::Payment,
            other => other,
        };
        self.step
    }

    /// Place the order: price the cart, wait out `delay`, clear the cart
    /// and move to confirmation.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::WrongStep` outside the review step,
    /// `CheckoutError::EmptyCart` if the cart was emptied meanwhile, and
    /// `CheckoutError::UnresolvedCart` if the catalog prices none of it. The
    /// cart is left untouched on error.
    #[instrument(skip_all)]
    pub async fn place_order(
        &mut self,
        cart: &mut CartStore,
        catalog: &CatalogSnapshot,
        pricing: &PricingConfig,
        delay: Duration,
    ) -> Result<OrderConfirmation, CheckoutError> {
        self.expect_step(CheckoutStep::Review)?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let lines: Vec<OrderLine> = views::cart_lines(cart.entries(), catalog)
            .into_iter()
            .map(|line| OrderLine {
                product_id: line.product.id,
                title: line.product.title.clone(),
                quantity: line.quantity,
                unit_price: line.unit_price(),
                line_total: line.line_total(),
            })
            .collect();
        if lines.is_empty() {
            return Err(CheckoutError::UnresolvedCart);
        }
        let summary = OrderSummary::from_subtotal(cart.subtotal(catalog), pricing);
        let payment = self
            .payment
            .as_ref()
            .map(PaymentMethod::label)
            .unwrap_or_default();

        tokio::time::sleep(delay).await;

        let confirmation = OrderConfirmation {
            order_id: Uuid::new_v4(),
            placed_at: Utc::now(),
            lines,
            summary,
            shipping: self.shipping.clone().unwrap_or_default(),
            payment,
        };

        cart.clear();
        self.step = CheckoutStep::Confirmation;
        self.confirmation = Some(confirmation.clone());

        info!(
            order_id = %confirmation.order_id,
            total = %confirmation.summary.total,
            "order placed"
        );
        add_breadcrumb(
            "checkout",
            "Order placed",
            Some(&[("order_id", confirmation.order_id.to_string().as_str())]),
        );

        Ok(confirmation)
    }

    fn expect_step(&self, expected: CheckoutStep) -> Result<(), CheckoutError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(CheckoutError::WrongStep {
                expected,
                actual: self.step,
            })
        }
    }
}

fn require_all<S: AsRef<str>>(fields: &[(&'static str, S)]) -> Result<(), CheckoutError> {
    fields
        .iter()
        .find(|(_, value)| value.as_ref().trim().is_empty())
        .map_or(Ok(()), |(name, _)| Err(CheckoutError::MissingField(*name)))
}
