//! Checkout command: runs the whole wizard from flags.

use clap::Args;
use secrecy::SecretString;

use shopfront::checkout::{CardDetails, PaymentMethod, ShippingInfo};
use shopfront::error::Result;

use super::Shop;
use crate::output;

#[derive(Debug, Args)]
pub struct CheckoutArgs {
    #[arg(long)]
    full_name: String,
    #[arg(long)]
    address: String,
    #[arg(long)]
    city: String,
    #[arg(long)]
    state: String,
    #[arg(long)]
    zip_code: String,
    #[arg(long)]
    country: String,
    #[arg(long)]
    phone: String,

    /// Pay with PayPal instead of a card
    #[arg(long, conflicts_with_all = ["card_number", "expiry", "cvc", "name_on_card"])]
    paypal: bool,
    #[arg(long)]
    card_number: Option<String>,
    /// Card expiry, MM/YY
    #[arg(long)]
    expiry: Option<String>,
    #[arg(long)]
    cvc: Option<String>,
    #[arg(long)]
    name_on_card: Option<String>,
}

impl CheckoutArgs {
    fn shipping(&self) -> ShippingInfo {
        ShippingInfo {
            full_name: self.full_name.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            zip_code: self.zip_code.clone(),
            country: self.country.clone(),
            phone: self.phone.clone(),
        }
    }

    fn payment(self) -> PaymentMethod {
        if self.paypal {
            return PaymentMethod::PayPal;
        }
        PaymentMethod::CreditCard(CardDetails {
            card_number: SecretString::from(self.card_number.unwrap_or_default()),
            expiry: self.expiry.unwrap_or_default(),
            cvc: SecretString::from(self.cvc.unwrap_or_default()),
            name_on_card: self.name_on_card.unwrap_or_default(),
        })
    }
}

pub async fn run(state: &mut Shop, args: CheckoutArgs) -> Result<()> {
    let mut flow = state.begin_checkout()?;

    // Orders are priced from the live catalog, never a stale snapshot.
    state.refresh_catalog().await?;

    flow.submit_shipping(args.shipping())?;
    flow.submit_payment(args.payment())?;

    output::line("Review");
    output::cart(&state.cart_summary());
    output::order_summary(&state.order_summary());
    output::line("");
    output::line("Processing order...");

    let confirmation = state.place_order(&mut flow).await?;
    output::line("");
    output::confirmation(&confirmation);
    Ok(())
}
