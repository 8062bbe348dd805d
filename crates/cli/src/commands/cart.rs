//! Cart commands.

use tracing::info;

use shopfront::error::{Result, add_breadcrumb};
use shopfront_core::ProductId;

use super::{Shop, ensure_positive, refresh_for_view};
use crate::output;

pub async fn show(state: &mut Shop) {
    refresh_for_view(state).await;
    output::cart(&state.cart_summary());
}

pub fn add(state: &mut Shop, id: ProductId) -> Result<()> {
    ensure_positive(id)?;
    state.cart_mut().add(id);
    let id_str = id.to_string();
    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", id_str.as_str())]));
    info!(product_id = %id, "added to cart");
    output::line(format!(
        "Added product {id} to cart ({} items)",
        state.cart().item_count()
    ));
    Ok(())
}

pub fn remove(state: &mut Shop, id: ProductId) {
    if state.cart().contains(id) {
        state.cart_mut().remove(id);
        output::line(format!("Removed product {id} from cart"));
    } else {
        output::line(format!("Product {id} is not in your cart"));
    }
}

pub fn set(state: &mut Shop, id: ProductId, quantity: i64) {
    if !state.cart().contains(id) {
        output::line(format!("Product {id} is not in your cart"));
        return;
    }
    state.cart_mut().set_quantity(id, quantity);
    match state.cart().quantity_of(id) {
        Some(quantity) => output::line(format!("Product {id} quantity set to {quantity}")),
        None => output::line(format!("Removed product {id} from cart")),
    }
}

pub fn clear(state: &mut Shop) {
    state.cart_mut().clear();
    output::line("Cart cleared");
}
