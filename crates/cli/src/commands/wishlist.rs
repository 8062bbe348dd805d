//! Wishlist commands.

use shopfront::error::{Result, add_breadcrumb};
use shopfront_core::ProductId;

use super::{Shop, ensure_positive, refresh_for_view};
use crate::output;

pub async fn show(state: &mut Shop) {
    if state.wishlist().is_empty() {
        output::line("Your wishlist is empty");
        return;
    }
    refresh_for_view(state).await;

    let products = state.wishlist_products();
    for product in &products {
        output::product_row(product, true);
    }
    let missing = state.wishlist().len().saturating_sub(products.len());
    if missing > 0 {
        output::line(format!("{missing} wishlisted products are unavailable"));
    }
}

pub fn add(state: &mut Shop, id: ProductId) -> Result<()> {
    ensure_positive(id)?;
    if state.is_in_wishlist(id) {
        output::line(format!("Product {id} is already in your wishlist"));
        return Ok(());
    }
    state.wishlist_mut().add(id);
    let id_str = id.to_string();
    add_breadcrumb("wishlist", "Added to wishlist", Some(&[("product_id", id_str.as_str())]));
    output::line(format!("Added product {id} to wishlist"));
    Ok(())
}

pub fn remove(state: &mut Shop, id: ProductId) {
    if state.is_in_wishlist(id) {
        state.wishlist_mut().remove(id);
        output::line(format!("Removed product {id} from wishlist"));
    } else {
        output::line(format!("Product {id} is not in your wishlist"));
    }
}

pub fn clear(state: &mut Shop) {
    state.wishlist_mut().clear();
    output::line("Wishlist cleared");
}

pub fn move_to_cart(state: &mut Shop, id: ProductId) -> Result<()> {
    ensure_positive(id)?;
    if !state.is_in_wishlist(id) {
        output::line(format!("Product {id} is not in your wishlist"));
        return Ok(());
    }
    state.move_to_cart(id);
    output::line(format!(
        "Added product {id} to cart ({} items)",
        state.cart().item_count()
    ));
    Ok(())
}
