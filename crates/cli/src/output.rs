//! Terminal rendering. The only place that writes to stdout.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::fmt::Display;

use shopfront::checkout::{OrderConfirmation, OrderSummary};
use shopfront::views::CartSummary;
use shopfront_core::{CartEntry, Identity, Product};

pub fn line(message: impl Display) {
    println!("{message}");
}

pub fn error(message: &str) {
    eprintln!("error: {message}");
}

pub fn product_row(product: &Product, wishlisted: bool) {
    let marker = if wishlisted { "*" } else { " " };
    println!(
        "{marker}{:>4}  {:>10}  {}  [{}]",
        product.id,
        product.unit_price().display(),
        product.title,
        product.category
    );
}

pub fn product_detail(product: &Product, wishlisted: bool, in_cart: Option<u32>) {
    println!("#{} {}", product.id, product.title);
    println!("  price:    {}", product.unit_price());
    println!("  category: {}", product.category);
    println!(
        "  rating:   {:.1} ({} reviews)",
        product.rating.rate, product.rating.count
    );
    println!("  image:    {}", product.image);
    if wishlisted {
        println!("  in your wishlist");
    }
    if let Some(quantity) = in_cart {
        println!("  in your cart: {quantity}");
    }
    if !product.description.is_empty() {
        println!();
        println!("  {}", product.description);
    }
}

pub fn cart(summary: &CartSummary<'_>) {
    if summary.item_count == 0 {
        println!("Your cart is empty");
        return;
    }
    for line in &summary.lines {
        println!(
            "{:>4}  {:>3} x {:>9}  {:>10}  {}",
            line.product.id,
            line.quantity,
            line.unit_price().display(),
            line.line_total().display(),
            line.product.title
        );
    }
    for CartEntry {
        product_id,
        quantity,
    } in &summary.unresolved
    {
        println!("{product_id:>4}  {quantity:>3} x  (unavailable)");
    }
    println!("Items:    {}", summary.item_count);
    println!("Subtotal: {}", summary.subtotal);
}

pub fn order_summary(summary: &OrderSummary) {
    println!("Subtotal: {}", summary.subtotal);
    println!("Shipping: {}", summary.shipping);
    println!("Tax:      {}", summary.tax);
    println!("Total:    {}", summary.total);
}

pub fn confirmation(confirmation: &OrderConfirmation) {
    println!("Order placed successfully!");
    println!("Order number: {}", confirmation.order_id);
    println!(
        "Placed at:    {}",
        confirmation.placed_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("Payment:      {}", confirmation.payment);
    println!(
        "Ship to:      {}, {}, {}, {} {}, {}",
        confirmation.shipping.full_name,
        confirmation.shipping.address,
        confirmation.shipping.city,
        confirmation.shipping.state,
        confirmation.shipping.zip_code,
        confirmation.shipping.country
    );
    println!();
    for line in &confirmation.lines {
        println!(
            "{:>3} x {}  {}",
            line.quantity,
            line.title,
            line.line_total.display()
        );
    }
    println!();
    order_summary(&confirmation.summary);
}

pub fn identity(identity: &Identity) {
    println!(
        "Signed in as {} <{}> (id {})",
        identity.display_name, identity.email, identity.id
    );
}
