//! Shopfront client-side state library.
//!
//! Cart, wishlist and session stores over a pluggable key-value port,
//! derived views joined against a product catalog, and the checkout flow
//! that consumes the cart.
//!
//! # Modules
//!
//! - [`persistence`] - Key-value storage port with memory and file backends
//! - [`stores`] - Cart, wishlist and session state containers
//! - [`catalog`] - Product catalog seam, HTTP client and snapshots
//! - [`views`] - Pure derived values (counts, subtotals, joined lines)
//! - [`services`] - Authentication
//! - [`checkout`] - Shipping, payment, review and confirmation
//! - [`state`] - Everything one session needs, bundled

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod persistence;
pub mod services;
pub mod state;
pub mod stores;
pub mod views;
