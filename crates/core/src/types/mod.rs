//! Core types for Shopfront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod email;
pub mod id;
pub mod identity;
pub mod price;
pub mod product;

pub use cart::CartEntry;
pub use email::{Email, EmailError};
pub use id::*;
pub use identity::Identity;
pub use price::{CurrencyCode, Price};
pub use product::{Category, Product, Rating};
