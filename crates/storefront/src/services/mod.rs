//! Business logic services for the shopfront.
//!
//! # Services
//!
//! - `auth` - Sign-in, sign-up and sign-out on top of the session store
//!
//! Checkout lives in [`crate::checkout`] because it is a multi-step flow
//! rather than a stateless service.

pub mod auth;
