//! Authentication error types.

use thiserror::Error;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] shopfront_core::EmailError),

    /// Password field left empty.
    #[error("password is required")]
    MissingPassword,

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Display name left empty.
    #[error("name is required")]
    MissingName,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// The account directory lock was poisoned.
    #[error("account directory unavailable")]
    DirectoryUnavailable,
}
