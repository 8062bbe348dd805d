//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type for callers that drive several
//! modules at once (the CLI, integration tests). Internal failures are
//! captured to Sentry through [`AppError::report`]; [`AppError::user_message`]
//! is what a shopper gets to see.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::persistence::StorageError;
use crate::services::auth::AuthError;

/// Application-level error type for the shopfront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Storage backend failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Product catalog operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Checkout rejected the request.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from the user.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error points at a fault on our side rather than bad
    /// input.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        match self {
            Self::Config(_) | Self::Storage(_) | Self::Internal(_) => true,
            Self::Catalog(err) => !matches!(err, CatalogError::NotFound(_)),
            Self::Auth(err) => matches!(
                err,
                AuthError::PasswordHash | AuthError::DirectoryUnavailable
            ),
            Self::Checkout(_) | Self::NotFound(_) | Self::BadRequest(_) => false,
        }
    }

    /// Capture internal errors to Sentry and log them.
    pub fn report(&self) {
        if self.is_internal() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Command error"
            );
        } else {
            tracing::debug!(error = %self, "Command rejected");
        }
    }

    /// Message safe to show the shopper.
    ///
    /// Internal details are not exposed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(err) => err.to_string(),
            Self::Storage(_) | Self::Internal(_) => "Internal error".to_string(),
            Self::Catalog(err) => match err {
                CatalogError::NotFound(what) => format!("Not found: {what}"),
                CatalogError::RateLimited(secs) => {
                    format!("Catalog is busy, try again in {secs}s")
                }
                _ => "Product catalog is unavailable".to_string(),
            },
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid email or password".to_string(),
                AuthError::UserAlreadyExists => "Email already in use".to_string(),
                AuthError::WeakPassword(msg) => msg.clone(),
                AuthError::InvalidEmail(_) => "Please enter a valid email".to_string(),
                AuthError::MissingPassword => "Please enter your password".to_string(),
                AuthError::MissingName => "Please enter your name".to_string(),
                AuthError::PasswordHash | AuthError::DirectoryUnavailable => {
                    "Authentication error".to_string()
                }
            },
            Self::Checkout(err) => match err {
                CheckoutError::NotAuthenticated => "Please sign in to check out".to_string(),
                CheckoutError::EmptyCart => "Your cart is empty".to_string(),
                CheckoutError::UnresolvedCart => {
                    "None of the products in your cart are available".to_string()
                }
                CheckoutError::MissingField(field) => format!("Please enter your {field}"),
                CheckoutError::WrongStep { .. } => err.to_string(),
            },
            Self::NotFound(what) => format!("Not found: {what}"),
            Self::BadRequest(msg) => msg.clone(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on sign-out to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "3")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
