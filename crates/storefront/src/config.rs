//! Shopfront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `SHOPFRONT_CATALOG_URL` - Catalog API base URL (default: <https://fakestoreapi.com>)
//! - `SHOPFRONT_CATALOG_TIMEOUT_SECS` - Catalog request timeout (default: 10)
//! - `SHOPFRONT_CATALOG_CACHE_TTL_SECS` - Catalog response cache TTL (default: 300)
//! - `SHOPFRONT_DATA_DIR` - Directory holding persisted state (default: .shopfront)
//! - `SHOPFRONT_AUTH_MODE` - `accept-any` or `directory` (default: accept-any)
//! - `SHOPFRONT_ORDER_DELAY_MS` - Simulated order processing time (default: 2000)
//! - `SHOPFRONT_SHIPPING_FLAT` - Flat shipping charge (default: 10.00)
//! - `SHOPFRONT_TAX_RATE` - Tax rate applied to the subtotal (default: 0.08)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use thiserror::Error;
use url::Url;

const DEFAULT_CATALOG_URL: &str = "https://fakestoreapi.com";
const DEFAULT_DATA_DIR: &str = ".shopfront";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Shopfront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Product catalog API configuration
    pub catalog: CatalogConfig,
    /// Order pricing rules
    pub pricing: PricingConfig,
    /// Directory for the file-backed state store
    pub data_dir: PathBuf,
    /// How sign-in credentials are checked
    pub auth_mode: AuthMode,
    /// Simulated processing time when an order is placed
    pub order_delay: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Product catalog API configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: Url,
    pub timeout: Duration,
    pub cache_ttl: Duration,
}

/// Shipping and tax applied at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingConfig {
    pub shipping_flat: Decimal,
    pub tax_rate: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            shipping_flat: Decimal::new(1000, 2),
            tax_rate: Decimal::new(8, 2),
        }
    }
}

/// Which credential verifier backs sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    /// Any well-formed email with a non-empty password signs in.
    #[default]
    AcceptAny,
    /// Credentials are checked against the local account directory.
    Directory,
}

impl FromStr for AuthMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "accept-any" | "any" => Ok(Self::AcceptAny),
            "directory" => Ok(Self::Directory),
            other => Err(format!(
                "unknown auth mode '{other}' (expected accept-any or directory)"
            )),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Lookup(lookup);

        let base_url = env.parse_or("SHOPFRONT_CATALOG_URL", || {
            Url::parse(DEFAULT_CATALOG_URL).map_err(|e| {
                ConfigError::InvalidEnvVar("SHOPFRONT_CATALOG_URL".to_string(), e.to_string())
            })
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "SHOPFRONT_CATALOG_URL".to_string(),
                format!("unsupported scheme '{}'", base_url.scheme()),
            ));
        }
        let timeout =
            Duration::from_secs(env.parse_or("SHOPFRONT_CATALOG_TIMEOUT_SECS", || Ok(10))?);
        let cache_ttl =
            Duration::from_secs(env.parse_or("SHOPFRONT_CATALOG_CACHE_TTL_SECS", || Ok(300))?);

        let defaults = PricingConfig::default();
        let shipping_flat: Decimal =
            env.parse_or("SHOPFRONT_SHIPPING_FLAT", || Ok(defaults.shipping_flat))?;
        let tax_rate: Decimal =
            env.parse_or("SHOPFRONT_TAX_RATE", || Ok(defaults.tax_rate))?;
        if shipping_flat.is_sign_negative() {
            return Err(ConfigError::InvalidEnvVar(
                "SHOPFRONT_SHIPPING_FLAT".to_string(),
                "must not be negative".to_string(),
            ));
        }
        if tax_rate.is_sign_negative() || tax_rate > Decimal::ONE {
            return Err(ConfigError::InvalidEnvVar(
                "SHOPFRONT_TAX_RATE".to_string(),
                "must be between 0 and 1".to_string(),
            ));
        }

        let data_dir = env
            .optional("SHOPFRONT_DATA_DIR")
            .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);
        let auth_mode = env.parse_or("SHOPFRONT_AUTH_MODE", || Ok(AuthMode::default()))?;
        let order_delay =
            Duration::from_millis(env.parse_or("SHOPFRONT_ORDER_DELAY_MS", || Ok(2000))?);

        Ok(Self {
            catalog: CatalogConfig {
                base_url,
                timeout,
                cache_ttl,
            },
            pricing: PricingConfig {
                shipping_flat,
                tax_rate,
            },
            data_dir,
            auth_mode,
            order_delay,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Lookup<F>(F);

impl<F> Lookup<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable; blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse_or<T, D>(&self, key: &str, default: D) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
        D: FnOnce() -> Result<T, ConfigError>,
    {
        match self.optional(key) {
            Some(raw) => raw
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
            None => default(),
        }
    }
}
