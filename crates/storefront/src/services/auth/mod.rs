//! Authentication service.
//!
//! Credential checking lives behind [`CredentialVerifier`]; the
//! [`SessionStore`] only records the outcome. Two verifiers ship:
//! [`AcceptAnyCredentials`] for demo sign-in and [`AccountDirectory`] for a
//! local, argon2-hashed account list.

mod error;

pub use error::AuthError;

use std::sync::{Mutex, MutexGuard};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};

use shopfront_core::{Email, Identity};

use crate::error::{add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::stores::SessionStore;

/// Minimum password length for new accounts.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Token handed out by the demo verifier.
pub const DEMO_SESSION_TOKEN: &str = "mock-jwt-token";

/// Sign-in form input, after the email has been validated.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: Email,
    pub password: SecretString,
}

/// Decides whether credentials identify someone.
pub trait CredentialVerifier: Send + Sync {
    /// Resolve credentials to an identity.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` when the credentials are
    /// rejected.
    fn verify(&self, credentials: &Credentials) -> Result<Identity, AuthError>;
}

impl<T: CredentialVerifier + ?Sized> CredentialVerifier for Box<T> {
    fn verify(&self, credentials: &Credentials) -> Result<Identity, AuthError> {
        (**self).verify(credentials)
    }
}

/// Signs in any well-formed email with a non-empty password as the demo
/// user.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAnyCredentials;

impl CredentialVerifier for AcceptAnyCredentials {
    fn verify(&self, credentials: &Credentials) -> Result<Identity, AuthError> {
        if credentials.password.expose_secret().is_empty() {
            return Err(AuthError::MissingPassword);
        }
        Ok(Identity {
            id: "1".to_string(),
            display_name: "Demo User".to_string(),
            email: credentials.email.clone(),
            session_token: Some(DEMO_SESSION_TOKEN.to_string()),
        })
    }
}

struct Account {
    id: String,
    name: String,
    email: Email,
    password_hash: String,
}

impl Account {
    fn identity(&self) -> Identity {
        Identity {
            id: self.id.clone(),
            display_name: self.name.clone(),
            email: self.email.clone(),
            session_token: None,
        }
    }
}

/// In-process account list with argon2 password hashes.
///
/// Ids are assigned sequentially as decimal strings, starting from `"1"`.
#[derive(Default)]
pub struct AccountDirectory {
    accounts: Mutex<Vec<Account>>,
}

impl std::fmt::Debug for AccountDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let len = self.accounts.lock().map_or(0, |a| a.len());
        f.debug_struct("AccountDirectory")
            .field("accounts", &len)
            .finish_non_exhaustive()
    }
}

impl AccountDirectory {
    /// Empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory holding the demo account
    /// (`demo@example.com` / `password123`).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if hashing fails.
    pub fn with_demo_account() -> Result<Self, AuthError> {
        let directory = Self::new();
        directory.insert(
            "Demo User",
            Email::parse("demo@example.com")?,
            "password123",
        )?;
        Ok(directory)
    }

    /// Register a new account and return its identity.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingName` for a blank name,
    /// `AuthError::WeakPassword` for a password shorter than 8 characters and
    /// `AuthError::UserAlreadyExists` if the email is taken.
    pub fn register(
        &self,
        name: &str,
        email: &Email,
        password: &SecretString,
    ) -> Result<Identity, AuthError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::MissingName);
        }
        validate_password(password.expose_secret())?;
        self.insert(name, email.clone(), password.expose_secret())
    }

    /// Number of registered accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().map_or(0, |a| a.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&self, name: &str, email: Email, password: &str) -> Result<Identity, AuthError> {
        let password_hash = hash_password(password)?;
        let mut accounts = self.lock()?;
        if accounts.iter().any(|a| a.email == email) {
            return Err(AuthError::UserAlreadyExists);
        }
        let account = Account {
            id: (accounts.len() + 1).to_string(),
            name: name.to_string(),
            email,
            password_hash,
        };
        let identity = account.identity();
        accounts.push(account);
        Ok(identity)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Account>>, AuthError> {
        self.accounts
            .lock()
            .map_err(|_| AuthError::DirectoryUnavailable)
    }
}

impl CredentialVerifier for AccountDirectory {
    fn verify(&self, credentials: &Credentials) -> Result<Identity, AuthError> {
        let accounts = self.lock()?;
        let account = accounts
            .iter()
            .find(|a| a.email == credentials.email)
            .ok_or(AuthError::InvalidCredentials)?;
        verify_password(credentials.password.expose_secret(), &account.password_hash)?;
        Ok(account.identity())
    }
}

/// Authentication service.
///
/// Validates sign-in input, consults the verifier and records the outcome in
/// the session. A rejected attempt never touches the session.
#[derive(Debug, Default)]
pub struct AuthService<V> {
    verifier: V,
}

impl<V: CredentialVerifier> AuthService<V> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(verifier: V) -> Self {
        Self { verifier }
    }

    #[must_use]
    pub const fn verifier(&self) -> &V {
        &self.verifier
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid,
    /// `AuthError::MissingPassword` if the password is empty and
    /// `AuthError::InvalidCredentials` if the verifier rejects them.
    pub fn sign_in(
        &self,
        session: &mut SessionStore,
        email: &str,
        password: SecretString,
    ) -> Result<Identity, AuthError> {
        let email = Email::parse(email)?;
        if password.expose_secret().is_empty() {
            return Err(AuthError::MissingPassword);
        }

        let identity = self.verifier.verify(&Credentials { email, password })?;
        info!(user_id = %identity.id, "signed in");
        record_sign_in(&identity);
        session.sign_in(identity.clone());
        Ok(identity)
    }

    /// Sign out the current identity.
    pub fn sign_out(&self, session: &mut SessionStore) {
        if let Some(identity) = session.current() {
            info!(user_id = %identity.id, "signed out");
        }
        session.sign_out();
        clear_sentry_user();
        add_breadcrumb("auth", "Signed out", None);
    }
}

impl AuthService<AccountDirectory> {
    /// Register an account and sign it in.
    ///
    /// # Errors
    ///
    /// Returns the validation errors of [`Email::parse`] and
    /// [`AccountDirectory::register`].
    pub fn sign_up(
        &self,
        session: &mut SessionStore,
        name: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<Identity, AuthError> {
        let email = Email::parse(email)?;
        let identity = self.verifier.register(name, &email, password)?;
        debug!(user_id = %identity.id, "account registered");
        record_sign_in(&identity);
        session.sign_in(identity.clone());
        Ok(identity)
    }
}

fn record_sign_in(identity: &Identity) {
    set_sentry_user(&identity.id, Some(identity.email.as_str()));
    add_breadcrumb("auth", "Signed in", Some(&[("user_id", identity.id.as_str())]));
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
