//! Session commands.

use secrecy::SecretString;

use shopfront::config::AuthMode;
use shopfront::error::{AppError, Result};
use shopfront::services::auth::{
    AcceptAnyCredentials, AccountDirectory, AuthService, CredentialVerifier,
};

use super::Shop;
use crate::output;

fn verifier(mode: AuthMode) -> Result<Box<dyn CredentialVerifier>> {
    Ok(match mode {
        AuthMode::AcceptAny => Box::new(AcceptAnyCredentials),
        AuthMode::Directory => Box::new(AccountDirectory::with_demo_account()?),
    })
}

pub fn sign_in(state: &mut Shop, email: &str, password: String) -> Result<()> {
    let auth = AuthService::new(verifier(state.config().auth_mode)?);
    let identity = auth.sign_in(state.session_mut(), email, SecretString::from(password))?;
    output::identity(&identity);
    Ok(())
}

/// The account directory lives in memory, so a sign-up only lasts for the
/// session it creates.
pub fn sign_up(state: &mut Shop, name: &str, email: &str, password: String) -> Result<()> {
    if state.config().auth_mode != AuthMode::Directory {
        return Err(AppError::BadRequest(
            "sign-up needs SHOPFRONT_AUTH_MODE=directory".to_string(),
        ));
    }
    let auth = AuthService::new(AccountDirectory::with_demo_account()?);
    let identity = auth.sign_up(
        state.session_mut(),
        name,
        email,
        &SecretString::from(password),
    )?;
    output::identity(&identity);
    Ok(())
}

pub fn sign_out(state: &mut Shop) {
    let was_signed_in = state.is_authenticated();
    AuthService::new(AcceptAnyCredentials).sign_out(state.session_mut());
    output::line(if was_signed_in { "Signed out" } else { "Not signed in" });
}

pub fn whoami(state: &Shop) {
    match state.session().current() {
        Some(identity) => output::identity(identity),
        None => output::line("Not signed in"),
    }
}
