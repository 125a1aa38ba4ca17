//! Login check.
//!
//! There is no account backend. [`DemoAuthenticator`] accepts a single demo
//! account taken from settings; a real backend would implement
//! [`Authenticator`] instead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub email: String,
    pub signed_in_at: DateTime<Utc>,
}

pub trait Authenticator {
    fn authenticate(&self, credentials: &Credentials) -> Result<Session, AuthError>;

    /// Ends the session. Nothing to tear down for stubs.
    fn logout(&self, _session: Session) {}
}

/// Accepts exactly one configured account.
#[derive(Debug, Clone)]
pub struct DemoAuthenticator {
    account: Credentials,
}

impl DemoAuthenticator {
    pub const DEFAULT_EMAIL: &'static str = "test@buddy.com";
    pub const DEFAULT_PASSWORD: &'static str = "123456";

    pub fn new(account: Credentials) -> Self {
        Self { account }
    }
}

impl Default for DemoAuthenticator {
    fn default() -> Self {
        Self::new(Credentials::new(Self::DEFAULT_EMAIL, Self::DEFAULT_PASSWORD))
    }
}

impl Authenticator for DemoAuthenticator {
    fn authenticate(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        if credentials.email.is_empty() || credentials.password.is_empty() {
            return Err(AuthError::MissingFields);
        }
        if *credentials != self.account {
            tracing::debug!(email = %credentials.email, "login rejected");
            return Err(AuthError::InvalidCredentials);
        }
        tracing::info!(email = %credentials.email, "signed in");
        Ok(Session {
            email: credentials.email.clone(),
            signed_in_at: Utc::now(),
        })
    }
}
