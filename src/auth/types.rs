//! Credential types

use crate::error::{Error, Result};
use crate::types::Environment;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};

/// Environment variable holding the Beacon username
pub const USERNAME_VAR: &str = "BEACON_USERNAME";
/// Environment variable holding the Beacon password
pub const PASSWORD_VAR: &str = "BEACON_PASSWORD";

/// Bearer credential issued by the identity provider
///
/// Immutable once created. The token is only reachable through
/// [`Credential::token`] and is redacted from `Debug` output.
#[derive(Debug)]
pub struct Credential {
    token: SecretString,
    client_id: String,
    environment: Environment,
    issued_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
}

impl Credential {
    /// Create a credential issued now
    pub fn new(
        token: impl Into<String>,
        client_id: impl Into<String>,
        environment: Environment,
        expires_in_secs: Option<i64>,
    ) -> Self {
        let issued_at = Utc::now();
        Self {
            token: SecretString::from(token.into()),
            client_id: client_id.into(),
            environment,
            issued_at,
            expires_at: expires_in_secs.map(|secs| issued_at + chrono::Duration::seconds(secs)),
        }
    }

    /// The raw bearer token
    pub fn token(&self) -> &str {
        self.token.expose_secret()
    }

    /// Value for the `Authorization` header
    pub fn authorization_value(&self) -> String {
        format!("Bearer {}", self.token.expose_secret())
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// Expiry reported by the identity provider, if any
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Whether the reported expiry has passed. The client never refreshes;
    /// this is informational for callers holding long-lived clients.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Utc::now() >= exp)
    }
}

/// Username and password used to log in
#[derive(Debug)]
pub struct UserCredentials {
    pub username: String,
    pub password: SecretString,
}

impl UserCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Read `BEACON_USERNAME` and `BEACON_PASSWORD`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| Error::config(format!("{key} must be set")))
        };
        Ok(Self::new(required(USERNAME_VAR)?, required(PASSWORD_VAR)?))
    }
}
