//! Credential store
//!
//! Performs the password grant against the identity provider and keeps the
//! resulting credential for the lifetime of the owning client.

use super::types::Credential;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::types::Environment;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use url::Url;

/// Holds the bearer credential for one client
///
/// Cloning is cheap and clones share the same credential slot.
#[derive(Clone)]
pub struct CredentialStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    credential: RwLock<Option<Arc<Credential>>>,
    http_client: Client,
    identity_url: Url,
    client_id: String,
    client_secret: SecretString,
    scope: Option<String>,
    environment: Environment,
}

impl CredentialStore {
    /// Create an empty store bound to the config's identity provider
    pub fn new(config: &ClientConfig, http_client: Client) -> Result<Self> {
        Ok(Self {
            inner: Arc::new(StoreInner {
                credential: RwLock::new(None),
                http_client,
                identity_url: config.resolved_identity_url()?,
                client_id: config.client_id.clone(),
                client_secret: SecretString::from(config.client_secret.expose_secret().to_owned()),
                scope: config.scope.clone(),
                environment: config.environment,
            }),
        })
    }

    /// Exchange a username and password for a bearer credential
    ///
    /// Every failure, including transport errors, is reported as
    /// `Error::Authentication`.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<Arc<Credential>> {
        let inner = &self.inner;
        let mut form = vec![
            ("grant_type", "password"),
            ("username", username),
            ("password", password.expose_secret()),
            ("client_id", inner.client_id.as_str()),
            ("client_secret", inner.client_secret.expose_secret()),
        ];
        if let Some(scope) = inner.scope.as_deref() {
            form.push(("scope", scope));
        }

        debug!(url = %inner.identity_url, client_id = %inner.client_id, "requesting token");

        let response = inner
            .http_client
            .post(inner.identity_url.clone())
            .form(&form)
            .send()
            .await
            .map_err(|e| Error::authentication(format!("token request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::authentication(format!(
                "identity provider rejected login with status {}: {}",
                status.as_u16(),
                describe_rejection(&body)
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::authentication(format!("unreadable token response: {e}")))?;
        if token.access_token.is_empty() {
            return Err(Error::authentication("token response has an empty access_token"));
        }

        let credential = Arc::new(Credential::new(
            token.access_token,
            inner.client_id.clone(),
            inner.environment,
            token.expires_in,
        ));

        *inner.credential.write().await = Some(Arc::clone(&credential));
        info!(environment = %inner.environment, username, "logged in");
        Ok(credential)
    }

    /// The credential from the last successful login
    pub async fn current_credential(&self) -> Result<Arc<Credential>> {
        self.inner
            .credential
            .read()
            .await
            .clone()
            .ok_or(Error::NotAuthenticated)
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.credential.read().await.is_some()
    }

    pub fn environment(&self) -> Environment {
        self.inner.environment
    }

    /// Install an already issued credential without contacting the identity provider
    pub async fn set_credential(&self, credential: Credential) {
        *self.inner.credential.write().await = Some(Arc::new(credential));
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("identity_url", &self.inner.identity_url.as_str())
            .field("client_id", &self.inner.client_id)
            .field("environment", &self.inner.environment)
            .finish_non_exhaustive()
    }
}

/// OAuth2 token response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// OAuth2 error response
#[derive(Debug, Deserialize)]
struct TokenError {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Prefer the OAuth2 error code over the raw body when the provider sends one
fn describe_rejection(body: &str) -> String {
    match serde_json::from_str::<TokenError>(body) {
        Ok(TokenError {
            error,
            error_description: Some(description),
        }) => format!("{error} ({description})"),
        Ok(TokenError { error, .. }) => error,
        Err(_) => body.to_string(),
    }
}
