//! Client configuration
//!
//! `ClientConfig` binds a client to one Beacon environment. It can be built
//! in code, parsed from YAML, or read from the process environment.

use crate::error::{Error, Result};
use crate::pagination::PaginationConfig;
use crate::types::{Environment, StringMap};
use secrecy::SecretString;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Environment variable holding the identity client id
pub const CLIENT_ID_VAR: &str = "IDENTITY_CLIENT_ID";
/// Environment variable holding the identity client secret
pub const CLIENT_SECRET_VAR: &str = "IDENTITY_CLIENT_SECRET";
/// Environment variable selecting the Beacon environment
pub const ENVIRONMENT_VAR: &str = "BEACON_ENV";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration for a Beacon client
#[derive(Debug)]
pub struct ClientConfig {
    /// Deployment to talk to
    pub environment: Environment,
    /// Overrides the environment's API base URL
    pub base_url: Option<String>,
    /// Overrides the environment's identity token URL
    pub identity_url: Option<String>,
    /// Identity provider client id
    pub client_id: String,
    /// Identity provider client secret
    pub client_secret: SecretString,
    /// OAuth2 scope requested at login
    pub scope: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Headers sent with every API request
    pub default_headers: StringMap,
    /// Client-side request throttle, disabled when `None`
    pub requests_per_second: Option<u32>,
    /// Pagination cursor and metadata layout
    pub pagination: PaginationConfig,
}

impl ClientConfig {
    /// Create a config for the given client and environment
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        environment: Environment,
    ) -> Self {
        Self {
            environment,
            base_url: None,
            identity_url: None,
            client_id: client_id.into(),
            client_secret: SecretString::from(client_secret.into()),
            scope: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: default_user_agent(),
            default_headers: StringMap::new(),
            requests_per_second: None,
            pagination: PaginationConfig::default(),
        }
    }

    /// Read client id, secret and environment from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| Error::config(format!("{key} must be set")))
        };

        let client_id = required(CLIENT_ID_VAR)?;
        let client_secret = required(CLIENT_SECRET_VAR)?;
        let environment = match lookup(ENVIRONMENT_VAR) {
            Some(value) if !value.is_empty() => value.parse()?,
            _ => Environment::default(),
        };

        Ok(Self::new(client_id, client_secret, environment))
    }

    /// Parse a YAML configuration document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let file: ConfigFile = serde_yaml::from_str(yaml)?;
        file.into_config()
    }

    /// Load a YAML configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Override the API base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Override the identity token URL
    #[must_use]
    pub fn with_identity_url(mut self, url: impl Into<String>) -> Self {
        self.identity_url = Some(url.into());
        self
    }

    /// Set the login scope
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Add a header sent with every API request
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Throttle requests to the given rate
    #[must_use]
    pub fn with_rate_limit(mut self, requests_per_second: u32) -> Self {
        self.requests_per_second = Some(requests_per_second);
        self
    }

    /// Replace the pagination layout
    #[must_use]
    pub fn with_pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }

    /// API base URL after applying overrides
    pub fn resolved_base_url(&self) -> Result<Url> {
        let raw = self
            .base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url());
        Ok(Url::parse(raw)?)
    }

    /// Identity token URL after applying overrides
    pub fn resolved_identity_url(&self) -> Result<Url> {
        let raw = self
            .identity_url
            .as_deref()
            .unwrap_or_else(|| self.environment.identity_url());
        Ok(Url::parse(raw)?)
    }
}

fn default_user_agent() -> String {
    format!("beacon-api/{}", env!("CARGO_PKG_VERSION"))
}

/// On-disk layout of a configuration file
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    environment: Environment,
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    identity_url: Option<String>,
    client_id: String,
    client_secret: String,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
    #[serde(default)]
    user_agent: Option<String>,
    #[serde(default)]
    default_headers: StringMap,
    #[serde(default)]
    requests_per_second: Option<u32>,
    #[serde(default)]
    pagination: PaginationConfig,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl ConfigFile {
    fn into_config(self) -> Result<ClientConfig> {
        if self.client_id.is_empty() {
            return Err(Error::config("client_id must not be empty"));
        }
        if self.pagination.page_size == 0 {
            return Err(Error::config("pagination.page_size must be positive"));
        }

        let mut config = ClientConfig::new(self.client_id, self.client_secret, self.environment);
        config.base_url = self.base_url;
        config.identity_url = self.identity_url;
        config.scope = self.scope;
        config.timeout = Duration::from_secs(self.timeout_secs);
        if let Some(agent) = self.user_agent {
            config.user_agent = agent;
        }
        config.default_headers = self.default_headers;
        config.requests_per_second = self.requests_per_second;
        config.pagination = self.pagination;

        // Fail early on malformed overrides
        config.resolved_base_url()?;
        config.resolved_identity_url()?;
        Ok(config)
    }
}
