//! Authenticated request executor
//!
//! Issues single GET requests against the environment base URL:
//! - Attaches the bearer credential and default headers
//! - Lets per-request headers replace defaults of the same name
//! - Serializes scalar query parameters
//! - Classifies failures as network, HTTP status, or decode errors
//!
//! There are no retries at this layer.

use super::rate_limit::RateLimiter;
use crate::auth::CredentialStore;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::types::{JsonValue, QueryValue};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;
use url::Url;

/// Per-request options: header overrides and query parameters
///
/// Deserializes from `{"headers": {...}, "qs": {...}}`; both keys are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestOptions {
    /// Headers replacing defaults of the same name; scalar values are sent as text
    pub headers: HashMap<String, QueryValue>,
    /// Query string parameters
    pub qs: BTreeMap<String, QueryValue>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.qs.insert(key.into(), value.into());
        self
    }

    /// Add a header override
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Query parameters as string pairs, in key order
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.qs
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect()
    }
}

/// Anything that can perform an authenticated JSON GET
///
/// The pagination driver depends only on this seam.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    async fn get_json(&self, path: &str, options: &RequestOptions) -> Result<JsonValue>;
}

/// HTTP request executor bound to one environment and one credential store
pub struct HttpClient {
    client: Client,
    base_url: Url,
    default_headers: HeaderMap,
    credentials: CredentialStore,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Build a reqwest client from the config's timeout and user agent
    pub fn build_inner(config: &ClientConfig) -> Result<Client> {
        Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))
    }

    pub fn new(config: &ClientConfig, client: Client, credentials: CredentialStore) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        for (key, value) in &config.default_headers {
            let (name, value) = parse_header(key, value)?;
            default_headers.insert(name, value);
        }

        Ok(Self {
            client,
            base_url: config.resolved_base_url()?,
            default_headers,
            credentials,
            rate_limiter: config.requests_per_second.map(RateLimiter::per_second),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Issue an authenticated GET and parse the JSON body
    pub async fn get(&self, path: &str, options: &RequestOptions) -> Result<JsonValue> {
        let credential = self.credentials.current_credential().await?;
        let url = self.build_url(path)?;
        let headers = self.merge_headers(&credential.authorization_value(), options)?;

        if let Some(ref limiter) = self.rate_limiter {
            limiter.wait().await;
        }

        debug!("GET {} ({} query params)", url, options.qs.len());

        let mut req = self.client.get(url).headers(headers);
        if !options.qs.is_empty() {
            req = req.query(&options.query_pairs());
        }
        let response = req.send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            debug!("GET {} failed with {}", path, status.as_u16());
            return Err(Error::api_request(status.as_u16(), body));
        }

        serde_json::from_str(&body)
            .map_err(|e| Error::decode(format!("response from '{path}' is not valid JSON: {e}")))
    }

    /// Build the full URL for a resource path
    ///
    /// Absolute `http(s)://` paths are used unchanged.
    pub fn build_url(&self, path: &str) -> Result<Url> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(Url::parse(path)?);
        }

        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    /// Defaults first, then the bearer credential, then caller overrides
    fn merge_headers(&self, authorization: &str, options: &RequestOptions) -> Result<HeaderMap> {
        let mut headers = self.default_headers.clone();

        let mut auth = HeaderValue::from_str(authorization)
            .map_err(|_| Error::authentication("credential is not a valid header value"))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        for (key, value) in &options.headers {
            let (name, value) = parse_header(key, &value.to_string())?;
            headers.insert(name, value);
        }
        Ok(headers)
    }
}

#[async_trait]
impl RequestExecutor for HttpClient {
    async fn get_json(&self, path: &str, options: &RequestOptions) -> Result<JsonValue> {
        self.get(path, options).await
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url.as_str())
            .field("credentials", &self.credentials)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

fn parse_header(key: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let name = HeaderName::from_bytes(key.as_bytes())
        .map_err(|_| Error::config(format!("invalid header name '{key}'")))?;
    let value = HeaderValue::from_str(value)
        .map_err(|_| Error::config(format!("invalid value for header '{key}'")))?;
    Ok((name, value))
}
