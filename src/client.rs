//! Client facade
//!
//! `BeaconApi` binds a client id, secret and environment; `login` turns it
//! into an authenticated `Client`. Each `Client` owns its own credential, so
//! clients logged in as different users never see each other's token.

use crate::auth::{CredentialStore, UserCredentials};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::{HttpClient, RequestExecutor, RequestOptions};
use crate::pagination::{Page, Pages, PaginationConfig};
use crate::types::{Environment, JsonValue};
use futures::{Stream, StreamExt};
use secrecy::SecretString;
use std::sync::Arc;

/// Entry point bound to one identity client and environment
#[derive(Debug)]
pub struct BeaconApi {
    config: Arc<ClientConfig>,
    http_client: reqwest::Client,
}

impl BeaconApi {
    /// Bind the given identity client to an environment
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        environment: Environment,
    ) -> Result<Self> {
        Self::from_config(ClientConfig::new(client_id, client_secret, environment))
    }

    /// Build from a full configuration
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        // Surface malformed URL overrides before the first request
        config.resolved_base_url()?;
        config.resolved_identity_url()?;

        let http_client = HttpClient::build_inner(&config)?;
        Ok(Self {
            config: Arc::new(config),
            http_client,
        })
    }

    pub fn environment(&self) -> Environment {
        self.config.environment
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// A client with an empty credential store; call [`Client::login`] before use
    pub fn client(&self) -> Result<Client> {
        let credentials = CredentialStore::new(&self.config, self.http_client.clone())?;
        let http = HttpClient::new(&self.config, self.http_client.clone(), credentials)?;
        Ok(Client {
            http: Arc::new(http),
            pagination: self.config.pagination.clone(),
        })
    }

    /// Log in and return an authenticated client
    pub async fn login(&self, username: &str, password: &str) -> Result<Client> {
        let client = self.client()?;
        client
            .login(username, &SecretString::from(password.to_string()))
            .await?;
        Ok(client)
    }

    /// Log in with credentials read from the environment or elsewhere
    pub async fn login_with(&self, credentials: &UserCredentials) -> Result<Client> {
        let client = self.client()?;
        client
            .login(&credentials.username, &credentials.password)
            .await?;
        Ok(client)
    }
}

/// Authenticated Beacon client
///
/// Cheap to clone; clones share the credential and connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    http: Arc<HttpClient>,
    pagination: PaginationConfig,
}

impl Client {
    /// Exchange user credentials for a bearer token held by this client
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<()> {
        self.http.credentials().login(username, password).await?;
        Ok(())
    }

    pub fn credentials(&self) -> &CredentialStore {
        self.http.credentials()
    }

    /// Pagination layout used by paged reads
    pub fn pagination(&self) -> &PaginationConfig {
        &self.pagination
    }

    /// Use a different pagination layout for this client
    #[must_use]
    pub fn with_pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }

    /// Fetch a single resource
    pub async fn get(&self, path: &str, options: &RequestOptions) -> Result<JsonValue> {
        self.http.get(path, options).await
    }

    /// Deliver every page of `path` to `on_page`
    ///
    /// `on_page` receives `Ok(page)` for each page, with `page.finished` set
    /// on the last one, or a single `Err` after which nothing follows.
    /// Failures are only reported through `on_page`.
    pub async fn get_paged_results<F>(&self, path: &str, options: RequestOptions, on_page: F)
    where
        F: FnMut(Result<Page>),
    {
        self.pages(path, options).for_each(on_page).await;
    }

    /// Pull-based access to the pages of `path`
    pub fn pages(&self, path: &str, options: RequestOptions) -> Pages {
        let executor: Arc<dyn RequestExecutor> = self.http.clone();
        Pages::new(executor, self.pagination.clone(), path, options)
    }

    /// Pages of `path` as a `Stream`
    pub fn page_stream(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> impl Stream<Item = Result<Page>> + Send {
        self.pages(path, options).into_stream()
    }

    /// Every record of `path`, concatenated in page order
    ///
    /// Buffers the whole result set; prefer [`Client::get_paged_results`]
    /// for large resources.
    pub async fn get_all_results(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Vec<JsonValue>> {
        let mut stream = Box::pin(self.page_stream(path, options));
        let mut records = Vec::new();
        while let Some(page) = stream.next().await {
            records.extend(page?.records);
        }
        Ok(records)
    }
}
