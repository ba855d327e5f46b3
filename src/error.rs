//! Error types for the Beacon API client
//!
//! Every public operation returns `Result<T, Error>` where Error is defined here.
//! Paged reads are the exception: they report failures through their page
//! callback instead of returning them.

use thiserror::Error;

/// The main error type for the Beacon API client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    #[error("Not authenticated: call login() before making requests")]
    NotAuthenticated,

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    ApiRequest { status: u16, body: String },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Pagination Errors
    // ============================================================================
    #[error("Resource '{path}' does not support pagination")]
    PaginationNotSupported { path: String },

    #[error("Query parameter '{name}' is reserved for the pagination cursor")]
    ReservedQueryParam { name: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an authentication error
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Create an API request error
    pub fn api_request(status: u16, body: impl Into<String>) -> Self {
        Self::ApiRequest {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a pagination-not-supported error
    pub fn pagination_not_supported(path: impl Into<String>) -> Self {
        Self::PaginationNotSupported { path: path.into() }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::ApiRequest { status, .. } => Some(*status),
            Error::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Errors caused by how the client was used rather than by the server
    pub fn is_client_misuse(&self) -> bool {
        matches!(
            self,
            Error::NotAuthenticated
                | Error::PaginationNotSupported { .. }
                | Error::ReservedQueryParam { .. }
                | Error::InvalidUrl(_)
        )
    }
}

/// Result type alias for the Beacon API client
pub type Result<T> = std::result::Result<T, Error>;
