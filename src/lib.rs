//! # Beacon API client
//!
//! Authenticated, paginated access to the Beacon REST API.
//!
//! ## Features
//!
//! - **Password Login**: OAuth2 password grant against the environment's identity provider
//! - **Authenticated GET**: Bearer credential and default headers on every request
//! - **Full Pagination**: Every record of a paged resource, one page at a time, in order
//! - **Environments**: Production, preview and training deployments
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use beacon_api::{BeaconApi, Environment, RequestOptions, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let api = BeaconApi::new("client-id", "client-secret", Environment::Prod)?;
//!     let client = api.login("username", "password").await?;
//!
//!     // Single resource
//!     let job = client.get("Jobs/1", &RequestOptions::new()).await?;
//!
//!     // Every page of a resource
//!     let options = RequestOptions::new().query("Q", "");
//!     client
//!         .get_paged_results("Entities", options, |page| match page {
//!             Ok(page) => println!("{} records, finished: {}", page.len(), page.finished),
//!             Err(e) => eprintln!("paging failed: {e}"),
//!         })
//!         .await;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                Client:  get()   get_paged_results()         │
//! └─────────────────────────────────────────────────────────────┘
//!                                │
//! ┌───────────────────┬──────────┴──────────┬────────────────────┐
//! │   Pagination      │   HTTP              │   Auth             │
//! ├───────────────────┼─────────────────────┼────────────────────┤
//! │ Cursor            │ Header merging      │ Password grant     │
//! │ End-of-results    │ Query string        │ Credential store   │
//! │ Stream / callback │ Error classes       │                    │
//! └───────────────────┴─────────────────────┴────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Client configuration
pub mod config;

/// Login and credential storage
pub mod auth;

/// Authenticated request executor
pub mod http;

/// Pagination engine
pub mod pagination;

/// Client facade
pub mod client;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use auth::{Credential, CredentialStore, UserCredentials};
pub use client::{BeaconApi, Client};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use http::RequestOptions;
pub use pagination::{Page, Pages, PaginationConfig};
pub use types::{Environment, JsonValue, QueryValue};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
