//! Authentication module
//!
//! Exchanges user credentials for a bearer token with the identity provider
//! and holds the resulting `Credential` for the request executor.
//!
//! A `CredentialStore` belongs to exactly one client. Login writes it once;
//! every request afterwards only reads it.

mod store;
mod types;

pub use store::CredentialStore;
pub use types::{Credential, UserCredentials, PASSWORD_VAR, USERNAME_VAR};
