//! CLI module
//!
//! Command-line interface over the client.
//!
//! # Commands
//!
//! - `login` - Verify credentials against the identity provider
//! - `get` - Fetch a single resource
//! - `pages` - Stream every record of a paginated resource

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
