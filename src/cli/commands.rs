//! CLI commands and argument parsing

use crate::types::Environment;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Beacon API command-line client
///
/// Client id and secret come from IDENTITY_CLIENT_ID and
/// IDENTITY_CLIENT_SECRET (or --config); the user from BEACON_USERNAME and
/// BEACON_PASSWORD.
#[derive(Parser, Debug)]
#[command(name = "beacon")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Environment (prod, preview, train); overrides BEACON_ENV and the config file
    #[arg(short, long, global = true)]
    pub env: Option<Environment>,

    /// Configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and report the issued credential
    Login,

    /// Fetch a single resource and print it as JSON
    Get {
        /// Resource path, e.g. Jobs/1
        path: String,

        /// Query parameter (repeatable)
        #[arg(short, long = "query", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        query: Vec<(String, String)>,

        /// Header override (repeatable)
        #[arg(short = 'H', long = "header", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        header: Vec<(String, String)>,
    },

    /// Print every record of a paginated resource, one JSON object per line
    Pages {
        /// Resource path, e.g. Entities
        path: String,

        /// Query parameter (repeatable)
        #[arg(short, long = "query", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        query: Vec<(String, String)>,

        /// Records per page
        #[arg(long)]
        page_size: Option<u32>,

        /// Only print the page and record counts
        #[arg(long)]
        count_only: bool,
    },
}

/// Parse `KEY=VALUE`; the value may be empty
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{s}'")),
    }
}
