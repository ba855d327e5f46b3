//! HTTP module
//!
//! The authenticated request executor and its optional throttle.
//!
//! # Features
//!
//! - **Bearer Authentication**: Every request carries the current credential
//! - **Header Merging**: Per-request headers replace defaults by name
//! - **Error Classification**: Network, HTTP status, and decode failures
//! - **Throttling**: Optional token bucket using governor

mod client;
mod rate_limit;

pub use client::{HttpClient, RequestExecutor, RequestOptions};
pub use rate_limit::RateLimiter;
