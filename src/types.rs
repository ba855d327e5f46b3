//! Common types used throughout the Beacon API client
//!
//! Type aliases, the deployment environment selector, and the scalar
//! query value type.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

// ============================================================================
// Environment
// ============================================================================

/// Beacon deployment the client talks to
///
/// Deserializes case-insensitively through [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Environment {
    /// Production
    #[default]
    Prod,
    /// Preview of the next release
    Preview,
    /// Training environment
    Train,
}

impl Environment {
    /// Base URL for API requests
    pub fn base_url(self) -> &'static str {
        match self {
            Environment::Prod => "https://apibeacon.ses.nsw.gov.au/Api/v1/",
            Environment::Preview => "https://previewbeacon.ses.nsw.gov.au/Api/v1/",
            Environment::Train => "https://trainbeacon.ses.nsw.gov.au/Api/v1/",
        }
    }

    /// Token endpoint of the identity provider
    pub fn identity_url(self) -> &'static str {
        match self {
            Environment::Prod => "https://identity.ses.nsw.gov.au/core/connect/token",
            Environment::Preview => "https://identitypreview.ses.nsw.gov.au/core/connect/token",
            Environment::Train => "https://identitytrain.ses.nsw.gov.au/core/connect/token",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Prod => "prod",
            Environment::Preview => "preview",
            Environment::Train => "train",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Ok(Environment::Prod),
            "preview" => Ok(Environment::Preview),
            "train" | "training" => Ok(Environment::Train),
            other => Err(Error::config(format!("unknown environment '{other}'"))),
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

// ============================================================================
// Query Values
// ============================================================================

/// Scalar value of a query string parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Bool(b) => write!(f, "{b}"),
            QueryValue::Integer(i) => write!(f, "{i}"),
            QueryValue::Float(x) => write!(f, "{x}"),
            QueryValue::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::String(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::String(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Bool(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Integer(value)
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        QueryValue::Integer(i64::from(value))
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        QueryValue::Integer(i64::from(value))
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        QueryValue::Float(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("prod", Environment::Prod ; "prod")]
    #[test_case("PRODUCTION", Environment::Prod ; "production uppercase")]
    #[test_case(" preview ", Environment::Preview ; "preview padded")]
    #[test_case("train", Environment::Train ; "train")]
    #[test_case("training", Environment::Train ; "training")]
    fn test_environment_from_str(input: &str, expected: Environment) {
        assert_eq!(input.parse::<Environment>().unwrap(), expected);
    }

    #[test]
    fn test_environment_unknown() {
        let err = "staging".parse::<Environment>().unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test_case("prod", Environment::Prod ; "lowercase")]
    #[test_case("PROD", Environment::Prod ; "uppercase")]
    #[test_case("Training", Environment::Train ; "alias")]
    fn test_environment_deserialize(input: &str, expected: Environment) {
        let env: Environment = serde_json::from_value(serde_json::json!(input)).unwrap();
        assert_eq!(env, expected);
    }

    #[test]
    fn test_environment_deserialize_unknown() {
        let result: std::result::Result<Environment, _> =
            serde_json::from_value(serde_json::json!("staging"));
        assert!(result.is_err());
    }

    #[test]
    fn test_environment_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(Environment::Preview).unwrap(),
            serde_json::json!("preview")
        );
    }

    #[test]
    fn test_environment_urls_differ() {
        assert_ne!(Environment::Prod.base_url(), Environment::Train.base_url());
        assert_ne!(
            Environment::Prod.identity_url(),
            Environment::Preview.identity_url()
        );
        assert_eq!(Environment::default(), Environment::Prod);
    }

    #[test_case(QueryValue::from("") , "" ; "empty string")]
    #[test_case(QueryValue::from(true), "true" ; "bool")]
    #[test_case(QueryValue::from(42), "42" ; "integer")]
    #[test_case(QueryValue::from(1.5), "1.5" ; "float")]
    fn test_query_value_display(value: QueryValue, expected: &str) {
        assert_eq!(value.to_string(), expected);
    }

    #[test]
    fn test_query_value_deserialize_scalars() {
        let values: HashMap<String, QueryValue> =
            serde_json::from_str(r#"{"Q": "", "Limit": 10, "Active": false}"#).unwrap();
        assert_eq!(values["Q"], QueryValue::String(String::new()));
        assert_eq!(values["Limit"], QueryValue::Integer(10));
        assert_eq!(values["Active"], QueryValue::Bool(false));
    }
}
