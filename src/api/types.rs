//! api::types
//!
//! Resource models for the control-plane API.
//!
//! # Types
//!
//! - [`ResourceName`] - Validated name for organizations, spaces, and apps
//! - [`Organization`], [`Space`], [`App`] - The minimal fields commands use
//! - [`User`], [`Token`] - Session identity
//!
//! # Validation
//!
//! [`ResourceName`] enforces validity at construction time, so an invalid
//! name cannot reach the wire.
//!
//! # Examples
//!
//! ```
//! use stratus::api::types::ResourceName;
//!
//! let name = ResourceName::new("my-space").unwrap();
//! assert_eq!(name.as_str(), "my-space");
//!
//! assert!(ResourceName::new("").is_err());
//! assert!(ResourceName::new("has space").is_err());
//! assert!(ResourceName::new("-leading-dash").is_err());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest name the platform accepts.
const MAX_NAME_LEN: usize = 64;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid resource name: {0}")]
    InvalidName(String),
}

/// A validated resource name.
///
/// Names must be 1-64 characters of ASCII letters, digits, `-`, `_`, or
/// `.`, and must not start with `-` (it would parse as a flag).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceName(String);

impl ResourceName {
    /// Create a new validated resource name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidName` describing the first rule violated.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        if name.is_empty() {
            return Err(TypeError::InvalidName("name cannot be empty".into()));
        }
        if name.len() > MAX_NAME_LEN {
            return Err(TypeError::InvalidName(format!(
                "name cannot exceed {} characters",
                MAX_NAME_LEN
            )));
        }
        if name.starts_with('-') {
            return Err(TypeError::InvalidName(format!(
                "'{}' cannot start with '-'",
                name
            )));
        }
        if let Some(bad) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        {
            return Err(TypeError::InvalidName(format!(
                "'{}' contains invalid character '{}'",
                name, bad
            )));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ResourceName {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ResourceName> for String {
    fn from(name: ResourceName) -> Self {
        name.0
    }
}

impl std::fmt::Display for ResourceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Server-assigned identifier.
    pub guid: String,
    pub name: String,
}

/// A space within an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    pub guid: String,
    pub name: String,
    pub organization_guid: String,
}

/// Lifecycle state of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppState {
    Started,
    Stopped,
}

impl std::fmt::Display for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppState::Started => f.write_str("started"),
            AppState::Stopped => f.write_str("stopped"),
        }
    }
}

/// An application within a space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct App {
    pub guid: String,
    pub name: String,
    pub space_guid: String,
    /// Memory quota in megabytes.
    pub memory_mb: i64,
    /// Disk quota in megabytes.
    pub disk_mb: i64,
    pub instances: i64,
    pub state: AppState,
}

impl App {
    /// Whether the app is currently started.
    pub fn is_started(&self) -> bool {
        self.state == AppState::Started
    }
}

/// The authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub guid: String,
    pub email: String,
}

/// A bearer token returned by the login endpoint.
///
/// The token value is deliberately excluded from `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub issued_at: DateTime<Utc>,
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"<redacted>")
            .field("issued_at", &self.issued_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_names() {
        for name in ["acme", "my-org", "a.b_c", "x"] {
            assert!(ResourceName::new(name).is_ok(), "{} should be valid", name);
        }
    }

    #[test]
    fn invalid_names() {
        assert!(ResourceName::new("").is_err());
        assert!(ResourceName::new("-flag").is_err());
        assert!(ResourceName::new("has space").is_err());
        assert!(ResourceName::new("tab\tname").is_err());
        assert!(ResourceName::new("x".repeat(65)).is_err());
    }

    #[test]
    fn name_round_trips_through_serde() {
        let name = ResourceName::new("prod-env").unwrap();
        let json = serde_json::to_string(&name).unwrap();
        let back: ResourceName = serde_json::from_str(&json).unwrap();
        assert_eq!(name, back);

        let bad: Result<ResourceName, _> = serde_json::from_str("\"has space\"");
        assert!(bad.is_err());
    }

    #[test]
    fn token_debug_redacts_value() {
        let token = Token {
            access_token: "sekrit-token".into(),
            issued_at: Utc::now(),
        };
        let rendered = format!("{:?}", token);
        assert!(!rendered.contains("sekrit-token"));
        assert!(rendered.contains("<redacted>"));
    }
}
