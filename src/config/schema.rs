//! config::schema
//!
//! Persisted target state.
//!
//! # Location
//!
//! `$STRATUS_HOME/target.toml` if `STRATUS_HOME` is set, otherwise
//! `~/.stratus/target.toml`.
//!
//! # Contents
//!
//! ```toml
//! api = "https://api.stratus.example.com"
//! organization = "acme"
//! space = "staging"
//! ```

use serde::{Deserialize, Serialize};

/// The remembered target: API endpoint plus current organization/space.
///
/// All fields are optional; `stratus target` fills them in as the operator
/// narrows the target.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct TargetConfig {
    /// API endpoint URL.
    pub api: Option<String>,

    /// Currently targeted organization name.
    pub organization: Option<String>,

    /// Currently targeted space name.
    pub space: Option<String>,
}

impl TargetConfig {
    /// True when no API endpoint has been targeted yet.
    pub fn is_untargeted(&self) -> bool {
        self.api.is_none()
    }
}

/// Normalize an operator-supplied target URL.
///
/// Bare hostnames get an `https://` scheme; trailing slashes are dropped.
pub fn normalize_target_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_normalization() {
        assert_eq!(
            normalize_target_url("api.stratus.example.com"),
            "https://api.stratus.example.com"
        );
        assert_eq!(
            normalize_target_url("https://api.stratus.example.com/"),
            "https://api.stratus.example.com"
        );
        assert_eq!(
            normalize_target_url("http://localhost:8080"),
            "http://localhost:8080"
        );
    }

    #[test]
    fn default_config_is_untargeted() {
        let config = TargetConfig::default();
        assert!(config.is_untargeted());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<TargetConfig, _> = toml::from_str("api = \"x\"\nbogus = 1\n");
        assert!(result.is_err());
    }

    #[test]
    fn round_trips_through_toml() {
        let config = TargetConfig {
            api: Some("https://api.stratus.example.com".into()),
            organization: Some("acme".into()),
            space: Some("staging".into()),
        };
        let rendered = toml::to_string(&config).unwrap();
        let back: TargetConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(config, back);
    }
}
