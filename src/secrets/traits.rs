//! secrets::traits
//!
//! Secret storage trait definition.
//!
//! # Design
//!
//! The `SecretStore` trait is a simple key-value interface. Keys are
//! namespaced per target host (e.g. `token.api.stratus.example.com`) so
//! one state directory can hold sessions against several platforms.
//!
//! # Security
//!
//! Implementations MUST:
//! - Never log, print, or include secret values in error messages
//! - Use storage mechanisms restricted to the owning user
//! - Be thread-safe (Send + Sync)

use thiserror::Error;

/// Errors from secret storage operations.
///
/// Note: Error messages intentionally do not include secret values.
#[derive(Debug, Error)]
pub enum SecretError {
    /// Failed to read from secret storage.
    #[error("failed to read secret: {0}")]
    ReadError(String),

    /// Failed to write to secret storage.
    #[error("failed to write secret: {0}")]
    WriteError(String),

    /// Secret storage location could not be determined.
    #[error("secret store unavailable: {0}")]
    Unavailable(String),
}

/// Key-value storage for secrets.
pub trait SecretStore: Send + Sync {
    /// Retrieve a secret, `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>, SecretError>;

    /// Store a secret, replacing any existing value.
    fn set(&self, key: &str, value: &str) -> Result<(), SecretError>;

    /// Remove a secret. Removing an absent key is not an error.
    fn delete(&self, key: &str) -> Result<(), SecretError>;

    /// Whether a secret exists, without reading its value.
    fn exists(&self, key: &str) -> Result<bool, SecretError> {
        Ok(self.get(key)?.is_some())
    }
}

/// The storage key for a target's bearer token.
///
/// Derived from the API URL with the scheme stripped, so the key stays
/// readable in the secrets file without being a full URL.
pub fn token_key(api_url: &str) -> String {
    let host = api_url
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/');
    format!("token.{}", host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_keys_strip_scheme() {
        assert_eq!(
            token_key("https://api.stratus.example.com"),
            "token.api.stratus.example.com"
        );
        assert_eq!(token_key("http://localhost:8080/"), "token.localhost:8080");
    }
}
