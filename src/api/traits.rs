//! api::traits
//!
//! Client trait for the control-plane API.
//!
//! # Design
//!
//! The `CloudClient` trait is async because every operation involves
//! network I/O. All methods return `Result` so commands can decide whether
//! a failure aborts the invocation or is reported and skipped (batch
//! deletes do the latter).
//!
//! Commands call this trait only after input resolution has produced
//! validated values; the resolver itself never touches the network.
//!
//! # Example
//!
//! ```ignore
//! use stratus::api::{ApiError, CloudClient};
//!
//! async fn org_names(client: &dyn CloudClient) -> Result<Vec<String>, ApiError> {
//!     let orgs = client.organizations().await?;
//!     Ok(orgs.into_iter().map(|o| o.name).collect())
//! }
//! ```

use async_trait::async_trait;
use thiserror::Error;

use super::types::{App, Organization, Space, Token, User};

/// Errors from control-plane operations.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// No token is available; the operator must log in first.
    #[error("not logged in; run 'stratus login' first")]
    AuthRequired,

    /// The server rejected the credentials or token.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The resource still contains dependent objects (spaces with apps,
    /// organizations with spaces). Deleting it requires `recursive`.
    #[error("{description}")]
    NotEmpty {
        /// Server-provided description of what is still attached.
        description: String,
    },

    /// Any other error response from the API.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    Network(String),
}

/// Fields of an application that `scale` may change.
///
/// `None` fields are left untouched by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppUpdate {
    pub memory_mb: Option<i64>,
    pub disk_mb: Option<i64>,
    pub instances: Option<i64>,
}

impl AppUpdate {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.memory_mb.is_none() && self.disk_mb.is_none() && self.instances.is_none()
    }
}

/// Client for the control-plane API.
///
/// Implementations: [`HttpCloudClient`](super::http::HttpCloudClient) for
/// production, [`MockCloudClient`](super::mock::MockCloudClient) for tests.
#[async_trait]
pub trait CloudClient: Send + Sync {
    /// Exchange credentials for a bearer token.
    async fn login(&self, email: &str, password: &str) -> Result<Token, ApiError>;

    /// The user the current token belongs to.
    async fn current_user(&self) -> Result<User, ApiError>;

    /// Change a user's password, verifying the old one.
    async fn change_password(
        &self,
        user_guid: &str,
        new_password: &str,
        old_password: &str,
    ) -> Result<(), ApiError>;

    /// List all organizations visible to the user.
    async fn organizations(&self) -> Result<Vec<Organization>, ApiError>;

    /// Find an organization by name.
    async fn organization_by_name(&self, name: &str) -> Result<Option<Organization>, ApiError>;

    /// Create an organization.
    async fn create_organization(&self, name: &str) -> Result<Organization, ApiError>;

    /// Delete an organization. Without `recursive`, fails with
    /// [`ApiError::NotEmpty`] when the organization still has spaces.
    async fn delete_organization(&self, guid: &str, recursive: bool) -> Result<(), ApiError>;

    /// List the spaces of an organization.
    async fn spaces(&self, organization_guid: &str) -> Result<Vec<Space>, ApiError>;

    /// Find a space by name within an organization.
    async fn space_by_name(
        &self,
        organization_guid: &str,
        name: &str,
    ) -> Result<Option<Space>, ApiError>;

    /// Create a space within an organization.
    async fn create_space(&self, organization_guid: &str, name: &str) -> Result<Space, ApiError>;

    /// Delete a space. Without `recursive`, fails with
    /// [`ApiError::NotEmpty`] when the space still has apps.
    async fn delete_space(&self, guid: &str, recursive: bool) -> Result<(), ApiError>;

    /// List the applications in a space.
    async fn apps(&self, space_guid: &str) -> Result<Vec<App>, ApiError>;

    /// Find an application by name within a space.
    async fn app_by_name(&self, space_guid: &str, name: &str) -> Result<Option<App>, ApiError>;

    /// Apply a partial update (scaling) to an application.
    async fn update_app(&self, guid: &str, update: &AppUpdate) -> Result<App, ApiError>;

    /// Delete an application.
    async fn delete_app(&self, guid: &str) -> Result<(), ApiError>;

    /// Restart a started application.
    async fn restart_app(&self, guid: &str) -> Result<(), ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_update_emptiness() {
        assert!(AppUpdate::default().is_empty());
        assert!(!AppUpdate {
            memory_mb: Some(2048),
            ..Default::default()
        }
        .is_empty());
    }

    #[test]
    fn not_empty_displays_server_description() {
        let err = ApiError::NotEmpty {
            description: "space 'staging' still contains 3 apps".into(),
        };
        assert_eq!(err.to_string(), "space 'staging' still contains 3 apps");
    }
}
