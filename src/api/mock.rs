//! api::mock
//!
//! Mock control-plane client for deterministic testing.
//!
//! # Design
//!
//! The mock client implements `CloudClient` against in-memory state. Tests
//! seed it with organizations, spaces, and apps, optionally configure one
//! operation to fail, and inspect the recorded operation log afterwards.
//!
//! # Example
//!
//! ```
//! use stratus::api::mock::MockCloudClient;
//! use stratus::api::CloudClient;
//!
//! # tokio_test::block_on(async {
//! let client = MockCloudClient::new();
//! let org = client.create_organization("acme").await.unwrap();
//! let space = client.create_space(&org.guid, "staging").await.unwrap();
//!
//! let spaces = client.spaces(&org.guid).await.unwrap();
//! assert_eq!(spaces, vec![space]);
//! # });
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use super::traits::{ApiError, AppUpdate, CloudClient};
use super::types::{App, AppState, Organization, Space, Token, User};

/// Mock control-plane client.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockCloudClient {
    inner: Arc<Mutex<Inner>>,
}

/// Internal mutable state.
#[derive(Debug, Default)]
struct Inner {
    orgs: Vec<Organization>,
    spaces: Vec<Space>,
    apps: Vec<App>,
    user: Option<User>,
    /// Accepted (email, password) pairs for login.
    credentials: Vec<(String, String)>,
    next_id: u64,
    fail_on: Option<FailOn>,
    operations: Vec<MockOperation>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail `delete_space` for the given space guid.
    DeleteSpace(String, ApiError),
    /// Fail `delete_organization` for the given org guid.
    DeleteOrganization(String, ApiError),
    /// Fail `update_app` with the given error.
    UpdateApp(ApiError),
    /// Fail `change_password` with the given error.
    ChangePassword(ApiError),
}

/// Recorded operations for verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    Login { email: String },
    ChangePassword { user_guid: String },
    CreateOrganization { name: String },
    DeleteOrganization { guid: String, recursive: bool },
    CreateSpace { organization_guid: String, name: String },
    DeleteSpace { guid: String, recursive: bool },
    UpdateApp { guid: String, update: AppUpdateRecord },
    DeleteApp { guid: String },
    RestartApp { guid: String },
}

/// The fields an `update_app` call asked to change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppUpdateRecord {
    pub memory_mb: Option<i64>,
    pub disk_mb: Option<i64>,
    pub instances: Option<i64>,
}

impl MockCloudClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the authenticated user and an accepted credential pair.
    pub fn with_user(self, email: &str, password: &str) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            let guid = inner.fresh_guid("user");
            inner.user = Some(User {
                guid,
                email: email.to_string(),
            });
            inner
                .credentials
                .push((email.to_string(), password.to_string()));
        }
        self
    }

    /// Seed an organization, returning its guid.
    pub fn add_organization(&self, name: &str) -> String {
        let mut inner = self.inner.lock().unwrap();
        let guid = inner.fresh_guid("org");
        inner.orgs.push(Organization {
            guid: guid.clone(),
            name: name.to_string(),
        });
        guid
    }

    /// Seed a space in an organization, returning its guid.
    pub fn add_space(&self, organization_guid: &str, name: &str) -> String {
        let mut inner = self.inner.lock().unwrap();
        let guid = inner.fresh_guid("space");
        inner.spaces.push(Space {
            guid: guid.clone(),
            name: name.to_string(),
            organization_guid: organization_guid.to_string(),
        });
        guid
    }

    /// Seed an app in a space, returning its guid.
    pub fn add_app(&self, space_guid: &str, name: &str, memory_mb: i64, state: AppState) -> String {
        let mut inner = self.inner.lock().unwrap();
        let guid = inner.fresh_guid("app");
        inner.apps.push(App {
            guid: guid.clone(),
            name: name.to_string(),
            space_guid: space_guid.to_string(),
            memory_mb,
            disk_mb: 1024,
            instances: 1,
            state,
        });
        guid
    }

    /// Configure one operation to fail.
    pub fn fail_on(&self, failure: FailOn) {
        self.inner.lock().unwrap().fail_on = Some(failure);
    }

    /// The operations performed so far, in order.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.inner.lock().unwrap().operations.clone()
    }

    /// Look up an app by guid (for post-condition assertions).
    pub fn app(&self, guid: &str) -> Option<App> {
        self.inner
            .lock()
            .unwrap()
            .apps
            .iter()
            .find(|a| a.guid == guid)
            .cloned()
    }

    /// Current space names in an organization (for post-condition assertions).
    pub fn space_names(&self, organization_guid: &str) -> Vec<String> {
        self.inner
            .lock()
            .unwrap()
            .spaces
            .iter()
            .filter(|s| s.organization_guid == organization_guid)
            .map(|s| s.name.clone())
            .collect()
    }

    /// Current organization names (for post-condition assertions).
    pub fn organization_names(&self) -> Vec<String> {
        self.inner
            .lock()
            .unwrap()
            .orgs
            .iter()
            .map(|o| o.name.clone())
            .collect()
    }
}

impl Inner {
    fn fresh_guid(&mut self, kind: &str) -> String {
        self.next_id += 1;
        format!("{}-guid-{}", kind, self.next_id)
    }

    fn record(&mut self, op: MockOperation) {
        self.operations.push(op);
    }
}

#[async_trait]
impl CloudClient for MockCloudClient {
    async fn login(&self, email: &str, password: &str) -> Result<Token, ApiError> {
        let mut inner = self.inner.lock().unwrap();
        inner.record(MockOperation::Login {
            email: email.to_string(),
        });
        let accepted = inner
            .credentials
            .iter()
            .any(|(e, p)| e == email && p == password);
        if !accepted {
            return Err(ApiError::AuthFailed("invalid email or password".into()));
        }
        Ok(Token {
            access_token: format!("mock-token-for-{}", email),
            issued_at: Utc::now(),
        })
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        self.inner
            .lock()
            .unwrap()
            .user
            .clone()
            .ok_or(ApiError::AuthRequired)
    }

    async fn change_password(
        &self,
        user_guid: &str,
        _new_password: &str,
        _old_password: &str,
    ) -> Result<(), ApiError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(FailOn::ChangePassword(err)) = &inner.fail_on {
            return Err(err.clone());
        }
        inner.record(MockOperation::ChangePassword {
            user_guid: user_guid.to_string(),
        });
        Ok(())
    }

    async fn organizations(&self) -> Result<Vec<Organization>, ApiError> {
        Ok(self.inner.lock().unwrap().orgs.clone())
    }

    async fn organization_by_name(&self, name: &str) -> Result<Option<Organization>, ApiError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .orgs
            .iter()
            .find(|o| o.name == name)
            .cloned())
    }

    async fn create_organization(&self, name: &str) -> Result<Organization, ApiError> {
        let mut inner = self.inner.lock().unwrap();
        inner.record(MockOperation::CreateOrganization {
            name: name.to_string(),
        });
        if inner.orgs.iter().any(|o| o.name == name) {
            return Err(ApiError::Api {
                status: 400,
                message: format!("organization '{}' already exists", name),
            });
        }
        let guid = inner.fresh_guid("org");
        let org = Organization {
            guid,
            name: name.to_string(),
        };
        inner.orgs.push(org.clone());
        Ok(org)
    }

    async fn delete_organization(&self, guid: &str, recursive: bool) -> Result<(), ApiError> {
        let mut inner = self.inner.lock().unwrap();
        inner.record(MockOperation::DeleteOrganization {
            guid: guid.to_string(),
            recursive,
        });
        if let Some(FailOn::DeleteOrganization(fail_guid, err)) = &inner.fail_on {
            if fail_guid == guid {
                return Err(err.clone());
            }
        }
        if !inner.orgs.iter().any(|o| o.guid == guid) {
            return Err(ApiError::NotFound(format!("organization {}", guid)));
        }
        let has_spaces = inner.spaces.iter().any(|s| s.organization_guid == guid);
        if has_spaces && !recursive {
            return Err(ApiError::NotEmpty {
                description: "organization still contains spaces".into(),
            });
        }
        inner.orgs.retain(|o| o.guid != guid);
        let orphaned: Vec<String> = inner
            .spaces
            .iter()
            .filter(|s| s.organization_guid == guid)
            .map(|s| s.guid.clone())
            .collect();
        inner.spaces.retain(|s| s.organization_guid != guid);
        inner.apps.retain(|a| !orphaned.contains(&a.space_guid));
        Ok(())
    }

    async fn spaces(&self, organization_guid: &str) -> Result<Vec<Space>, ApiError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .spaces
            .iter()
            .filter(|s| s.organization_guid == organization_guid)
            .cloned()
            .collect())
    }

    async fn space_by_name(
        &self,
        organization_guid: &str,
        name: &str,
    ) -> Result<Option<Space>, ApiError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .spaces
            .iter()
            .find(|s| s.organization_guid == organization_guid && s.name == name)
            .cloned())
    }

    async fn create_space(
        &self,
        organization_guid: &str,
        name: &str,
    ) -> Result<Space, ApiError> {
        let mut inner = self.inner.lock().unwrap();
        inner.record(MockOperation::CreateSpace {
            organization_guid: organization_guid.to_string(),
            name: name.to_string(),
        });
        if !inner.orgs.iter().any(|o| o.guid == organization_guid) {
            return Err(ApiError::NotFound(format!(
                "organization {}",
                organization_guid
            )));
        }
        let guid = inner.fresh_guid("space");
        let space = Space {
            guid,
            name: name.to_string(),
            organization_guid: organization_guid.to_string(),
        };
        inner.spaces.push(space.clone());
        Ok(space)
    }

    async fn delete_space(&self, guid: &str, recursive: bool) -> Result<(), ApiError> {
        let mut inner = self.inner.lock().unwrap();
        inner.record(MockOperation::DeleteSpace {
            guid: guid.to_string(),
            recursive,
        });
        if let Some(FailOn::DeleteSpace(fail_guid, err)) = &inner.fail_on {
            if fail_guid == guid {
                return Err(err.clone());
            }
        }
        if !inner.spaces.iter().any(|s| s.guid == guid) {
            return Err(ApiError::NotFound(format!("space {}", guid)));
        }
        let has_apps = inner.apps.iter().any(|a| a.space_guid == guid);
        if has_apps && !recursive {
            return Err(ApiError::NotEmpty {
                description: "space still contains apps".into(),
            });
        }
        inner.spaces.retain(|s| s.guid != guid);
        inner.apps.retain(|a| a.space_guid != guid);
        Ok(())
    }

    async fn apps(&self, space_guid: &str) -> Result<Vec<App>, ApiError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .apps
            .iter()
            .filter(|a| a.space_guid == space_guid)
            .cloned()
            .collect())
    }

    async fn app_by_name(&self, space_guid: &str, name: &str) -> Result<Option<App>, ApiError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .apps
            .iter()
            .find(|a| a.space_guid == space_guid && a.name == name)
            .cloned())
    }

    async fn update_app(&self, guid: &str, update: &AppUpdate) -> Result<App, ApiError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(FailOn::UpdateApp(err)) = &inner.fail_on {
            return Err(err.clone());
        }
        inner.record(MockOperation::UpdateApp {
            guid: guid.to_string(),
            update: AppUpdateRecord {
                memory_mb: update.memory_mb,
                disk_mb: update.disk_mb,
                instances: update.instances,
            },
        });
        let app = inner
            .apps
            .iter_mut()
            .find(|a| a.guid == guid)
            .ok_or_else(|| ApiError::NotFound(format!("app {}", guid)))?;
        if let Some(memory) = update.memory_mb {
            app.memory_mb = memory;
        }
        if let Some(disk) = update.disk_mb {
            app.disk_mb = disk;
        }
        if let Some(instances) = update.instances {
            app.instances = instances;
        }
        Ok(app.clone())
    }

    async fn delete_app(&self, guid: &str) -> Result<(), ApiError> {
        let mut inner = self.inner.lock().unwrap();
        inner.record(MockOperation::DeleteApp {
            guid: guid.to_string(),
        });
        if !inner.apps.iter().any(|a| a.guid == guid) {
            return Err(ApiError::NotFound(format!("app {}", guid)));
        }
        inner.apps.retain(|a| a.guid != guid);
        Ok(())
    }

    async fn restart_app(&self, guid: &str) -> Result<(), ApiError> {
        let mut inner = self.inner.lock().unwrap();
        inner.record(MockOperation::RestartApp {
            guid: guid.to_string(),
        });
        if !inner.apps.iter().any(|a| a.guid == guid) {
            return Err(ApiError::NotFound(format!("app {}", guid)));
        }
        Ok(())
    }
}
