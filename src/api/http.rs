//! api::http
//!
//! HTTP implementation of the control-plane client using the REST API.
//!
//! # Design
//!
//! This module implements the `CloudClient` trait against the platform's
//! v1 REST surface. Requests carry a bearer token; the login endpoint is
//! the only unauthenticated call.
//!
//! # Error bodies
//!
//! The platform returns JSON error bodies of the form
//! `{ "code": "...", "description": "..." }`. The `association_not_empty`
//! code maps to [`ApiError::NotEmpty`], which commands use to suggest
//! rerunning a delete with `--recursive`.
//!
//! # Example
//!
//! ```ignore
//! use stratus::api::http::HttpCloudClient;
//! use stratus::api::CloudClient;
//!
//! let client = HttpCloudClient::new("https://api.stratus.example.com", Some(token));
//! let orgs = client.organizations().await?;
//! ```

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

use super::traits::{ApiError, AppUpdate, CloudClient};
use super::types::{App, Organization, Space, Token, User};

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "stratus-cli";

/// Error code the platform uses when a resource still has children.
const NOT_EMPTY_CODE: &str = "association_not_empty";

/// HTTP client for the control-plane API.
pub struct HttpCloudClient {
    /// HTTP client for making requests
    client: Client,
    /// API base URL (e.g. `https://api.stratus.example.com`)
    api_base: String,
    /// Bearer token; absent until the operator logs in
    token: Option<String>,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for HttpCloudClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCloudClient")
            .field("api_base", &self.api_base)
            .field("has_token", &self.token.is_some())
            .finish()
    }
}

/// Error body returned by the platform.
#[derive(Debug, Deserialize)]
struct PlatformErrorResponse {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: String,
}

#[derive(Debug, Serialize)]
struct NameRequest<'a> {
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct PasswordChangeRequest<'a> {
    password: &'a str,
    old_password: &'a str,
}

#[derive(Debug, Serialize)]
struct AppUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    memory_mb: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_mb: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    instances: Option<i64>,
}

impl HttpCloudClient {
    /// Create a client against the given API base URL.
    ///
    /// `token` is the stored bearer token; pass `None` before login.
    pub fn new(api_base: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    /// The API base URL this client talks to.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    /// Build common headers for authenticated requests.
    fn headers(&self) -> Result<HeaderMap, ApiError> {
        let token = self.token.as_ref().ok_or(ApiError::AuthRequired)?;
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ApiError::AuthFailed("stored token is malformed".into()))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        Ok(headers)
    }

    /// Handle API response, mapping errors appropriately.
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: Response,
    ) -> Result<T, ApiError> {
        let status = response.status();

        if status.is_success() {
            response.json().await.map_err(|e| ApiError::Api {
                status: status.as_u16(),
                message: format!("failed to parse response: {}", e),
            })
        } else {
            Err(self.error_from_response(response, status).await)
        }
    }

    /// Handle a response whose success body is empty.
    async fn handle_empty_response(&self, response: Response) -> Result<(), ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(self.error_from_response(response, status).await)
    }

    /// Map an error response onto the `ApiError` taxonomy.
    async fn error_from_response(&self, response: Response, status: StatusCode) -> ApiError {
        let body = response
            .json::<PlatformErrorResponse>()
            .await
            .unwrap_or(PlatformErrorResponse {
                code: String::new(),
                description: "unknown error".to_string(),
            });

        if body.code == NOT_EMPTY_CODE {
            return ApiError::NotEmpty {
                description: body.description,
            };
        }

        match status {
            StatusCode::UNAUTHORIZED => ApiError::AuthFailed("invalid or expired token".into()),
            StatusCode::FORBIDDEN => ApiError::AuthFailed(body.description),
            StatusCode::NOT_FOUND => ApiError::NotFound(body.description),
            _ if status.is_server_error() => ApiError::Api {
                status: status.as_u16(),
                message: format!("server error: {}", body.description),
            },
            _ => ApiError::Api {
                status: status.as_u16(),
                message: body.description,
            },
        }
    }
}

#[async_trait]
impl CloudClient for HttpCloudClient {
    async fn login(&self, email: &str, password: &str) -> Result<Token, ApiError> {
        let response = self
            .client
            .post(self.url("/v1/sessions"))
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, USER_AGENT_VALUE)
            .json(&LoginRequest { email, password })
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::AuthFailed("invalid email or password".into()));
        }
        let body: LoginResponse = self.handle_response(response).await?;
        Ok(Token {
            access_token: body.access_token,
            issued_at: Utc::now(),
        })
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        let response = self
            .client
            .get(self.url("/v1/user"))
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        self.handle_response(response).await
    }

    async fn change_password(
        &self,
        user_guid: &str,
        new_password: &str,
        old_password: &str,
    ) -> Result<(), ApiError> {
        let response = self
            .client
            .put(self.url(&format!("/v1/users/{}/password", user_guid)))
            .headers(self.headers()?)
            .json(&PasswordChangeRequest {
                password: new_password,
                old_password,
            })
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        self.handle_empty_response(response).await
    }

    async fn organizations(&self) -> Result<Vec<Organization>, ApiError> {
        let response = self
            .client
            .get(self.url("/v1/organizations"))
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        self.handle_response(response).await
    }

    async fn organization_by_name(&self, name: &str) -> Result<Option<Organization>, ApiError> {
        let orgs = self.organizations().await?;
        Ok(orgs.into_iter().find(|o| o.name == name))
    }

    async fn create_organization(&self, name: &str) -> Result<Organization, ApiError> {
        let response = self
            .client
            .post(self.url("/v1/organizations"))
            .headers(self.headers()?)
            .json(&NameRequest { name })
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        self.handle_response(response).await
    }

    async fn delete_organization(&self, guid: &str, recursive: bool) -> Result<(), ApiError> {
        let mut url = self.url(&format!("/v1/organizations/{}", guid));
        if recursive {
            url.push_str("?recursive=true");
        }
        let response = self
            .client
            .delete(url)
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        self.handle_empty_response(response).await
    }

    async fn spaces(&self, organization_guid: &str) -> Result<Vec<Space>, ApiError> {
        let response = self
            .client
            .get(self.url(&format!(
                "/v1/organizations/{}/spaces",
                organization_guid
            )))
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        self.handle_response(response).await
    }

    async fn space_by_name(
        &self,
        organization_guid: &str,
        name: &str,
    ) -> Result<Option<Space>, ApiError> {
        let spaces = self.spaces(organization_guid).await?;
        Ok(spaces.into_iter().find(|s| s.name == name))
    }

    async fn create_space(
        &self,
        organization_guid: &str,
        name: &str,
    ) -> Result<Space, ApiError> {
        let response = self
            .client
            .post(self.url(&format!(
                "/v1/organizations/{}/spaces",
                organization_guid
            )))
            .headers(self.headers()?)
            .json(&NameRequest { name })
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        self.handle_response(response).await
    }

    async fn delete_space(&self, guid: &str, recursive: bool) -> Result<(), ApiError> {
        let mut url = self.url(&format!("/v1/spaces/{}", guid));
        if recursive {
            url.push_str("?recursive=true");
        }
        let response = self
            .client
            .delete(url)
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        self.handle_empty_response(response).await
    }

    async fn apps(&self, space_guid: &str) -> Result<Vec<App>, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/v1/spaces/{}/apps", space_guid)))
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        self.handle_response(response).await
    }

    async fn app_by_name(&self, space_guid: &str, name: &str) -> Result<Option<App>, ApiError> {
        let apps = self.apps(space_guid).await?;
        Ok(apps.into_iter().find(|a| a.name == name))
    }

    async fn update_app(&self, guid: &str, update: &AppUpdate) -> Result<App, ApiError> {
        let response = self
            .client
            .put(self.url(&format!("/v1/apps/{}", guid)))
            .headers(self.headers()?)
            .json(&AppUpdateRequest {
                memory_mb: update.memory_mb,
                disk_mb: update.disk_mb,
                instances: update.instances,
            })
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        self.handle_response(response).await
    }

    async fn delete_app(&self, guid: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url(&format!("/v1/apps/{}", guid)))
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        self.handle_empty_response(response).await
    }

    async fn restart_app(&self, guid: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url(&format!("/v1/apps/{}/restart", guid)))
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        self.handle_empty_response(response).await
    }
}
