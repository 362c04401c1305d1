//! Integration tests for the HTTP control-plane client.
//!
//! These run `HttpCloudClient` against a stub server and verify request
//! shape (auth header, paths, query params) and error-body mapping.

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stratus::api::{ApiError, AppUpdate, CloudClient, HttpCloudClient};

fn authed_client(server: &MockServer) -> HttpCloudClient {
    HttpCloudClient::new(server.uri(), Some("tok-123".into()))
}

#[tokio::test]
async fn login_exchanges_credentials_for_a_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh-token"
        })))
        .mount(&server)
        .await;

    let client = HttpCloudClient::new(server.uri(), None);
    let token = client.login("dev@example.com", "pw").await.unwrap();
    assert_eq!(token.access_token, "fresh-token");
}

#[tokio::test]
async fn login_rejection_is_auth_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/sessions"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = HttpCloudClient::new(server.uri(), None);
    let err = client.login("dev@example.com", "wrong").await.unwrap_err();
    assert!(matches!(err, ApiError::AuthFailed(_)));
}

#[tokio::test]
async fn requests_carry_the_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/organizations"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "guid": "org-1", "name": "acme" }
        ])))
        .mount(&server)
        .await;

    let orgs = authed_client(&server).organizations().await.unwrap();
    assert_eq!(orgs.len(), 1);
    assert_eq!(orgs[0].name, "acme");
}

#[tokio::test]
async fn missing_token_fails_before_any_request() {
    let server = MockServer::start().await;
    // No mocks mounted: a request would 404. AuthRequired means we never
    // got that far.
    let client = HttpCloudClient::new(server.uri(), None);
    let err = client.organizations().await.unwrap_err();
    assert!(matches!(err, ApiError::AuthRequired));
}

#[tokio::test]
async fn not_empty_error_body_maps_to_not_empty() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/spaces/space-1"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": "association_not_empty",
            "description": "space 'staging' still contains 3 apps"
        })))
        .mount(&server)
        .await;

    let err = authed_client(&server)
        .delete_space("space-1", false)
        .await
        .unwrap_err();
    match err {
        ApiError::NotEmpty { description } => {
            assert!(description.contains("3 apps"));
        }
        other => panic!("expected NotEmpty, got {:?}", other),
    }
}

#[tokio::test]
async fn recursive_delete_sends_the_query_param() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/spaces/space-1"))
        .and(query_param("recursive", "true"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    authed_client(&server)
        .delete_space("space-1", true)
        .await
        .unwrap();
}

#[tokio::test]
async fn not_found_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/spaces/space-9/apps"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "resource_not_found",
            "description": "space does not exist"
        })))
        .mount(&server)
        .await;

    let err = authed_client(&server).apps("space-9").await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn update_app_sends_only_supplied_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v1/apps/app-1"))
        .and(wiremock::matchers::body_json(json!({ "memory_mb": 2048 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "guid": "app-1",
            "name": "web",
            "space_guid": "space-1",
            "memory_mb": 2048,
            "disk_mb": 1024,
            "instances": 2,
            "state": "started"
        })))
        .mount(&server)
        .await;

    let app = authed_client(&server)
        .update_app(
            "app-1",
            &AppUpdate {
                memory_mb: Some(2048),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(app.memory_mb, 2048);
}
