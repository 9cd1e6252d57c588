//! Integration tests for the API client
//!
//! These tests use wiremock to stand in for the catalog backend and exercise
//! the full request/response cycle through the [`AuthGateway`] trait.

use api_client::{ApiClient, ApiClientConfig, AuthGateway, UserId};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use storage::{MemoryTokenStore, TokenStore};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(ApiClientConfig::new(server.uri()), Arc::new(MemoryTokenStore::new())).unwrap()
}

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_login_success_bare_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({"username": "alice", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "abc123"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client.login("alice", "secret").await.unwrap();

    assert_eq!(response.token, "abc123");
}

#[tokio::test]
async fn test_login_success_wrapped_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"token": "wrapped"}})),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client.login("alice", "secret").await.unwrap();

    assert_eq!(response.token, "wrapped");
}

#[tokio::test]
async fn test_login_rejected_with_field_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Invalid credentials",
            "errors": {"password": "incorrect"}
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let error = client.login("alice", "wrong").await.unwrap_err();

    assert_eq!(error.status(), 401);
    assert_eq!(error.message(), Some("Invalid credentials"));
    assert_eq!(error.field_error("password"), Some("incorrect"));
    assert_eq!(error.field_error("username"), None);
}

#[tokio::test]
async fn test_error_body_not_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let error = client.login("alice", "secret").await.unwrap_err();

    assert_eq!(error.status(), 502);
    assert_eq!(error.message(), None);
    assert!(error.field_errors().is_empty());
}

#[tokio::test]
async fn test_login_success_with_unexpected_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let error = client.login("alice", "secret").await.unwrap_err();

    assert!(error.message().unwrap().starts_with("Failed to parse response"));
}

// =============================================================================
// Registration
// =============================================================================

#[tokio::test]
async fn test_register_ack_without_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/register"))
        .and(body_json(json!({
            "username": "bob",
            "password": "pw",
            "email": "bob@example.com"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"message": "created"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let ack = client.register("bob", "pw", "bob@example.com").await.unwrap();

    assert_eq!(ack.token, None);
    assert_eq!(ack.message.as_deref(), Some("created"));
}

#[tokio::test]
async fn test_register_ack_with_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "fresh"})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let ack = client.register("bob", "pw", "bob@example.com").await.unwrap();

    assert_eq!(ack.token.as_deref(), Some("fresh"));
}

#[tokio::test]
async fn test_register_empty_body_is_ack() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/register"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let ack = client.register("bob", "pw", "bob@example.com").await.unwrap();

    assert_eq!(ack.token, None);
    assert_eq!(ack.message, None);
}

#[tokio::test]
async fn test_register_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/register"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "message": "Conflict",
            "errors": {"username": ["already taken"]}
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let error = client.register("bob", "pw", "bob@example.com").await.unwrap_err();

    assert_eq!(error.status(), 409);
    assert_eq!(error.field_error("username"), Some("already taken"));
}

// =============================================================================
// Profile
// =============================================================================

#[tokio::test]
async fn test_profile_sends_bearer_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/profile"))
        .and(header("Authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "username": "alice",
            "email": "alice@example.com"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let tokens = Arc::new(MemoryTokenStore::with_token("abc123"));
    let client = ApiClient::new(ApiClientConfig::new(mock_server.uri()), tokens).unwrap();

    let profile = client.fetch_profile().await.unwrap();

    assert_eq!(profile.id, Some(UserId::Number(7)));
    assert_eq!(profile.username, "alice");
    assert_eq!(profile.email, "alice@example.com");
}

#[tokio::test]
async fn test_profile_reads_token_at_call_time() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/profile"))
        .and(header("Authorization", "Bearer later"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"username": "alice", "email": "alice@example.com"}
        })))
        .mount(&mock_server)
        .await;

    let tokens = Arc::new(MemoryTokenStore::new());
    let client =
        ApiClient::new(ApiClientConfig::new(mock_server.uri()), tokens.clone()).unwrap();

    tokens.save("later").await.unwrap();
    let profile = client.fetch_profile().await.unwrap();

    assert_eq!(profile.id, None);
    assert_eq!(profile.username, "alice");
}

#[tokio::test]
async fn test_profile_without_token_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/profile"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let error = client.fetch_profile().await.unwrap_err();

    assert_eq!(error.status(), 401);
}

// =============================================================================
// Transport
// =============================================================================

#[tokio::test]
async fn test_request_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"token": "late"}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let config = ApiClientConfig::new(mock_server.uri()).with_timeout(Duration::from_millis(100));
    let client = ApiClient::new(config, Arc::new(MemoryTokenStore::new())).unwrap();

    let error = client.login("alice", "secret").await.unwrap_err();

    assert!(error.is_timeout());
    assert_eq!(error.status(), 408);
    assert_eq!(error.message(), Some("Request timed out"));
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    // Nothing listens on port 1
    let uri = "http://127.0.0.1:1";

    let client =
        ApiClient::new(ApiClientConfig::new(uri), Arc::new(MemoryTokenStore::new())).unwrap();
    let error = client.login("alice", "secret").await.unwrap_err();

    assert!(error.is_network_error());
    assert_eq!(error.status(), 0);
    assert!(error.message().is_some());
}

#[tokio::test]
async fn test_default_headers_are_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(header("X-Client", "primatech"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "abc123"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ApiClientConfig::new(mock_server.uri()).with_header("X-Client", "primatech");
    let client = ApiClient::new(config, Arc::new(MemoryTokenStore::new())).unwrap();

    client.login("alice", "secret").await.unwrap();
}

#[tokio::test]
async fn test_base_url_with_path_prefix() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "abc123"})))
        .mount(&mock_server)
        .await;

    let config = ApiClientConfig::new(format!("{}/api/", mock_server.uri()));
    let client = ApiClient::new(config, Arc::new(MemoryTokenStore::new())).unwrap();

    assert_eq!(client.login("alice", "secret").await.unwrap().token, "abc123");
}
