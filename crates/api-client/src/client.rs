//! HTTP client for the catalog API
//!
//! This module provides the request error type, client configuration and
//! the reqwest-backed [`ApiClient`]. Requests are never retried: a failure
//! is surfaced to the caller immediately, and every request is bounded by
//! the configured timeout.

use crate::types::{
    decode_payload, ErrorBody, FieldErrors, LoginRequest, LoginResponse, RegisterRequest,
    RegisterResponse, UserProfile,
};
use reqwest::{Client as ReqwestClient, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use storage::TokenStore;

/// Login endpoint, relative to the base URL
pub const LOGIN_PATH: &str = "/login";
/// Registration endpoint, relative to the base URL
pub const REGISTER_PATH: &str = "/register";
/// Profile endpoint, relative to the base URL
pub const PROFILE_PATH: &str = "/profile";

/// Status used for failures that never produced an HTTP response
pub const STATUS_NETWORK: u16 = 0;
/// Status used when the request timed out
pub const STATUS_TIMEOUT: u16 = 408;
/// Status used when an authenticated call has no stored credential
pub const STATUS_UNAUTHORIZED: u16 = 401;

// =============================================================================
// Error Types
// =============================================================================

/// A rejected API call
///
/// Carries the HTTP status (0 for transport failures), the backend's
/// top-level message when it sent one, and per-field messages.
///
/// # Examples
/// ```
/// use api_client::RequestError;
///
/// let error = RequestError::new(401, "Invalid credentials")
///     .with_field_error("password", "incorrect");
/// assert_eq!(error.status(), 401);
/// assert_eq!(error.field_error("password"), Some("incorrect"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestError {
    status: u16,
    message: Option<String>,
    field_errors: FieldErrors,
}

impl RequestError {
    /// Create a new request error with a top-level message
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self { status, message: Some(message.into()), field_errors: FieldErrors::new() }
    }

    /// Create a request error carrying only a status
    pub fn status_only(status: u16) -> Self {
        Self { status, message: None, field_errors: FieldErrors::new() }
    }

    /// Attach a field-level error
    pub fn with_field_error(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.field_errors.insert(field.into(), message.into());
        self
    }

    /// Replace all field-level errors
    pub fn with_field_errors(mut self, field_errors: FieldErrors) -> Self {
        self.field_errors = field_errors;
        self
    }

    /// Transport failure with no HTTP response
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(STATUS_NETWORK, message)
    }

    /// The request exceeded the configured timeout
    pub fn timeout() -> Self {
        Self::new(STATUS_TIMEOUT, "Request timed out")
    }

    /// Build an error from a non-success response body
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed = ErrorBody::parse(body);
        Self {
            status,
            message: parsed.message(),
            field_errors: parsed.field_errors(),
        }
    }

    fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout()
        } else {
            Self::network(format!("Request failed: {}", err))
        }
    }

    /// Get the HTTP status code
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Get the top-level message, if the backend sent one
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Get all field-level errors
    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    /// Get the error for a single field
    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors.get(field).map(String::as_str)
    }

    /// Check whether the request timed out
    pub fn is_timeout(&self) -> bool {
        self.status == STATUS_TIMEOUT
    }

    /// Check whether the request never reached the server
    pub fn is_network_error(&self) -> bool {
        self.status == STATUS_NETWORK
    }
}

impl std::fmt::Display for RequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.message {
            Some(message) => write!(f, "Request failed ({}): {}", self.status, message),
            None => write!(f, "Request failed ({}): HTTP {}", self.status, self.status),
        }
    }
}

impl std::error::Error for RequestError {}

// =============================================================================
// Client Configuration
// =============================================================================

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL of the backend (e.g., "https://api.example.com")
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Custom headers to include in all requests
    pub default_headers: HashMap<String, String>,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("Primatech-Books/{}", env!("CARGO_PKG_VERSION")),
            default_headers: HashMap::new(),
        }
    }
}

impl ApiClientConfig {
    /// Create a new config with a base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Add a default header
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

// =============================================================================
// Client Implementation
// =============================================================================

/// HTTP client for the catalog API
///
/// Authenticated calls read the bearer token from the injected
/// [`TokenStore`] at call time.
///
/// # Examples
/// ```no_run
/// use api_client::{ApiClient, ApiClientConfig, AuthGateway};
/// use storage::MemoryTokenStore;
/// use std::sync::Arc;
///
/// async fn example() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ApiClientConfig::new("https://api.example.com");
///     let client = ApiClient::new(config, Arc::new(MemoryTokenStore::new()))?;
///
///     let response = client.login("alice", "secret").await?;
///     println!("token: {}", response.token);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct ApiClient {
    client: ReqwestClient,
    config: ApiClientConfig,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(config: ApiClientConfig, tokens: Arc<dyn TokenStore>) -> crate::Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(crate::Error::InvalidConfig("base_url must not be empty".to_string()));
        }

        let client = ReqwestClient::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { client, config, tokens })
    }

    /// Get the client configuration
    pub fn config(&self) -> &ApiClientConfig {
        &self.config
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// `POST /login`
    pub(crate) async fn post_login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<LoginResponse, RequestError> {
        let url = self.config.endpoint(LOGIN_PATH);
        let request = self.client.post(&url).json(&LoginRequest { username, password });
        let body = self.execute(request, &url).await?;
        Self::decode(&body)
    }

    /// `POST /register`
    ///
    /// Any 2xx is an acknowledgement; a body that does not decode is treated
    /// as an empty ack.
    pub(crate) async fn post_register(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<RegisterResponse, RequestError> {
        let url = self.config.endpoint(REGISTER_PATH);
        let request = self
            .client
            .post(&url)
            .json(&RegisterRequest { username, password, email });
        let body = self.execute(request, &url).await?;

        if body.trim().is_empty() {
            return Ok(RegisterResponse::default());
        }
        Ok(decode_payload(&body).unwrap_or_default())
    }

    /// `GET /profile` with the stored bearer token
    pub(crate) async fn get_profile(&self) -> Result<UserProfile, RequestError> {
        let token = self
            .tokens
            .get()
            .await
            .map_err(|e| RequestError::network(format!("Could not read session token: {}", e)))?
            .ok_or_else(|| RequestError::new(STATUS_UNAUTHORIZED, "Not logged in"))?;

        let url = self.config.endpoint(PROFILE_PATH);
        let request = self.client.get(&url).bearer_auth(token);
        let body = self.execute(request, &url).await?;
        Self::decode(&body)
    }

    /// Send a request and return the body of a successful response
    async fn execute(&self, mut request: RequestBuilder, url: &str) -> Result<String, RequestError> {
        for (key, value) in &self.config.default_headers {
            request = request.header(key, value);
        }

        tracing::debug!(%url, "sending request");

        let response = request.send().await.map_err(|e| {
            tracing::warn!(%url, error = %e, "request did not complete");
            RequestError::from_transport(e)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(RequestError::from_transport)?;

        if !status.is_success() {
            let error = RequestError::from_response(status.as_u16(), &body);
            tracing::warn!(%url, status = status.as_u16(), "request rejected");
            return Err(error);
        }

        Ok(body)
    }

    fn decode<T: DeserializeOwned>(body: &str) -> Result<T, RequestError> {
        decode_payload(body).map_err(|e| {
            RequestError::new(StatusCode::OK.as_u16(), format!("Failed to parse response: {}", e))
        })
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient").field("config", &self.config).finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================
