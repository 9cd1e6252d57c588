//! Authentication gateway
//!
//! [`AuthGateway`] is the seam between session controllers and the network.
//! Controllers only ever see this trait, so tests can substitute a mock.

use crate::client::{ApiClient, RequestError};
use crate::types::{LoginResponse, RegisterResponse, UserProfile};
use async_trait::async_trait;

/// Remote authentication and profile operations
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Exchange credentials for a session token
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, RequestError>;

    /// Create a new account
    async fn register(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<RegisterResponse, RequestError>;

    /// Fetch the profile of the user owning the stored token
    async fn fetch_profile(&self) -> Result<UserProfile, RequestError>;
}

#[async_trait]
impl AuthGateway for ApiClient {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, RequestError> {
        self.post_login(username, password).await
    }

    async fn register(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<RegisterResponse, RequestError> {
        self.post_register(username, password, email).await
    }

    async fn fetch_profile(&self) -> Result<UserProfile, RequestError> {
        self.get_profile().await
    }
}
