//! Process-wide session state
//!
//! [`SessionContext`] is the single place that touches the token store on
//! behalf of controllers. It is created once by the composition root and
//! shared behind an `Arc`.

use api_client::UserProfile;
use parking_lot::RwLock;
use std::sync::Arc;
use storage::{StorageError, TokenStore};

use crate::root::NavigationRoot;

/// Session-related errors
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The token store failed
    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;

/// Shared session state
pub struct SessionContext {
    tokens: Arc<dyn TokenStore>,
    current_user: RwLock<Option<UserProfile>>,
}

impl SessionContext {
    /// Create a session context over a token store
    pub fn new(tokens: Arc<dyn TokenStore>) -> Self {
        Self { tokens, current_user: RwLock::new(None) }
    }

    /// Pick the cold-start navigation root
    ///
    /// An unreadable store is treated as signed out.
    pub async fn init(&self) -> NavigationRoot {
        let root = match self.tokens.get().await {
            Ok(token) => NavigationRoot::for_session(token.is_some()),
            Err(e) => {
                tracing::warn!(error = %e, "could not read session token at startup");
                NavigationRoot::AuthStack
            }
        };
        tracing::info!(%root, "cold start");
        root
    }

    /// Persist a freshly issued token
    ///
    /// Resolves only once the token store reports the write durable.
    pub async fn establish(&self, token: &str) -> Result<()> {
        self.tokens.save(token).await?;
        tracing::info!("session established");
        Ok(())
    }

    /// Clear the stored token and forget the current user
    pub async fn teardown(&self) -> Result<()> {
        self.tokens.clear().await?;
        self.current_user.write().take();
        tracing::info!("session cleared");
        Ok(())
    }

    /// Read the stored token
    pub async fn token(&self) -> Result<Option<String>> {
        Ok(self.tokens.get().await?)
    }

    /// Check whether a token is stored
    pub async fn is_authenticated(&self) -> Result<bool> {
        Ok(self.token().await?.is_some())
    }

    /// Last profile loaded for this session
    pub fn current_user(&self) -> Option<UserProfile> {
        self.current_user.read().clone()
    }

    /// Replace the cached current user
    pub fn set_current_user(&self, user: Option<UserProfile>) {
        *self.current_user.write() = user;
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("current_user", &*self.current_user.read())
            .finish_non_exhaustive()
    }
}
