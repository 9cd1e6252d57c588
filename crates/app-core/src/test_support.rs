//! Fakes shared by controller tests

use api_client::{AuthGateway, LoginResponse, RegisterResponse, RequestError, UserProfile};
use app_state::{AuthScreen, NavigationRoot, Navigator};
use async_trait::async_trait;
use mockall::mock;
use parking_lot::Mutex;
use std::sync::Arc;
use storage::{StorageError, TokenStore};

mock! {
    pub Gateway {}

    #[async_trait]
    impl AuthGateway for Gateway {
        async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, RequestError>;
        async fn register(
            &self,
            username: &str,
            password: &str,
            email: &str,
        ) -> Result<RegisterResponse, RequestError>;
        async fn fetch_profile(&self) -> Result<UserProfile, RequestError>;
    }
}

/// Observable side effect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Saved(String),
    Cleared,
    Reset(NavigationRoot),
    Auth(AuthScreen),
}

/// Ordered record of side effects across fakes
#[derive(Debug, Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<Event>>>);

impl EventLog {
    pub fn push(&self, event: Event) {
        self.0.lock().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().clone()
    }

    pub fn resets(&self) -> Vec<NavigationRoot> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Reset(root) => Some(root),
                _ => None,
            })
            .collect()
    }
}

/// Token store that records every mutation
#[derive(Default)]
pub struct RecordingTokens {
    log: EventLog,
    token: Mutex<Option<String>>,
    fail_save: bool,
    fail_clear: bool,
}

impl RecordingTokens {
    pub fn new(log: &EventLog) -> Self {
        Self { log: log.clone(), ..Default::default() }
    }

    pub fn with_token(log: &EventLog, token: &str) -> Self {
        Self { log: log.clone(), token: Mutex::new(Some(token.to_string())), ..Default::default() }
    }

    pub fn failing_save(mut self) -> Self {
        self.fail_save = true;
        self
    }

    pub fn failing_clear(mut self) -> Self {
        self.fail_clear = true;
        self
    }
}

#[async_trait]
impl TokenStore for RecordingTokens {
    async fn save(&self, token: &str) -> storage::Result<()> {
        tokio::task::yield_now().await;
        if self.fail_save {
            return Err(StorageError::Unavailable("disk full".to_string()));
        }
        *self.token.lock() = Some(token.to_string());
        self.log.push(Event::Saved(token.to_string()));
        Ok(())
    }

    async fn get(&self) -> storage::Result<Option<String>> {
        Ok(self.token.lock().clone())
    }

    async fn clear(&self) -> storage::Result<()> {
        tokio::task::yield_now().await;
        if self.fail_clear {
            return Err(StorageError::Unavailable("read-only".to_string()));
        }
        self.token.lock().take();
        self.log.push(Event::Cleared);
        Ok(())
    }
}

/// Navigator that records every request
pub struct RecordingNavigator {
    log: EventLog,
}

impl RecordingNavigator {
    pub fn new(log: &EventLog) -> Self {
        Self { log: log.clone() }
    }
}

impl Navigator for RecordingNavigator {
    fn reset_root(&self, root: NavigationRoot) {
        self.log.push(Event::Reset(root));
    }

    fn navigate_auth(&self, screen: AuthScreen) {
        self.log.push(Event::Auth(screen));
    }
}

pub fn invalid_credentials() -> RequestError {
    RequestError::new(401, "Invalid credentials").with_field_error("password", "incorrect")
}
