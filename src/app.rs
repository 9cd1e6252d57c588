//! Composition root
//!
//! Wires the token store, API client, session context and navigator
//! together, picks the cold-start root, and hands out screen controllers.

use anyhow::{Context, Result};
use api_client::{ApiClient, AuthGateway};
use app_core::{AuthController, ProfileController};
use app_state::{NavigationRoot, SessionContext};
use app_ui::AppNavigator;
use std::sync::Arc;
use storage::{KvTokenStore, TokenStore};

use crate::config::AppConfig;

/// Running application
pub struct App {
    config: AppConfig,
    session: Arc<SessionContext>,
    gateway: Arc<dyn AuthGateway>,
    navigator: Arc<AppNavigator>,
}

impl App {
    /// Open the session database and start the app
    pub async fn bootstrap(config: AppConfig) -> Result<Self> {
        let path = config.storage.path.clone();
        let tokens = KvTokenStore::open(config.kv_config())
            .with_context(|| format!("Failed to open session store at {}", path.display()))?;
        Self::with_token_store(config, Arc::new(tokens)).await
    }

    /// Start the app over an existing token store
    pub async fn with_token_store(config: AppConfig, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        let client = ApiClient::new(config.client_config(), Arc::clone(&tokens))
            .context("Failed to build API client")?;
        Self::with_gateway(config, tokens, Arc::new(client)).await
    }

    /// Start the app over an existing token store and gateway
    pub async fn with_gateway(
        config: AppConfig,
        tokens: Arc<dyn TokenStore>,
        gateway: Arc<dyn AuthGateway>,
    ) -> Result<Self> {
        let session = Arc::new(SessionContext::new(tokens));
        let root = session.init().await;
        let navigator = Arc::new(AppNavigator::new(root));

        tracing::info!(base_url = %config.api.base_url, %root, "app started");
        Ok(Self { config, session, gateway, navigator })
    }

    /// Configuration the app was started with
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Shared session state
    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    /// Navigation handle
    pub fn navigator(&self) -> &Arc<AppNavigator> {
        &self.navigator
    }

    /// Root currently shown
    pub fn root(&self) -> NavigationRoot {
        self.navigator.root()
    }

    /// Controller for a newly mounted login or register screen
    pub fn auth_screen(&self) -> AuthController {
        AuthController::new(
            Arc::clone(&self.session),
            Arc::clone(&self.gateway),
            self.navigator.clone(),
        )
    }

    /// Controller for a newly mounted profile screen
    pub fn profile_screen(&self) -> ProfileController {
        ProfileController::new(
            Arc::clone(&self.session),
            Arc::clone(&self.gateway),
            self.navigator.clone(),
        )
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("root", &self.root())
            .finish_non_exhaustive()
    }
}
