//! Authentication flows for the login, register and profile screens
//!
//! [`AuthController`] drives one screen's submit flow through
//! `Idle -> Submitting -> Succeeded | Failed` and turns every outcome into
//! exactly one dialog. Tokens are persisted before navigating to the main
//! tabs, and cleared before navigating back to the auth stack.
//!
//! # Example
//!
//! ```rust,no_run
//! use app_core::auth::AuthController;
//! use app_state::{Navigator, SessionContext};
//! use api_client::AuthGateway;
//! use std::sync::Arc;
//!
//! async fn submit(
//!     session: Arc<SessionContext>,
//!     gateway: Arc<dyn AuthGateway>,
//!     navigator: Arc<dyn Navigator>,
//! ) {
//!     let controller = AuthController::new(session, gateway, navigator);
//!     if controller.login("alice", "secret").await.is_err() {
//!         if let Some(dialog) = controller.dialog() {
//!             println!("{}: {}", dialog.title, dialog.message);
//!         }
//!     }
//! }
//! ```

use api_client::{AuthGateway, RequestError};
use app_state::{
    AuthScreen, Dialog, FlowState, MountGuard, NavigationRoot, Navigator, SessionContext,
    SessionError,
};
use parking_lot::Mutex;
use std::sync::Arc;
use storage::StorageError;
use thiserror::Error;

/// Shown when a required field is empty
pub const FILL_ALL_FIELDS: &str = "Please fill in all fields";
/// Fallback when a failed login carries no usable message
pub const LOGIN_FALLBACK: &str = "Something went wrong";
/// Fallback when a failed registration carries no usable message
pub const REGISTER_FALLBACK: &str = "Registration failed. Please try again.";
/// Shown after a registration the backend only acknowledged
pub const REGISTER_SUCCESS: &str = "Registration successful!";

/// Authentication flow errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required field was empty; nothing was sent
    #[error("{0}")]
    Validation(String),

    /// The backend rejected the request or could not be reached
    #[error(transparent)]
    Request(#[from] RequestError),

    /// The token store failed
    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),

    /// A submit is already in flight
    #[error("A request is already in progress")]
    Busy,
}

impl From<SessionError> for AuthError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Storage(e) => AuthError::Storage(e),
        }
    }
}

/// Result type for authentication flows
pub type Result<T> = std::result::Result<T, AuthError>;

/// How a successful flow ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The navigation root was reset
    Navigated(NavigationRoot),
    /// A success dialog is waiting for [`AuthController::acknowledge`]
    AwaitingAcknowledge,
    /// The screen was torn down before the response arrived
    Discarded,
}

/// Build the dialog message for a rejected request
///
/// A password error wins over a username error; either one is appended to
/// the top-level message (or `fallback` when the backend sent none).
pub fn failure_message(error: &RequestError, fallback: &str) -> String {
    let base = error.message().unwrap_or(fallback);
    match error.field_error("password").or_else(|| error.field_error("username")) {
        Some(field) => format!("{}: {}", base, field),
        None => base.to_string(),
    }
}

#[derive(Debug, Default)]
struct ScreenState {
    flow: FlowState,
    dialog: Option<Dialog>,
    redirect_to_login: bool,
}

/// Submit-flow controller for one auth screen
pub struct AuthController {
    session: Arc<SessionContext>,
    gateway: Arc<dyn AuthGateway>,
    navigator: Arc<dyn Navigator>,
    state: Mutex<ScreenState>,
    guard: MountGuard,
}

impl AuthController {
    /// Create a controller for a freshly mounted screen
    pub fn new(
        session: Arc<SessionContext>,
        gateway: Arc<dyn AuthGateway>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self::with_guard(session, gateway, navigator, MountGuard::new())
    }

    /// Create a controller sharing an existing mount guard
    pub fn with_guard(
        session: Arc<SessionContext>,
        gateway: Arc<dyn AuthGateway>,
        navigator: Arc<dyn Navigator>,
        guard: MountGuard,
    ) -> Self {
        Self { session, gateway, navigator, state: Mutex::new(ScreenState::default()), guard }
    }

    /// Current flow state
    pub fn flow_state(&self) -> FlowState {
        self.state.lock().flow
    }

    /// Dialog the screen should show, if any
    pub fn dialog(&self) -> Option<Dialog> {
        self.state.lock().dialog.clone()
    }

    /// Whether the submit control is enabled
    pub fn is_submit_enabled(&self) -> bool {
        !self.state.lock().flow.is_submitting()
    }

    /// Liveness guard of the screen
    pub fn mount_guard(&self) -> MountGuard {
        self.guard.clone()
    }

    /// Mark the screen torn down; in-flight responses will be dropped
    pub fn unmount(&self) {
        self.guard.unmount();
    }

    /// Log in with username and password
    ///
    /// On success the token is persisted, then the root is reset to the
    /// main tabs. On failure the dialog carries the derived message.
    pub async fn login(&self, username: &str, password: &str) -> Result<Completion> {
        if !self.guard.is_mounted() {
            tracing::debug!("login ignored, screen unmounted");
            return Ok(Completion::Discarded);
        }
        self.begin(&[username, password])?;
        tracing::info!(%username, "login submitted");

        let result = self.gateway.login(username, password).await;
        if !self.guard.is_mounted() {
            tracing::debug!("login response discarded, screen unmounted");
            return Ok(Completion::Discarded);
        }

        match result {
            Ok(response) => self.sign_in(&response.token, LOGIN_FALLBACK).await,
            Err(e) => Err(self.reject(e, LOGIN_FALLBACK)),
        }
    }

    /// Create an account
    ///
    /// A response carrying a token signs the user straight in. A plain
    /// acknowledgement shows a success dialog; acknowledging it returns to
    /// the login screen.
    pub async fn register(&self, username: &str, password: &str, email: &str) -> Result<Completion> {
        if !self.guard.is_mounted() {
            tracing::debug!("register ignored, screen unmounted");
            return Ok(Completion::Discarded);
        }
        self.begin(&[username, password, email])?;
        tracing::info!(%username, "registration submitted");

        let result = self.gateway.register(username, password, email).await;
        if !self.guard.is_mounted() {
            tracing::debug!("registration response discarded, screen unmounted");
            return Ok(Completion::Discarded);
        }

        match result {
            Ok(ack) => match ack.token {
                Some(token) => self.sign_in(&token, REGISTER_FALLBACK).await,
                None => {
                    let mut state = self.state.lock();
                    state.flow = FlowState::Succeeded;
                    state.dialog = Some(Dialog::success(REGISTER_SUCCESS));
                    state.redirect_to_login = true;
                    tracing::info!("registration acknowledged");
                    Ok(Completion::AwaitingAcknowledge)
                }
            },
            Err(e) => Err(self.reject(e, REGISTER_FALLBACK)),
        }
    }

    /// Dismiss the current dialog
    ///
    /// Dismissing the registration success dialog navigates to the login
    /// screen. Returns the dismissed dialog.
    pub fn acknowledge(&self) -> Option<Dialog> {
        let (dialog, redirect) = {
            let mut state = self.state.lock();
            if state.flow.is_submitting() {
                return None;
            }
            state.flow = FlowState::Idle;
            (state.dialog.take(), std::mem::take(&mut state.redirect_to_login))
        };

        if redirect && self.guard.is_mounted() {
            self.navigator.navigate_auth(AuthScreen::Login);
        }
        dialog
    }

    /// Log out
    ///
    /// Clears the stored token and cached user, then resets the root to the
    /// auth stack. Nothing navigates when clearing fails.
    pub async fn logout(&self) -> Result<()> {
        if let Err(e) = self.session.teardown().await {
            tracing::error!(error = %e, "logout failed");
            return Err(e.into());
        }

        self.navigator.reset_root(NavigationRoot::AuthStack);
        tracing::info!("logged out");
        Ok(())
    }

    /// Check preconditions and enter `Submitting`
    fn begin(&self, fields: &[&str]) -> Result<()> {
        let mut state = self.state.lock();
        if state.flow.is_submitting() {
            return Err(AuthError::Busy);
        }

        if fields.iter().any(|f| f.is_empty()) {
            state.flow = FlowState::Idle;
            state.dialog = Some(Dialog::error(FILL_ALL_FIELDS));
            return Err(AuthError::Validation(FILL_ALL_FIELDS.to_string()));
        }

        state.flow = FlowState::Submitting;
        state.dialog = None;
        state.redirect_to_login = false;
        Ok(())
    }

    /// Persist the token, then reset to the main tabs
    async fn sign_in(&self, token: &str, fallback: &str) -> Result<Completion> {
        if let Err(e) = self.session.establish(token).await {
            tracing::error!(error = %e, "could not persist session token");
            self.fail(fallback.to_string());
            return Err(e.into());
        }

        self.navigator.reset_root(NavigationRoot::MainTabs);
        self.state.lock().flow = FlowState::Succeeded;
        tracing::info!("signed in");
        Ok(Completion::Navigated(NavigationRoot::MainTabs))
    }

    fn reject(&self, error: RequestError, fallback: &str) -> AuthError {
        let message = failure_message(&error, fallback);
        tracing::warn!(status = error.status(), %message, "auth request failed");
        self.fail(message);
        AuthError::Request(error)
    }

    fn fail(&self, message: String) {
        let mut state = self.state.lock();
        state.flow = FlowState::Failed;
        state.dialog = Some(Dialog::error(message));
    }
}

impl std::fmt::Debug for AuthController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthController")
            .field("state", &*self.state.lock())
            .field("mounted", &self.guard.is_mounted())
            .finish_non_exhaustive()
    }
}
