//! Profile screen
//!
//! Loads the signed-in user's profile, drives the settings menu and the
//! edit form, and logs out through [`AuthController`]. Profile edits stay on
//! the device; nothing is written back to the backend.

use api_client::{AuthGateway, UserProfile};
use app_state::{MountGuard, Navigator, SessionContext};
use parking_lot::Mutex;
use std::sync::Arc;

use crate::auth::{AuthController, Result};

/// Editable copy of the profile fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDraft {
    /// Username being edited
    pub username: String,
    /// Email being edited
    pub email: String,
}

impl From<&UserProfile> for ProfileDraft {
    fn from(user: &UserProfile) -> Self {
        Self { username: user.username.clone(), email: user.email.clone() }
    }
}

/// Snapshot of the profile screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileState {
    /// Loaded user; `None` renders "no user data"
    pub user: Option<UserProfile>,
    /// Load in progress
    pub loading: bool,
    /// Settings menu open
    pub menu_open: bool,
    /// Edit form open
    pub editing: bool,
    /// Edit form contents
    pub draft: ProfileDraft,
}

impl Default for ProfileState {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
            menu_open: false,
            editing: false,
            draft: ProfileDraft::default(),
        }
    }
}

/// Controller for the profile screen
pub struct ProfileController {
    session: Arc<SessionContext>,
    gateway: Arc<dyn AuthGateway>,
    auth: AuthController,
    state: Mutex<ProfileState>,
    guard: MountGuard,
}

impl ProfileController {
    /// Create a controller for a freshly mounted profile screen
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
        let auth = AuthController::with_guard(
            Arc::clone(&session),
            Arc::clone(&gateway),
            navigator,
            guard.clone(),
        );
        Self { session, gateway, auth, state: Mutex::new(ProfileState::default()), guard }
    }

    /// Current screen state
    pub fn state(&self) -> ProfileState {
        self.state.lock().clone()
    }

    /// Mark the screen torn down
    pub fn unmount(&self) {
        self.guard.unmount();
    }

    /// Load the profile of the signed-in user
    ///
    /// Without a stored token no request is made. A failed fetch is logged
    /// and leaves the screen without user data.
    pub async fn load(&self) -> Result<Option<UserProfile>> {
        self.state.lock().loading = true;

        let token = self.session.token().await;
        if !self.guard.is_mounted() {
            return Ok(None);
        }
        match token {
            Ok(Some(_)) => {}
            Ok(None) => {
                self.state.lock().loading = false;
                return Ok(None);
            }
            Err(e) => {
                self.state.lock().loading = false;
                return Err(e.into());
            }
        }

        let result = self.gateway.fetch_profile().await;
        if !self.guard.is_mounted() {
            tracing::debug!("profile response discarded, screen unmounted");
            return Ok(None);
        }

        let mut state = self.state.lock();
        state.loading = false;
        match result {
            Ok(user) => {
                state.draft = ProfileDraft::from(&user);
                state.user = Some(user.clone());
                drop(state);
                self.session.set_current_user(Some(user.clone()));
                tracing::debug!(username = %user.username, "profile loaded");
                Ok(Some(user))
            }
            Err(e) => {
                tracing::error!(error = %e, "error fetching user profile");
                state.user = None;
                Err(e.into())
            }
        }
    }

    /// Open or close the settings menu
    pub fn toggle_menu(&self) {
        let mut state = self.state.lock();
        state.menu_open = !state.menu_open;
    }

    /// Open the edit form seeded with the current user
    pub fn begin_edit(&self) {
        let mut state = self.state.lock();
        state.menu_open = false;
        state.editing = true;
        if let Some(user) = &state.user {
            state.draft = ProfileDraft::from(user);
        }
    }

    /// Change the draft username
    pub fn set_draft_username(&self, username: impl Into<String>) {
        self.state.lock().draft.username = username.into();
    }

    /// Change the draft email
    pub fn set_draft_email(&self, email: impl Into<String>) {
        self.state.lock().draft.email = email.into();
    }

    /// Apply the draft to the displayed user and close the form
    ///
    /// Without a loaded user the form just closes.
    pub fn save_edit(&self) {
        let mut state = self.state.lock();
        if !state.editing {
            return;
        }
        state.editing = false;
        let draft = state.draft.clone();
        if let Some(user) = state.user.as_mut() {
            user.username = draft.username;
            user.email = draft.email;
        }
    }

    /// Close the form and throw the draft away
    pub fn cancel_edit(&self) {
        let mut state = self.state.lock();
        state.editing = false;
        state.draft = state.user.as_ref().map(ProfileDraft::from).unwrap_or_default();
    }

    /// Log out from the settings menu
    pub async fn logout(&self) -> Result<()> {
        self.state.lock().menu_open = false;
        self.auth.logout().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthError;
    use crate::test_support::{Event, EventLog, MockGateway, RecordingNavigator, RecordingTokens};
    use api_client::{RequestError, UserId};
    use app_state::NavigationRoot;

    fn alice() -> UserProfile {
        UserProfile {
            id: Some(UserId::Number(7)),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
        }
    }

    fn profile_screen(
        gateway: MockGateway,
        tokens: RecordingTokens,
        log: &EventLog,
    ) -> (ProfileController, Arc<SessionContext>) {
        let session = Arc::new(SessionContext::new(Arc::new(tokens)));
        let controller = ProfileController::new(
            Arc::clone(&session),
            Arc::new(gateway),
            Arc::new(RecordingNavigator::new(log)),
        );
        (controller, session)
    }

    #[tokio::test]
    async fn test_load_with_token() {
        let log = EventLog::default();
        let mut gateway = MockGateway::new();
        gateway.expect_fetch_profile().times(1).returning(|| Ok(alice()));
        let (controller, session) =
            profile_screen(gateway, RecordingTokens::with_token(&log, "abc123"), &log);

        assert!(controller.state().loading);
        let user = controller.load().await.unwrap();

        assert_eq!(user, Some(alice()));
        let state = controller.state();
        assert!(!state.loading);
        assert_eq!(state.user, Some(alice()));
        assert_eq!(state.draft.username, "alice");
        assert_eq!(session.current_user(), Some(alice()));
    }

    #[tokio::test]
    async fn test_load_without_token_makes_no_request() {
        let log = EventLog::default();
        let mut gateway = MockGateway::new();
        gateway.expect_fetch_profile().never();
        let (controller, _session) = profile_screen(gateway, RecordingTokens::new(&log), &log);

        assert_eq!(controller.load().await.unwrap(), None);
        assert!(!controller.state().loading);
        assert!(controller.state().user.is_none());
    }

    #[tokio::test]
    async fn test_load_failure_shows_no_user() {
        let log = EventLog::default();
        let mut gateway = MockGateway::new();
        gateway
            .expect_fetch_profile()
            .times(1)
            .returning(|| Err(RequestError::new(401, "Token expired")));
        let (controller, session) =
            profile_screen(gateway, RecordingTokens::with_token(&log, "stale"), &log);

        let result = controller.load().await;

        assert!(matches!(result, Err(AuthError::Request(_))));
        assert!(!controller.state().loading);
        assert!(controller.state().user.is_none());
        assert!(session.current_user().is_none());
    }

    #[tokio::test]
    async fn test_load_after_unmount_is_discarded() {
        let log = EventLog::default();
        let guard = MountGuard::new();
        let in_flight = guard.clone();
        let mut gateway = MockGateway::new();
        gateway.expect_fetch_profile().times(1).returning(move || {
            in_flight.unmount();
            Ok(alice())
        });

        let session = Arc::new(SessionContext::new(Arc::new(RecordingTokens::with_token(
            &log, "abc123",
        ))));
        let controller = ProfileController::with_guard(
            Arc::clone(&session),
            Arc::new(gateway),
            Arc::new(RecordingNavigator::new(&log)),
            guard,
        );

        assert_eq!(controller.load().await.unwrap(), None);
        assert!(controller.state().user.is_none());
        assert!(session.current_user().is_none());
    }

    #[tokio::test]
    async fn test_edit_is_local() {
        let log = EventLog::default();
        let mut gateway = MockGateway::new();
        gateway.expect_fetch_profile().times(1).returning(|| Ok(alice()));
        let (controller, session) =
            profile_screen(gateway, RecordingTokens::with_token(&log, "abc123"), &log);
        controller.load().await.unwrap();

        controller.toggle_menu();
        assert!(controller.state().menu_open);

        controller.begin_edit();
        assert!(!controller.state().menu_open);
        assert!(controller.state().editing);

        controller.set_draft_username("alice2");
        controller.set_draft_email("alice2@example.com");
        controller.save_edit();

        let state = controller.state();
        assert!(!state.editing);
        let user = state.user.unwrap();
        assert_eq!(user.username, "alice2");
        assert_eq!(user.email, "alice2@example.com");
        assert_eq!(user.id, Some(UserId::Number(7)));

        // The session keeps what the backend returned
        assert_eq!(session.current_user(), Some(alice()));
    }

    #[tokio::test]
    async fn test_save_edit_without_user_only_closes_form() {
        let log = EventLog::default();
        let mut gateway = MockGateway::new();
        gateway.expect_fetch_profile().never();
        let (controller, session) = profile_screen(gateway, RecordingTokens::new(&log), &log);
        controller.load().await.unwrap();

        controller.begin_edit();
        controller.set_draft_username("mallory");
        controller.set_draft_email("m@x");
        controller.save_edit();

        let state = controller.state();
        assert!(!state.editing);
        assert!(state.user.is_none());
        assert!(session.current_user().is_none());
    }

    #[tokio::test]
    async fn test_cancel_edit_discards_draft() {
        let log = EventLog::default();
        let mut gateway = MockGateway::new();
        gateway.expect_fetch_profile().times(1).returning(|| Ok(alice()));
        let (controller, _session) =
            profile_screen(gateway, RecordingTokens::with_token(&log, "abc123"), &log);
        controller.load().await.unwrap();

        controller.begin_edit();
        controller.set_draft_username("mallory");
        controller.cancel_edit();

        let state = controller.state();
        assert_eq!(state.user, Some(alice()));
        assert_eq!(state.draft.username, "alice");

        // Saving with the form closed changes nothing
        controller.save_edit();
        assert_eq!(controller.state().user, Some(alice()));
    }

    #[tokio::test]
    async fn test_logout_from_menu() {
        let log = EventLog::default();
        let mut gateway = MockGateway::new();
        gateway.expect_fetch_profile().times(1).returning(|| Ok(alice()));
        let (controller, session) =
            profile_screen(gateway, RecordingTokens::with_token(&log, "abc123"), &log);
        controller.load().await.unwrap();

        controller.toggle_menu();
        controller.logout().await.unwrap();

        assert!(!controller.state().menu_open);
        assert!(session.token().await.unwrap().is_none());
        assert!(session.current_user().is_none());
        assert_eq!(log.events(), vec![Event::Cleared, Event::Reset(NavigationRoot::AuthStack)]);
    }
}
