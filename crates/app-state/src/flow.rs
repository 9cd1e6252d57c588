//! Per-screen flow state
//!
//! Each screen runs its submit flows through a small state machine and
//! reports the dialog it wants shown. A [`MountGuard`] tells an in-flight
//! flow whether its screen is still alive.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Dialog title for failures
pub const ERROR_TITLE: &str = "Error";
/// Dialog title for confirmations
pub const SUCCESS_TITLE: &str = "Success";

/// State of a submit flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowState {
    /// Nothing in flight
    #[default]
    Idle,
    /// Request in flight; submit is disabled
    Submitting,
    /// Flow completed successfully
    Succeeded,
    /// Flow failed; a dialog explains why
    Failed,
}

impl FlowState {
    /// Check whether a request is in flight
    pub fn is_submitting(&self) -> bool {
        matches!(self, FlowState::Submitting)
    }
}

/// Modal dialog the screen should display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    /// Dialog title
    pub title: String,
    /// Dialog body
    pub message: String,
}

impl Dialog {
    /// Error dialog
    pub fn error(message: impl Into<String>) -> Self {
        Self { title: ERROR_TITLE.to_string(), message: message.into() }
    }

    /// Success dialog
    pub fn success(message: impl Into<String>) -> Self {
        Self { title: SUCCESS_TITLE.to_string(), message: message.into() }
    }

    /// Check whether this is an error dialog
    pub fn is_error(&self) -> bool {
        self.title == ERROR_TITLE
    }
}

/// Liveness flag shared between a screen and its in-flight flows
///
/// Clones observe the same flag. Once unmounted a guard never mounts again.
#[derive(Debug, Clone)]
pub struct MountGuard {
    mounted: Arc<AtomicBool>,
}

impl MountGuard {
    /// Create a guard for a freshly mounted screen
    pub fn new() -> Self {
        Self { mounted: Arc::new(AtomicBool::new(true)) }
    }

    /// Check whether the screen is still mounted
    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    /// Mark the screen torn down
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
    }
}

impl Default for MountGuard {
    fn default() -> Self {
        Self::new()
    }
}
