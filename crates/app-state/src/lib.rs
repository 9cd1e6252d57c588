//! Session state for Primatech Books
//!
//! This crate holds the process-wide session context, per-screen flow state
//! and the navigation root contract shared by controllers and the navigator.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod flow;
pub mod root;
pub mod session;

pub use flow::{Dialog, FlowState, MountGuard};
pub use root::{AuthScreen, NavigationRoot, Navigator};
pub use session::{SessionContext, SessionError};
