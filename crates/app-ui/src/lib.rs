//! User interface layer for Primatech Books
//!
//! This crate provides the screen graph: the auth stack, the main tabs and
//! the navigator handle controllers use to move between them.
//!
//! # Example
//!
//! ```rust
//! use app_ui::{AppNavigator, MainTab, Route};
//! use app_state::{NavigationRoot, Navigator};
//!
//! let navigator = AppNavigator::new(NavigationRoot::AuthStack);
//! assert_eq!(navigator.current_route(), Route::Login);
//!
//! navigator.reset_root(NavigationRoot::MainTabs);
//! assert_eq!(navigator.current_route(), Route::Home);
//! assert_eq!(MainTab::Home.icon(), "home-outline");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod navigation;

pub use navigation::{
    tab_icon, AppNavigator, MainTab, NavigationError, NavigationStack, NavigationState, Route,
    StackEntry, TabOptions, DEFAULT_TAB_ICON, RESET_HISTORY,
};
