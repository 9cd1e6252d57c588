//! Navigation graph for Primatech Books
//!
//! This module provides the screen graph gated by session presence:
//! - An auth stack (Login, Register) shown while signed out
//! - Three main tabs (Home, Books, Profile), each with its own stack
//! - Root resets that discard all history of the previous root
//! - Tab metadata (labels, icons, badges)

use app_state::{AuthScreen, NavigationRoot, Navigator};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use thiserror::Error;

/// Navigation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// The route lives under a different root than the one shown
    #[error("Route {route} is not reachable from {root}")]
    RouteNotInRoot {
        /// Requested route
        route: Route,
        /// Root currently shown
        root: NavigationRoot,
    },

    /// Tabs only exist under the main root
    #[error("No tabs are shown under {0}")]
    NoTabs(NavigationRoot),
}

/// Result type for navigation operations
pub type Result<T> = std::result::Result<T, NavigationError>;

// =============================================================================
// Route Definitions
// =============================================================================

/// All screens in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    // Auth stack
    /// Login form
    Login,
    /// Registration form
    Register,

    // Main tabs
    /// Home tab
    Home,
    /// Book catalog tab
    Books,
    /// Profile tab
    Profile,
    /// Profile edit form, pushed on the profile tab
    EditProfile,
}

impl Route {
    /// Screen identifier
    pub fn name(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Register => "Register",
            Route::Home => "Home",
            Route::Books => "Books",
            Route::Profile => "Profile",
            Route::EditProfile => "EditProfile",
        }
    }

    /// Root this screen lives under
    pub fn root(&self) -> NavigationRoot {
        match self {
            Route::Login | Route::Register => NavigationRoot::AuthStack,
            Route::Home | Route::Books | Route::Profile | Route::EditProfile => {
                NavigationRoot::MainTabs
            }
        }
    }

    /// Tab this screen belongs to, for main-root screens
    pub fn tab(&self) -> Option<MainTab> {
        match self {
            Route::Home => Some(MainTab::Home),
            Route::Books => Some(MainTab::Books),
            Route::Profile | Route::EditProfile => Some(MainTab::Profile),
            Route::Login | Route::Register => None,
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl From<AuthScreen> for Route {
    fn from(screen: AuthScreen) -> Self {
        match screen {
            AuthScreen::Login => Route::Login,
            AuthScreen::Register => Route::Register,
        }
    }
}

// =============================================================================
// Main Tabs
// =============================================================================

/// Icon used for any screen missing from the icon table
pub const DEFAULT_TAB_ICON: &str = "help-circle-outline";

/// Screen identifier to tab icon identifier
const TAB_ICONS: &[(&str, &str)] = &[
    ("Home", "home-outline"),
    ("Books", "book-outline"),
    ("Profile", "person-outline"),
];

/// Look up the tab icon for a screen identifier
pub fn tab_icon(screen: &str) -> &'static str {
    TAB_ICONS
        .iter()
        .find(|(name, _)| *name == screen)
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_TAB_ICON)
}

/// Tabs of the main root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MainTab {
    /// Home tab
    #[default]
    Home,
    /// Book catalog tab
    Books,
    /// Profile tab
    Profile,
}

/// Presentation options of a tab
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabOptions {
    /// Tab bar label
    pub label: &'static str,
    /// Icon identifier
    pub icon: &'static str,
    /// Badge count, if any
    pub badge: Option<u32>,
    /// Whether the screen header is shown
    pub header_shown: bool,
}

impl MainTab {
    /// Get the root route for this tab
    pub fn root_route(&self) -> Route {
        match self {
            MainTab::Home => Route::Home,
            MainTab::Books => Route::Books,
            MainTab::Profile => Route::Profile,
        }
    }

    /// Get icon name for this tab
    pub fn icon(&self) -> &'static str {
        tab_icon(self.root_route().name())
    }

    /// Get label for this tab
    pub fn label(&self) -> &'static str {
        self.root_route().name()
    }

    /// Get the badge count for this tab
    pub fn badge(&self) -> Option<u32> {
        match self {
            MainTab::Home => Some(5),
            MainTab::Books | MainTab::Profile => None,
        }
    }

    /// All presentation options for this tab
    pub fn options(&self) -> TabOptions {
        TabOptions {
            label: self.label(),
            icon: self.icon(),
            badge: self.badge(),
            header_shown: false,
        }
    }

    /// Get all tabs in order
    pub fn all() -> [MainTab; 3] {
        [MainTab::Home, MainTab::Books, MainTab::Profile]
    }
}

// =============================================================================
// Navigation Stack
// =============================================================================

/// A navigation stack entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackEntry {
    /// The route
    pub route: Route,
    /// Unique key for this entry
    pub key: String,
}

impl StackEntry {
    /// Create a new stack entry
    pub fn new(route: Route) -> Self {
        Self { route, key: uuid::Uuid::new_v4().to_string() }
    }
}

/// Stack of screens with a fixed bottom entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationStack {
    /// Bottom entry, never popped
    root: StackEntry,
    /// Entries above the root (bottom to top)
    above: Vec<StackEntry>,
}

impl NavigationStack {
    /// Create a new navigation stack with a root route
    pub fn new(root: Route) -> Self {
        Self { root: StackEntry::new(root), above: Vec::new() }
    }

    /// Push a route onto the stack
    pub fn push(&mut self, route: Route) {
        self.above.push(StackEntry::new(route));
    }

    /// Pop the top route (returns true if popped, false if at root)
    pub fn pop(&mut self) -> bool {
        self.above.pop().is_some()
    }

    /// Pop to root
    pub fn pop_to_root(&mut self) {
        self.above.clear();
    }

    /// Pop back to the topmost entry showing `route`
    ///
    /// Returns false, leaving the stack untouched, if `route` is not on it.
    pub fn pop_to(&mut self, route: Route) -> bool {
        match self.above.iter().rposition(|e| e.route == route) {
            Some(index) => {
                self.above.truncate(index + 1);
                true
            }
            None if self.root.route == route => {
                self.above.clear();
                true
            }
            None => false,
        }
    }

    /// Replace the top route
    pub fn replace(&mut self, route: Route) {
        match self.above.last_mut() {
            Some(last) => *last = StackEntry::new(route),
            None => self.root = StackEntry::new(route),
        }
    }

    /// Get the current (top) route
    pub fn current(&self) -> Route {
        self.current_entry().route
    }

    /// Get the current stack entry
    pub fn current_entry(&self) -> &StackEntry {
        self.above.last().unwrap_or(&self.root)
    }

    /// Check if we can go back
    pub fn can_go_back(&self) -> bool {
        !self.above.is_empty()
    }

    /// Get stack depth
    pub fn depth(&self) -> usize {
        self.above.len() + 1
    }

    /// Iterate entries bottom to top
    pub fn entries(&self) -> impl Iterator<Item = &StackEntry> {
        std::iter::once(&self.root).chain(self.above.iter())
    }

    /// Reset to a new root
    pub fn reset(&mut self, route: Route) {
        *self = Self::new(route);
    }
}

// =============================================================================
// Navigation State
// =============================================================================

/// Complete navigation state under one root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "root")]
pub enum NavigationState {
    /// Signed out
    AuthStack {
        /// Login and register screens
        stack: NavigationStack,
    },
    /// Signed in
    MainTabs {
        /// Current active tab
        active_tab: MainTab,
        /// Stacks for each tab
        tab_stacks: HashMap<MainTab, NavigationStack>,
    },
}

impl NavigationState {
    /// Fresh state for `root` with no history
    pub fn new(root: NavigationRoot) -> Self {
        match root {
            NavigationRoot::AuthStack => {
                NavigationState::AuthStack { stack: NavigationStack::new(Route::Login) }
            }
            NavigationRoot::MainTabs => NavigationState::MainTabs {
                active_tab: MainTab::default(),
                tab_stacks: MainTab::all()
                    .into_iter()
                    .map(|tab| (tab, NavigationStack::new(tab.root_route())))
                    .collect(),
            },
        }
    }

    /// Root currently shown
    pub fn root(&self) -> NavigationRoot {
        match self {
            NavigationState::AuthStack { .. } => NavigationRoot::AuthStack,
            NavigationState::MainTabs { .. } => NavigationRoot::MainTabs,
        }
    }

    /// Active tab, when the main root is shown
    pub fn active_tab(&self) -> Option<MainTab> {
        match self {
            NavigationState::AuthStack { .. } => None,
            NavigationState::MainTabs { active_tab, .. } => Some(*active_tab),
        }
    }

    /// Stack currently on screen
    pub fn current_stack(&self) -> Option<&NavigationStack> {
        match self {
            NavigationState::AuthStack { stack } => Some(stack),
            NavigationState::MainTabs { active_tab, tab_stacks } => tab_stacks.get(active_tab),
        }
    }

    /// Stack of a given tab
    pub fn tab_stack(&self, tab: MainTab) -> Option<&NavigationStack> {
        match self {
            NavigationState::AuthStack { .. } => None,
            NavigationState::MainTabs { tab_stacks, .. } => tab_stacks.get(&tab),
        }
    }

    /// Get the current route
    pub fn current_route(&self) -> Route {
        match self.current_stack() {
            Some(stack) => stack.current(),
            None => match self {
                NavigationState::AuthStack { .. } => Route::Login,
                NavigationState::MainTabs { active_tab, .. } => active_tab.root_route(),
            },
        }
    }

    /// Navigate to a route under the current root
    ///
    /// A route already on the stack is popped back to; tab roots switch
    /// tabs; anything else is pushed.
    pub fn navigate(&mut self, route: Route) -> Result<()> {
        let root = self.root();
        if route.root() != root {
            return Err(NavigationError::RouteNotInRoot { route, root });
        }

        match self {
            NavigationState::AuthStack { stack } => {
                if !stack.pop_to(route) {
                    stack.push(route);
                }
            }
            NavigationState::MainTabs { active_tab, tab_stacks } => {
                let tab = route.tab().unwrap_or(*active_tab);
                *active_tab = tab;
                let stack =
                    tab_stacks.entry(tab).or_insert_with(|| NavigationStack::new(tab.root_route()));
                if route != tab.root_route() && !stack.pop_to(route) {
                    stack.push(route);
                }
            }
        }
        Ok(())
    }

    /// Go back within the current stack; never leaves the current root
    pub fn go_back(&mut self) -> bool {
        match self {
            NavigationState::AuthStack { stack } => stack.pop(),
            NavigationState::MainTabs { active_tab, tab_stacks } => {
                tab_stacks.get_mut(active_tab).map(NavigationStack::pop).unwrap_or(false)
            }
        }
    }

    /// Switch to a tab, keeping every tab's position
    pub fn switch_tab(&mut self, tab: MainTab) -> Result<()> {
        match self {
            NavigationState::AuthStack { .. } => Err(NavigationError::NoTabs(self.root())),
            NavigationState::MainTabs { active_tab, .. } => {
                *active_tab = tab;
                Ok(())
            }
        }
    }

    /// Check if we can go back
    pub fn can_go_back(&self) -> bool {
        self.current_stack().map(NavigationStack::can_go_back).unwrap_or(false)
    }

    /// Replace everything with a fresh state for `root`
    pub fn reset_root(&mut self, root: NavigationRoot) {
        *self = Self::new(root);
    }
}

// =============================================================================
// Navigator
// =============================================================================

/// Shared handle to the navigation state
///
/// Controllers reach it through the [`Navigator`] trait. The most recent
/// [`RESET_HISTORY`] root resets are kept, oldest first.
#[derive(Debug)]
pub struct AppNavigator {
    state: RwLock<NavigationState>,
    resets: Mutex<VecDeque<NavigationRoot>>,
}

/// Number of root resets an [`AppNavigator`] remembers
pub const RESET_HISTORY: usize = 16;

impl AppNavigator {
    /// Create a navigator showing `root`
    pub fn new(root: NavigationRoot) -> Self {
        Self { state: RwLock::new(NavigationState::new(root)), resets: Mutex::new(VecDeque::with_capacity(RESET_HISTORY)) }
    }

    /// Root currently shown
    pub fn root(&self) -> NavigationRoot {
        self.state.read().root()
    }

    /// Route currently shown
    pub fn current_route(&self) -> Route {
        self.state.read().current_route()
    }

    /// Copy of the full navigation state
    pub fn snapshot(&self) -> NavigationState {
        self.state.read().clone()
    }

    /// Most recent root resets, oldest first
    pub fn resets(&self) -> Vec<NavigationRoot> {
        self.resets.lock().iter().copied().collect()
    }

    /// Navigate to a route under the current root
    pub fn navigate(&self, route: Route) -> Result<()> {
        self.state.write().navigate(route)
    }

    /// Go back within the current stack
    pub fn go_back(&self) -> bool {
        self.state.write().go_back()
    }

    /// Switch to a tab
    pub fn switch_tab(&self, tab: MainTab) -> Result<()> {
        self.state.write().switch_tab(tab)
    }
}

impl Navigator for AppNavigator {
    fn reset_root(&self, root: NavigationRoot) {
        self.state.write().reset_root(root);
        let mut resets = self.resets.lock();
        if resets.len() == RESET_HISTORY {
            resets.pop_front();
        }
        resets.push_back(root);
        drop(resets);
        tracing::info!(%root, "navigation reset");
    }

    fn navigate_auth(&self, screen: AuthScreen) {
        if let Err(e) = self.navigate(Route::from(screen)) {
            tracing::debug!(error = %e, "auth navigation ignored");
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
