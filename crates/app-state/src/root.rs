//! Navigation root selection
//!
//! The app shows exactly one of two navigation roots. Controllers never
//! manipulate screen stacks directly; they ask a [`Navigator`] to reset the
//! root or to move within the auth stack.

use std::fmt;

/// Top-level navigation root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationRoot {
    /// Unauthenticated screens (Login, Register)
    AuthStack,
    /// Authenticated tabbed screens (Home, Books, Profile)
    MainTabs,
}

impl NavigationRoot {
    /// Select the root implied by token presence
    pub fn for_session(has_token: bool) -> Self {
        if has_token {
            NavigationRoot::MainTabs
        } else {
            NavigationRoot::AuthStack
        }
    }

    /// Screen identifier of the root
    pub fn name(&self) -> &'static str {
        match self {
            NavigationRoot::AuthStack => "AuthStack",
            NavigationRoot::MainTabs => "MainTabs",
        }
    }
}

impl fmt::Display for NavigationRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Screens inside the auth stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthScreen {
    /// Login form
    Login,
    /// Registration form
    Register,
}

impl AuthScreen {
    /// Screen identifier
    pub fn name(&self) -> &'static str {
        match self {
            AuthScreen::Login => "Login",
            AuthScreen::Register => "Register",
        }
    }
}

/// Navigation requests issued by session controllers
///
/// Implementations must be cheap and non-blocking; they are called from
/// async flows without holding any lock across an await.
pub trait Navigator: Send + Sync {
    /// Replace the whole navigation state with `root`, discarding history
    fn reset_root(&self, root: NavigationRoot);

    /// Move to `screen` within the auth stack
    fn navigate_auth(&self, screen: AuthScreen);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_for_session() {
        assert_eq!(NavigationRoot::for_session(true), NavigationRoot::MainTabs);
        assert_eq!(NavigationRoot::for_session(false), NavigationRoot::AuthStack);
    }

    #[test]
    fn test_names() {
        assert_eq!(NavigationRoot::MainTabs.to_string(), "MainTabs");
        assert_eq!(NavigationRoot::AuthStack.name(), "AuthStack");
        assert_eq!(AuthScreen::Register.name(), "Register");
    }
}
