//! Screens a controller can ask the shell to navigate to.

/// Navigation target, mapped onto the router by each platform package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Landing,
    Login,
    Signup,
    Settings,
    GoalHistory,
}
