//! Landing screen routing and the login form controller.

use api::AuthService;

use crate::notice::Notice;
use crate::screen::Screen;

pub const MISSING_LOGIN_DETAILS: &str = "Enter details to log in!";

/// Buttons on the landing screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandingAction {
    Login,
    SignUp,
}

impl LandingAction {
    pub fn target(self) -> Screen {
        match self {
            LandingAction::Login => Screen::Login,
            LandingAction::SignUp => Screen::Signup,
        }
    }
}

/// State of the login screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// Sign in; on success continue to the goal history.
    pub async fn submit<A: AuthService>(&self, auth: &A) -> Result<Screen, Notice> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(Notice::error(MISSING_LOGIN_DETAILS));
        }
        match auth.sign_in(self.email.trim(), &self.password).await {
            Ok(user) => {
                tracing::info!(uid = %user.uid, "signed in");
                Ok(Screen::GoalHistory)
            }
            Err(e) => {
                tracing::info!(code = e.code(), "sign-in rejected");
                Err(Notice::error(e.user_message()))
            }
        }
    }

    /// "Don't have an account? Sign up"
    pub fn signup_link(&self) -> Screen {
        Screen::Signup
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::MemoryAuth;

    #[test]
    fn test_landing_targets() {
        assert_eq!(LandingAction::Login.target(), Screen::Login);
        assert_eq!(LandingAction::SignUp.target(), Screen::Signup);
    }

    #[tokio::test]
    async fn test_login_requires_both_fields() {
        let auth = MemoryAuth::new();
        let form = LoginForm {
            email: "ann@example.com".into(),
            password: String::new(),
        };
        assert_eq!(
            form.submit(&auth).await,
            Err(Notice::error(MISSING_LOGIN_DETAILS))
        );
        assert_eq!(auth.calls(), 0);
    }

    #[tokio::test]
    async fn test_login_success_and_failure() {
        let auth = MemoryAuth::new();
        auth.create_account("ann@example.com", "secret1").await.unwrap();
        auth.sign_out().await.unwrap();

        let mut form = LoginForm {
            email: "ann@example.com".into(),
            password: "wrong-one".into(),
        };
        let err = form.submit(&auth).await.unwrap_err();
        assert!(err.is_error());

        form.password = "secret1".into();
        assert_eq!(form.submit(&auth).await, Ok(Screen::GoalHistory));
        assert!(auth.current_session().is_some());
    }
}
