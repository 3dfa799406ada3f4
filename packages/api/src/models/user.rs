//! # Signed-in account as the authentication service reports it
//!
//! [`AuthUser`] is the session-level view of an account: the uid that keys the
//! `users/{uid}` profile document, the sign-in email, and the two profile fields
//! the auth service itself owns (display name and photo URL).
//!
//! [`ProfileUpdate`] carries a partial change to those two fields; `None` leaves
//! a field untouched.

use serde::{Deserialize, Serialize};

/// Account information for the current session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

impl AuthUser {
    /// Get display name, falling back to email if name is not set.
    pub fn display_name_or_email(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.email)
    }
}

/// Partial update of auth-owned profile fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

impl ProfileUpdate {
    pub fn display_name(name: impl Into<String>) -> Self {
        Self {
            display_name: Some(name.into()),
            photo_url: None,
        }
    }

    pub fn photo_url(url: impl Into<String>) -> Self {
        Self {
            display_name: None,
            photo_url: Some(url.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_falls_back_to_email() {
        let mut user = AuthUser {
            uid: "u1".into(),
            email: "ann@x.io".into(),
            display_name: None,
            photo_url: None,
        };
        assert_eq!(user.display_name_or_email(), "ann@x.io");
        user.display_name = Some(String::new());
        assert_eq!(user.display_name_or_email(), "ann@x.io");
        user.display_name = Some("Ann".into());
        assert_eq!(user.display_name_or_email(), "Ann");
    }
}
