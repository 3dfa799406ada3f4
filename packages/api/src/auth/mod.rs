//! # Managed authentication
//!
//! [`AuthService`] is the boundary to the hosted auth provider. Every operation
//! either succeeds or fails with an [`AuthError`] classified by the provider's
//! error code, which the screens map to a user-facing message with
//! [`AuthError::user_message`].
//!
//! | Operation | Notes |
//! |-----------|-------|
//! | `create_account` | Creating an account also signs it in. |
//! | `sign_in` | Email + password. |
//! | `current_session` | Local read, never a network call. |
//! | `update_profile` | Display name and photo URL of the signed-in account. |
//! | `update_password` | Replaces the signed-in account's password. |
//! | `sign_out` | Clears the session. |

mod memory;
mod password;

use std::future::Future;

use thiserror::Error;

use crate::models::{AuthUser, ProfileUpdate};

pub use memory::MemoryAuth;
pub use password::{hash_password, verify_password, PasswordError};

/// Minimum password length accepted by the provider.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Async interface to the hosted authentication service.
pub trait AuthService {
    fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<AuthUser, AuthError>>;

    fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<AuthUser, AuthError>>;

    fn current_session(&self) -> Option<AuthUser>;

    fn update_profile(
        &self,
        update: ProfileUpdate,
    ) -> impl Future<Output = Result<AuthUser, AuthError>>;

    fn update_password(&self, new_password: &str) -> impl Future<Output = Result<(), AuthError>>;

    fn sign_out(&self) -> impl Future<Output = Result<(), AuthError>>;
}

/// Failure reported by the auth provider.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuthError {
    #[error("The email address is already in use by another account.")]
    EmailAlreadyInUse,
    #[error("The email address is badly formatted.")]
    InvalidEmail,
    #[error("Password should be at least 6 characters.")]
    WeakPassword,
    #[error("The password is invalid.")]
    InvalidCredential,
    #[error("There is no account with this email address.")]
    UserNotFound,
    #[error("No user is signed in.")]
    NotSignedIn,
    #[error("Missing or insufficient permissions.")]
    PermissionDenied,
    #[error("A network error has occurred: {0}")]
    Network(String),
    #[error("{message}")]
    Other { code: String, message: String },
}

impl AuthError {
    /// The provider's error code.
    pub fn code(&self) -> &str {
        match self {
            AuthError::EmailAlreadyInUse => "auth/email-already-in-use",
            AuthError::InvalidEmail => "auth/invalid-email",
            AuthError::WeakPassword => "auth/weak-password",
            AuthError::InvalidCredential => "auth/wrong-password",
            AuthError::UserNotFound => "auth/user-not-found",
            AuthError::NotSignedIn => "auth/no-current-user",
            AuthError::PermissionDenied => "permission-denied",
            AuthError::Network(_) => "auth/network-request-failed",
            AuthError::Other { code, .. } => code.as_str(),
        }
    }

    /// Classify a raw provider error.
    pub fn from_code(code: &str, message: impl Into<String>) -> Self {
        match code {
            "auth/email-already-in-use" => AuthError::EmailAlreadyInUse,
            "auth/invalid-email" => AuthError::InvalidEmail,
            "auth/weak-password" => AuthError::WeakPassword,
            "auth/wrong-password" | "auth/invalid-credential" => AuthError::InvalidCredential,
            "auth/user-not-found" => AuthError::UserNotFound,
            "auth/no-current-user" => AuthError::NotSignedIn,
            "permission-denied" => AuthError::PermissionDenied,
            "auth/network-request-failed" => AuthError::Network(message.into()),
            _ => AuthError::Other {
                code: code.to_string(),
                message: message.into(),
            },
        }
    }

    /// Message shown to the user in an alert.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::EmailAlreadyInUse => "That email address is already in use!".to_string(),
            AuthError::InvalidEmail => "Invalid email".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<PasswordError> for AuthError {
    fn from(e: PasswordError) -> Self {
        AuthError::Other {
            code: "auth/internal-error".to_string(),
            message: e.to_string(),
        }
    }
}
