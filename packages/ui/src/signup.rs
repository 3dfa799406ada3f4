//! Sign-up form controller.
//!
//! Creating an account is a short, strictly ordered sequence against three
//! collaborators: the auth service creates the account, the document store
//! receives the budgeting profile and the email lookup entry, and the auth
//! profile gets the display name and picture. A failure at any step ends the
//! action with an alert and leaves the form filled in so the user can retry.
//! A retry after the account was created but its profile was not written
//! picks up the signed-in account instead of creating another one.

use api::auth::hash_password;
use api::{AuthError, AuthService, AuthUser, BlobStorage, ImagePicker, ProfileUpdate};
use chrono::Utc;
use store::{AppConfig, Document, DocumentStore, StoreError, User, UserLookup};
use thiserror::Error;

use crate::avatar::{pick_and_upload, Avatar};
use crate::notice::Notice;
use crate::screen::Screen;

pub const MISSING_DETAILS: &str = "Enter details to sign up!";
pub const ACCOUNT_CREATED: &str = "Log in with your new account";

#[derive(Debug, Error)]
pub enum SignupError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("could not save your profile: {0}")]
    Profile(#[from] StoreError),
    #[error("could not secure your password: {0}")]
    Password(#[from] api::auth::PasswordError),
}

impl SignupError {
    pub fn user_message(&self) -> String {
        match self {
            SignupError::Auth(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

/// Result of pressing "Sign up".
#[derive(Debug, Clone, PartialEq)]
pub enum SignupOutcome {
    /// A required field was empty. Nothing was sent.
    Invalid(Notice),
    /// The backend refused; the form keeps its input.
    Rejected { notice: Notice, next: Screen },
    /// Account created; the form was cleared.
    Created {
        user: AuthUser,
        notice: Notice,
        next: Screen,
    },
}

/// State of the sign-up screen.
///
/// Submitting is split in three so the screen stays editable while the
/// request is in flight: [`begin_submit`](Self::begin_submit) validates and
/// captures a [`SignupRequest`], [`SignupRequest::send`] talks to the backend,
/// and [`finish_submit`](Self::finish_submit) applies the outcome.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignupForm {
    pub email: String,
    pub first_name: String,
    pub password: String,
    photo_url: Option<String>,
    loading: bool,
}

impl SignupForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn avatar(&self) -> Avatar {
        Avatar::from_url(self.photo_url.as_deref())
    }

    /// "Already have an account? Log in"
    pub fn login_link(&self) -> Screen {
        Screen::Login
    }

    fn has_missing_field(&self) -> bool {
        self.email.trim().is_empty() || self.first_name.trim().is_empty() || self.password.is_empty()
    }

    /// Let the user choose a profile picture and upload it.
    ///
    /// Resolves to the download URL to pass to [`set_photo`](Self::set_photo).
    /// Cancelling gives `None`; failures are logged and give `None`.
    pub async fn pick_photo<P, B>(picker: &P, storage: &B) -> Option<String>
    where
        P: ImagePicker,
        B: BlobStorage,
    {
        match pick_and_upload(picker, storage).await {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("profile picture not changed: {e}");
                None
            }
        }
    }

    pub fn set_photo(&mut self, url: String) {
        self.photo_url = Some(url);
    }

    /// Validate and mark the form as loading.
    ///
    /// An empty required field gives the alert to show; nothing is sent.
    pub fn begin_submit(&mut self) -> Result<SignupRequest, Notice> {
        if self.has_missing_field() {
            return Err(Notice::error(MISSING_DETAILS));
        }
        self.loading = true;
        Ok(SignupRequest {
            email: self.email.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            password: self.password.clone(),
            photo_url: self.photo_url.clone(),
        })
    }

    /// Leave the loading state; a created account clears the form.
    pub fn finish_submit(&mut self, outcome: &SignupOutcome) {
        self.loading = false;
        if let SignupOutcome::Created { .. } = outcome {
            *self = Self::default();
        }
    }
}

/// The details captured when "Sign up" was pressed.
#[derive(Debug, Clone, PartialEq)]
pub struct SignupRequest {
    email: String,
    first_name: String,
    password: String,
    photo_url: Option<String>,
}

impl SignupRequest {
    /// Create the account and write the profile documents.
    pub async fn send<A, D>(&self, auth: &A, db: &D, config: &AppConfig) -> SignupOutcome
    where
        A: AuthService,
        D: DocumentStore,
    {
        match self.register(auth, db, config).await {
            Ok(user) => {
                tracing::info!(uid = %user.uid, "account created");
                SignupOutcome::Created {
                    user,
                    notice: Notice::success(ACCOUNT_CREATED),
                    next: Screen::Login,
                }
            }
            Err(e) => {
                match &e {
                    SignupError::Auth(auth_err) => {
                        tracing::info!(code = auth_err.code(), "sign-up rejected")
                    }
                    other => tracing::error!("sign-up failed after account creation: {other}"),
                }
                SignupOutcome::Rejected {
                    notice: Notice::error(e.user_message()),
                    next: Screen::Signup,
                }
            }
        }
    }

    /// The signed-in account of an earlier attempt whose profile was never written.
    async fn unfinished_account<A, D>(
        &self,
        auth: &A,
        db: &D,
        config: &AppConfig,
    ) -> Result<Option<AuthUser>, SignupError>
    where
        A: AuthService,
        D: DocumentStore,
    {
        let Some(user) = auth.current_session() else {
            return Ok(None);
        };
        if !user.email.eq_ignore_ascii_case(&self.email) {
            return Ok(None);
        }
        let profile: Option<Document<User>> =
            db.get_document(&config.collections.users, &user.uid).await?;
        if profile.is_some() {
            return Ok(None);
        }
        tracing::info!(uid = %user.uid, "resuming unfinished sign-up");
        Ok(Some(user))
    }

    async fn register<A, D>(&self, auth: &A, db: &D, config: &AppConfig) -> Result<AuthUser, SignupError>
    where
        A: AuthService,
        D: DocumentStore,
    {
        let account = match self.unfinished_account(auth, db, config).await? {
            Some(account) => account,
            None => auth.create_account(&self.email, &self.password).await?,
        };

        let profile = User::new_profile(
            &self.first_name,
            &account.email,
            hash_password(&self.password)?,
            Utc::now(),
            config.budget.default_period.as_str(),
        );
        db.set_document(&config.collections.users, &account.uid, &profile)
            .await?;
        db.set_document(
            &config.collections.user_lookup,
            &account.email,
            &UserLookup {
                uid: account.uid.clone(),
            },
        )
        .await?;

        let user = auth
            .update_profile(ProfileUpdate {
                display_name: Some(self.first_name.clone()),
                photo_url: self.photo_url.clone(),
            })
            .await?;
        Ok(user)
    }
}
