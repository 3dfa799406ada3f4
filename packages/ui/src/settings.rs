//! Profile settings controller: username, password, picture, sign-out.

use api::{AuthService, AuthUser, BlobStorage, ImagePicker, ProfileUpdate};

use crate::avatar::{pick_and_upload, Avatar};
use crate::notice::Notice;
use crate::screen::Screen;

pub const MISSING_USERNAME: &str = "Enter a new username!";
pub const MISSING_PASSWORD: &str = "Enter a new password!";
pub const PROFILE_UPDATED: &str = "Profile updated!";
pub const PASSWORD_UPDATED: &str = "Password updated!";
pub const PICTURE_UPDATED: &str = "Profile picture updated";
pub const PASSWORD_PLACEHOLDER: &str = "At least 6 characters";

/// A settings action the backend accepted. Applied with [`ProfileSettings::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsChange {
    DisplayName(String),
    Password,
    Avatar(String),
}

/// State of the settings screen.
///
/// The async actions only read the screen state. Each resolves to a
/// [`SettingsChange`] that is applied afterwards, so actions finishing in any
/// order touch only their own part of the screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSettings {
    email: String,
    current_display_name: Option<String>,
    avatar: Avatar,
    pub display_name_input: String,
    pub password_input: String,
}

impl ProfileSettings {
    pub fn new(user: &AuthUser) -> Self {
        Self {
            email: user.email.clone(),
            current_display_name: user.display_name.clone(),
            avatar: Avatar::from_url(user.photo_url.as_deref()),
            display_name_input: String::new(),
            password_input: String::new(),
        }
    }

    /// Placeholder of the username field: the name currently in use.
    pub fn username_placeholder(&self) -> &str {
        self.current_display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.email)
    }

    pub fn avatar(&self) -> &Avatar {
        &self.avatar
    }

    pub async fn change_display_name<A: AuthService>(&self, auth: &A) -> Result<SettingsChange, Notice> {
        let name = self.display_name_input.trim().to_string();
        if name.is_empty() {
            return Err(Notice::error(MISSING_USERNAME));
        }
        match auth.update_profile(ProfileUpdate::display_name(&name)).await {
            Ok(_) => Ok(SettingsChange::DisplayName(name)),
            Err(e) => {
                tracing::info!(code = e.code(), "display name change rejected");
                Err(Notice::error(e.user_message()))
            }
        }
    }

    pub async fn change_password<A: AuthService>(&self, auth: &A) -> Result<SettingsChange, Notice> {
        if self.password_input.is_empty() {
            return Err(Notice::error(MISSING_PASSWORD));
        }
        match auth.update_password(&self.password_input).await {
            Ok(()) => Ok(SettingsChange::Password),
            Err(e) => {
                tracing::info!(code = e.code(), "password change rejected");
                Err(Notice::error(e.user_message()))
            }
        }
    }

    /// Pick, upload, and attach a new profile picture.
    ///
    /// Cancelling gives `None`. Failures are logged and also give `None`.
    pub async fn change_avatar<P, B, A>(&self, picker: &P, storage: &B, auth: &A) -> Option<SettingsChange>
    where
        P: ImagePicker,
        B: BlobStorage,
        A: AuthService,
    {
        let url = match pick_and_upload(picker, storage).await {
            Ok(Some(url)) => url,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("profile picture not changed: {e}");
                return None;
            }
        };
        match auth.update_profile(ProfileUpdate::photo_url(&url)).await {
            Ok(_) => Some(SettingsChange::Avatar(url)),
            Err(e) => {
                tracing::warn!(code = e.code(), "profile picture not saved: {e}");
                None
            }
        }
    }

    /// Reflect an accepted change on screen and return the alert to show.
    pub fn apply(&mut self, change: SettingsChange) -> Notice {
        match change {
            SettingsChange::DisplayName(name) => {
                self.current_display_name = Some(name);
                self.display_name_input.clear();
                Notice::success(PROFILE_UPDATED)
            }
            SettingsChange::Password => {
                self.password_input.clear();
                Notice::success(PASSWORD_UPDATED)
            }
            SettingsChange::Avatar(url) => {
                self.avatar = Avatar::Url(url);
                Notice::info(PICTURE_UPDATED)
            }
        }
    }

    /// Sign out and go back to the login screen.
    pub async fn sign_out<A: AuthService>(&self, auth: &A) -> Result<Screen, Notice> {
        match auth.sign_out().await {
            Ok(()) => Ok(Screen::Login),
            Err(e) => Err(Notice::error(e.user_message())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::{AuthError, MemoryAuth, MemoryBlobStorage, PickerError, ScriptedImagePicker};

    async fn signed_in() -> (MemoryAuth, ProfileSettings) {
        let auth = MemoryAuth::new();
        auth.create_account("ann@example.com", "secret1").await.unwrap();
        let user = auth
            .update_profile(ProfileUpdate::display_name("Ann"))
            .await
            .unwrap();
        (auth, ProfileSettings::new(&user))
    }

    #[tokio::test]
    async fn test_change_display_name() {
        let (auth, mut settings) = signed_in().await;
        assert_eq!(settings.username_placeholder(), "Ann");

        settings.display_name_input = "Annie".into();
        let change = settings.change_display_name(&auth).await.unwrap();
        assert_eq!(change, SettingsChange::DisplayName("Annie".into()));
        assert_eq!(settings.apply(change), Notice::success("Profile updated!"));
        assert_eq!(settings.username_placeholder(), "Annie");
        assert!(settings.display_name_input.is_empty());
        assert_eq!(
            auth.current_session().unwrap().display_name.as_deref(),
            Some("Annie")
        );
    }

    #[tokio::test]
    async fn test_blank_display_name_is_not_sent() {
        let (auth, mut settings) = signed_in().await;
        let calls = auth.calls();
        settings.display_name_input = "  ".into();
        assert_eq!(
            settings.change_display_name(&auth).await,
            Err(Notice::error(MISSING_USERNAME))
        );
        assert_eq!(auth.calls(), calls);
    }

    #[tokio::test]
    async fn test_change_password() {
        let (auth, mut settings) = signed_in().await;

        settings.password_input = "abc".into();
        let notice = settings.change_password(&auth).await.unwrap_err();
        assert!(notice.is_error());
        assert_eq!(settings.password_input, "abc");

        settings.password_input = "newsecret".into();
        let change = settings.change_password(&auth).await.unwrap();
        assert_eq!(settings.apply(change), Notice::success("Password updated!"));
        assert!(settings.password_input.is_empty());
    }

    #[tokio::test]
    async fn test_change_avatar_uploads_and_saves() {
        let (auth, mut settings) = signed_in().await;
        let storage = MemoryBlobStorage::default();
        let picker = ScriptedImagePicker::new().then_select("file:///new.png", vec![4]);

        let change = settings.change_avatar(&picker, &storage, &auth).await.unwrap();
        assert_eq!(settings.apply(change), Notice::info(PICTURE_UPDATED));
        let url = settings.avatar().url().unwrap().to_string();
        assert!(url.starts_with("memory://"));
        assert_eq!(auth.current_session().unwrap().photo_url, Some(url));
    }

    #[tokio::test]
    async fn test_failed_upload_keeps_avatar() {
        let (auth, settings) = signed_in().await;
        let storage = MemoryBlobStorage::default();
        storage.set_offline(true);
        let picker = ScriptedImagePicker::new()
            .then_select("file:///new.png", vec![4])
            .then_fail(PickerError::PermissionDenied);

        assert_eq!(settings.change_avatar(&picker, &storage, &auth).await, None);
        assert_eq!(settings.change_avatar(&picker, &storage, &auth).await, None);
        assert_eq!(settings.avatar(), &Avatar::Default);
        assert!(auth.current_session().unwrap().photo_url.is_none());
    }

    #[tokio::test]
    async fn test_overlapping_changes_keep_each_result() {
        let (auth, mut settings) = signed_in().await;
        let storage = MemoryBlobStorage::default();
        let picker = ScriptedImagePicker::new().then_select("file:///new.png", vec![4]);

        // Both actions start from the same screen state.
        settings.display_name_input = "Annie".into();
        let started = settings.clone();
        let avatar = started.change_avatar(&picker, &storage, &auth).await.unwrap();
        let name = started.change_display_name(&auth).await.unwrap();

        // The picture finishes first, the name second.
        settings.apply(avatar);
        settings.apply(name);

        let backend = auth.current_session().unwrap();
        assert_eq!(settings.avatar().url(), backend.photo_url.as_deref());
        assert_eq!(settings.username_placeholder(), "Annie");
    }

    #[tokio::test]
    async fn test_sign_out() {
        let (auth, settings) = signed_in().await;
        auth.fail_next(AuthError::Network("offline".into()));
        assert!(settings.sign_out(&auth).await.is_err());
        assert!(auth.current_session().is_some());

        assert_eq!(settings.sign_out(&auth).await, Ok(Screen::Login));
        assert!(auth.current_session().is_none());
    }
}
