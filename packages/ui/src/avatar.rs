//! Profile pictures: what to show, and how a new one gets picked and uploaded.

use api::picker::content_type_for;
use api::{BlobStorage, ImagePicker, PickOptions, PickedImage, PickerError, StorageError};
use dioxus::prelude::*;
use dioxus_free_icons::icons::fa_solid_icons::FaUser;
use dioxus_free_icons::Icon;
use thiserror::Error;

/// Picture shown for a profile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Avatar {
    /// Bundled placeholder.
    Default,
    Url(String),
}

impl Avatar {
    pub fn from_url(url: Option<&str>) -> Self {
        match url {
            Some(url) if !url.is_empty() => Avatar::Url(url.to_string()),
            _ => Avatar::Default,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Avatar::Default => None,
            Avatar::Url(url) => Some(url),
        }
    }
}

#[derive(Debug, Error)]
pub enum AvatarError {
    #[error(transparent)]
    Picker(#[from] PickerError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Open the photo library with a square crop; upload the choice.
///
/// Resolves to the download URL, or `None` when the user cancelled.
pub async fn pick_and_upload<P, B>(picker: &P, storage: &B) -> Result<Option<String>, AvatarError>
where
    P: ImagePicker,
    B: BlobStorage,
{
    let uri = match picker.pick_image(PickOptions::square()).await? {
        PickedImage::Cancelled => return Ok(None),
        PickedImage::Selected { uri } => uri,
    };
    let bytes = picker.read(&uri).await?;
    let url = storage.upload(bytes, content_type_for(&uri)).await?;
    Ok(Some(url))
}

/// Round profile picture, or the placeholder icon.
#[component]
pub fn AvatarImage(avatar: Avatar, #[props(default = 70)] size: u32) -> Element {
    match avatar {
        Avatar::Url(url) => rsx! {
            img {
                class: "avatar",
                width: "{size}",
                height: "{size}",
                src: "{url}",
                alt: "Profile picture",
            }
        },
        Avatar::Default => rsx! {
            span {
                class: "avatar avatar--placeholder",
                Icon { icon: FaUser, width: size / 2, height: size / 2 }
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::{MemoryBlobStorage, ScriptedImagePicker};

    #[test]
    fn test_from_url() {
        assert_eq!(Avatar::from_url(None), Avatar::Default);
        assert_eq!(Avatar::from_url(Some("")), Avatar::Default);
        assert_eq!(
            Avatar::from_url(Some("memory://a/b")),
            Avatar::Url("memory://a/b".into())
        );
    }

    #[tokio::test]
    async fn test_cancelled_pick_uploads_nothing() {
        let picker = ScriptedImagePicker::new().then_cancel();
        let storage = MemoryBlobStorage::default();
        assert_eq!(pick_and_upload(&picker, &storage).await.unwrap(), None);
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_picker_failure_uploads_nothing() {
        let picker = ScriptedImagePicker::new().then_fail(PickerError::PermissionDenied);
        let storage = MemoryBlobStorage::default();
        assert!(matches!(
            pick_and_upload(&picker, &storage).await,
            Err(AvatarError::Picker(PickerError::PermissionDenied))
        ));
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_selected_pick_is_uploaded() {
        let picker = ScriptedImagePicker::new().then_select("file:///me.jpg", vec![1, 2]);
        let storage = MemoryBlobStorage::default();
        let url = pick_and_upload(&picker, &storage).await.unwrap().unwrap();
        assert_eq!(storage.get(&url), Some(("image/jpeg".to_string(), vec![1, 2])));
    }
}
