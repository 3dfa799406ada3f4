//! Collaborators shared by every view.

use std::path::PathBuf;

use api::{FsImagePicker, MemoryAuth, MemoryBlobStorage};
use store::{AppConfig, MemoryStore};

const APP_DIR: &str = "budgeking";
const AVATAR_BUCKET: &str = "avatars";

/// Platform services, provided once as context by the root component.
#[derive(Clone)]
pub struct Platform {
    pub auth: MemoryAuth,
    pub db: MemoryStore,
    pub storage: MemoryBlobStorage,
    pub picker: FsImagePicker,
    pub config: AppConfig,
}

impl Platform {
    pub fn from_environment() -> Self {
        let config = config_path()
            .map(|path| AppConfig::load_from(&path))
            .unwrap_or_default();
        let pictures = dirs::picture_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        tracing::info!(pictures = %pictures.display(), "platform ready");

        Self {
            auth: MemoryAuth::new(),
            db: MemoryStore::new(),
            storage: MemoryBlobStorage::new(AVATAR_BUCKET),
            picker: FsImagePicker::new(pictures),
            config,
        }
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(AppConfig::filename()))
}
