//! # Device image picker
//!
//! [`ImagePicker::pick_image`] asks the user for a photo and resolves to
//! [`PickedImage::Selected`] with a local URI, or [`PickedImage::Cancelled`].
//! [`ImagePicker::read`] loads the bytes behind a picked URI so they can be
//! uploaded to blob storage.
//!
//! Implementations:
//!
//! | Type | Used by |
//! |------|---------|
//! | [`FsImagePicker`] | Mobile fallback: picks the newest image file in a directory. |
//! | [`ScriptedImagePicker`] | Tests: replays queued picks. |

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "heic"];

#[derive(Debug, Error)]
pub enum PickerError {
    #[error("photo library permission denied")]
    PermissionDenied,
    #[error("no image at {0}")]
    NotFound(String),
    #[error("failed to read {uri}: {source}")]
    Io {
        uri: String,
        #[source]
        source: std::io::Error,
    },
}

/// Picker presentation options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickOptions {
    /// Let the user crop before confirming.
    pub allows_editing: bool,
    /// Crop aspect ratio as (width, height).
    pub aspect: Option<(u32, u32)>,
}

impl PickOptions {
    /// Editable square crop, as used for profile pictures.
    pub fn square() -> Self {
        Self {
            allows_editing: true,
            aspect: Some((1, 1)),
        }
    }
}

/// Outcome of a pick.
#[derive(Debug, Clone, PartialEq)]
pub enum PickedImage {
    Cancelled,
    Selected { uri: String },
}

/// Async interface to the device photo library.
pub trait ImagePicker {
    fn pick_image(
        &self,
        options: PickOptions,
    ) -> impl Future<Output = Result<PickedImage, PickerError>>;

    fn read(&self, uri: &str) -> impl Future<Output = Result<Vec<u8>, PickerError>>;
}

/// MIME type guessed from a URI's extension.
pub fn content_type_for(uri: &str) -> &'static str {
    let ext = uri
        .rsplit('.')
        .next()
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        _ => "application/octet-stream",
    }
}

/// Filesystem picker: offers the most recently modified image in `dir`.
#[derive(Clone, Debug)]
pub struct FsImagePicker {
    dir: PathBuf,
}

impl FsImagePicker {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Most recently modified image in the directory. A missing directory has none.
    fn newest_image(&self) -> Result<Option<PathBuf>, PickerError> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                return Err(PickerError::PermissionDenied)
            }
            Err(e) => {
                tracing::debug!(dir = %self.dir.display(), "no images to pick: {e}");
                return Ok(None);
            }
        };
        Ok(entries
            .filter_map(Result::ok)
            .filter(|entry| is_image(&entry.path()))
            .filter_map(|entry| {
                let modified = entry.metadata().ok()?.modified().ok()?;
                Some((modified, entry.path()))
            })
            .max_by_key(|(modified, _)| *modified)
            .map(|(_, path)| path))
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

impl ImagePicker for FsImagePicker {
    async fn pick_image(&self, _options: PickOptions) -> Result<PickedImage, PickerError> {
        Ok(match self.newest_image()? {
            Some(path) => PickedImage::Selected {
                uri: format!("file://{}", path.display()),
            },
            None => PickedImage::Cancelled,
        })
    }

    async fn read(&self, uri: &str) -> Result<Vec<u8>, PickerError> {
        let path = uri.strip_prefix("file://").unwrap_or(uri);
        std::fs::read(path).map_err(|source| {
            match source.kind() {
                std::io::ErrorKind::NotFound => PickerError::NotFound(uri.to_string()),
                std::io::ErrorKind::PermissionDenied => PickerError::PermissionDenied,
                _ => 
PickerError::Io {
                    uri: uri.to_string(),
                    source,
                },
            }
        })
    }
}

/// Picker that replays queued outcomes; cancels once the queue is empty.
#[derive(Clone, Debug, Default)]
pub struct ScriptedImagePicker {
    state: Arc<Mutex<ScriptState>>,
}

#[derive(Debug, Default)]
struct ScriptState {
    queue: VecDeque<Result<PickedImage, PickerError>>,
    files: HashMap<String, Vec<u8>>,
    picks: usize,
}

impl ScriptedImagePicker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a selection of `uri` whose content is `bytes`.
    pub fn then_select(self, uri: &str, bytes: Vec<u8>) -> Self {
        {
            let mut state = self.lock();
            state.queue.push_back(Ok(PickedImage::Selected {
                uri: uri.to_string(),
            }));
            state.files.insert(uri.to_string(), bytes);
        }
        self
    }

    pub fn then_cancel(self) -> Self {
        self.lock().queue.push_back(Ok(PickedImage::Cancelled));
        self
    }

    pub fn then_fail(self, err: PickerError) -> Self {
        self.lock().queue.push_back(Err(err));
        self
    }

    /// Number of times the picker was opened.
    pub fn picks(&self) -> usize {
        self.lock().picks
    }
}

impl ImagePicker for ScriptedImagePicker {
    async fn pick_image(&self, _options: PickOptions) -> Result<PickedImage, PickerError> {
        let mut state = self.lock();
        state.picks += 1;
        state.queue.pop_front().unwrap_or(Ok(PickedImage::Cancelled))
    }

    async fn read(&self, uri: &str) -> Result<Vec<u8>, PickerError> {
        self.lock()
            .files
            .get(uri)
            .cloned()
            .ok_or_else(|| PickerError::NotFound(uri.to_string()))
    }
}
