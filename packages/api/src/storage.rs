//! # Managed blob storage
//!
//! [`BlobStorage::upload`] stores raw bytes under a fresh UUID v4 key and
//! resolves to the download URL that profile documents and the auth profile
//! reference. [`MemoryBlobStorage`] keeps objects in memory and hands out
//! `memory://<bucket>/<key>` URLs.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("upload rejected: {0}")]
    Rejected(String),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Async interface to hosted blob storage.
pub trait BlobStorage {
    /// Upload `bytes` and return the object's download URL.
    fn upload(
        &self,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> impl Future<Output = Result<String, StorageError>>;
}

/// In-memory BlobStorage for testing and offline fallback.
#[derive(Clone, Debug)]
pub struct MemoryBlobStorage {
    bucket: String,
    state: Arc<Mutex<StorageState>>,
}

#[derive(Debug, Default)]
struct StorageState {
    objects: HashMap<String, StoredObject>,
    offline: bool,
}

#[derive(Debug, Clone)]
struct StoredObject {
    content_type: String,
    bytes: Vec<u8>,
}

impl Default for MemoryBlobStorage {
    fn default() -> Self {
        Self::new("budgeking")
    }
}

impl MemoryBlobStorage {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            state: Arc::default(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StorageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Simulate lost connectivity: every upload fails while set.
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    fn url_prefix(&self) -> String {
        format!("memory://{}/", self.bucket)
    }

    /// Bytes and content type stored behind a download URL.
    pub fn get(&self, url: &str) -> Option<(String, Vec<u8>)> {
        let key = url.strip_prefix(&self.url_prefix())?;
        self.lock()
            .objects
            .get(key)
            .map(|obj| (obj.content_type.clone(), obj.bytes.clone()))
    }

    pub fn len(&self) -> usize {
        self.lock().objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BlobStorage for MemoryBlobStorage {
    async fn upload(&self, bytes: Vec<u8>, content_type: &str) -> Result<String, StorageError> {
        let mut state = self.lock();
        if state.offline {
            return Err(StorageError::Unavailable("offline".to_string()));
        }
        let key = uuid::Uuid::new_v4().to_string();
        tracing::debug!(%key, size = bytes.len(), "blob uploaded");
        state.objects.insert(
            key.clone(),
            StoredObject {
                content_type: content_type.to_string(),
                bytes,
            },
        );
        Ok(format!("{}{key}", self.url_prefix()))
    }
}
