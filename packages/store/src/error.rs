//! Errors raised at the document database boundary.

use thiserror::Error;

/// Failure reported by a [`crate::DocumentStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// Field-level write against a document that does not exist.
    #[error("document {collection}/{id} not found")]
    NotFound { collection: String, id: String },

    /// A create with an explicit id collided with an existing document.
    #[error("document {collection}/{id} already exists")]
    AlreadyExists { collection: String, id: String },

    /// The backend's security rules rejected the operation.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Stored fields did not match the expected schema.
    #[error("failed to decode document {id}: {source}")]
    Decode {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    /// A typed document could not be turned into fields.
    #[error("failed to encode document: {0}")]
    Encode(#[source] serde_json::Error),

    /// Documents must serialize to a field map.
    #[error("document fields must be an object")]
    NotAnObject,

    /// Connectivity or listener failure inside the backend client.
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn not_found(collection: &str, id: &str) -> Self {
        Self::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }
}
