//! Managed document database boundary: schemas, queries, live snapshots.

pub mod config;
pub mod document_store;
pub mod error;
pub mod live;
pub mod models;
pub mod query;

mod memory;
pub use memory::MemoryStore;

pub use config::AppConfig;
pub use document_store::DocumentStore;
pub use error::StoreError;
pub use live::{ListenerRegistration, LiveQuery};
pub use models::{Document, DocumentId, Goal, User, UserLookup};
pub use query::{Predicate, Query, RawDocument, Snapshot};
