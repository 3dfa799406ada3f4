//! # DocumentStore: the managed document database boundary
//!
//! Screens never talk to a concrete backend. They receive something that
//! implements [`DocumentStore`] and use it for three things:
//!
//! | Operation | Description |
//! |-----------|-------------|
//! | [`subscribe`](DocumentStore::subscribe) | Register a standing query and get a [`LiveQuery`] of full snapshots plus its cancellation handle. Registration itself is synchronous. |
//! | [`create_document`](DocumentStore::create_document) / [`set_document`](DocumentStore::set_document) | Whole-document writes. `create` fails if the id is taken; `set` overwrites. A `None` id gets a server-generated one. |
//! | [`update_fields`](DocumentStore::update_fields) | Field-level merge into an existing document. |
//! | [`get_document`](DocumentStore::get_document) / [`delete_document`](DocumentStore::delete_document) | Point reads and removal. |
//!
//! Documents cross this boundary as typed schemas from [`crate::models`];
//! implementations store them however the backend does.

use std::future::Future;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::StoreError;
use crate::live::LiveQuery;
use crate::models::{Document, DocumentId};
use crate::query::Query;

/// Async interface to a hosted document database.
pub trait DocumentStore {
    fn subscribe<T: DeserializeOwned>(&self, query: &Query) -> Result<LiveQuery<T>, StoreError>;

    fn create_document<T: Serialize>(
        &self,
        collection: &str,
        id: Option<&str>,
        data: &T,
    ) -> impl Future<Output = Result<DocumentId, StoreError>>;

    fn set_document<T: Serialize>(
        &self,
        collection: &str,
        id: &str,
        data: &T,
    ) -> impl Future<Output = Result<(), StoreError>>;

    fn update_fields(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> impl Future<Output = Result<(), StoreError>>;

    fn get_document<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> impl Future<Output = Result<Option<Document<T>>, StoreError>>;

    fn delete_document(
        &self,
        collection: &str,
        id: &str,
    ) -> impl Future<Output = Result<(), StoreError>>;
}

/// Encode a typed document as the field map the backend stores.
pub fn to_fields<T: Serialize>(data: &T) -> Result<Value, StoreError> {
    let value = serde_json::to_value(data).map_err(StoreError::Encode)?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(StoreError::NotAnObject)
    }
}
