//! Server-side queries and the snapshots they produce.
//!
//! A [`Query`] names a collection and one [`Predicate`]. Whenever the result
//! set of a query changes the backend pushes a [`Snapshot`]: the complete list
//! of matching documents, never a diff.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::StoreError;
use crate::models::{Document, DocumentId};

/// Filter condition evaluated by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Predicate {
    /// `field == value`
    FieldEquals { field: String, value: String },
    /// `value in field` for an array field.
    ArrayContains { field: String, value: String },
}

impl Predicate {
    /// Whether a document's fields satisfy the predicate.
    pub fn matches(&self, fields: &Value) -> bool {
        match self {
            Predicate::FieldEquals { field, value } => {
                fields.get(field).and_then(Value::as_str) == Some(value.as_str())
            }
            Predicate::ArrayContains { field, value } => fields
                .get(field)
                .and_then(Value::as_array)
                .is_some_and(|items| items.iter().any(|v| v.as_str() == Some(value.as_str()))),
        }
    }
}

/// A standing request against one collection.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Query {
    pub collection: String,
    pub predicate: Predicate,
}

impl Query {
    pub fn field_equals(
        collection: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            collection: collection.into(),
            predicate: Predicate::FieldEquals {
                field: field.into(),
                value: value.into(),
            },
        }
    }

    pub fn array_contains(
        collection: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            collection: collection.into(),
            predicate: Predicate::ArrayContains {
                field: field.into(),
                value: value.into(),
            },
        }
    }
}

/// A document as the backend holds it: id plus untyped fields.
#[derive(Clone, Debug, PartialEq)]
pub struct RawDocument {
    pub id: DocumentId,
    pub fields: Value,
}

/// Complete, point-in-time result set of a query.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot<T> {
    pub documents: Vec<Document<T>>,
}

impl<T> Snapshot<T> {
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }
}

impl<T: DeserializeOwned> Snapshot<T> {
    /// Decode every raw document. One bad document fails the snapshot.
    pub fn decode(raw: &[RawDocument]) -> Result<Self, StoreError> {
        let documents = raw
            .iter()
            .map(|doc| {
                let data = serde_json::from_value(doc.fields.clone()).map_err(|source| {
                    StoreError::Decode {
                        id: doc.id.to_string(),
                        source,
                    }
                })?;
                Ok(Document {
                    id: doc.id.clone(),
                    data,
                })
            })
            .collect::<Result<Vec<_>, StoreError>>()?;
        Ok(Self { documents })
    }
}
