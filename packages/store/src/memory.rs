use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::watch;

use crate::document_store::{to_fields, DocumentStore};
use crate::error::StoreError;
use crate::live::{ListenerRegistration, LiveQuery};
use crate::models::{Document, DocumentId};
use crate::query::{Query, RawDocument};

/// In-memory DocumentStore for testing and offline fallback.
///
/// Cheap to clone; clones share the same collections and listeners.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

#[derive(Debug, Default)]
struct State {
    collections: HashMap<String, BTreeMap<DocumentId, Value>>,
    listeners: HashMap<u64, Listener>,
    next_listener: u64,
    cancelled: usize,
    read_only: bool,
}

#[derive(Debug)]
struct Listener {
    query: Query,
    tx: watch::Sender<Vec<RawDocument>>,
}

impl State {
    fn results(&self, query: &Query) -> Vec<RawDocument> {
        self.collections
            .get(&query.collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, fields)| query.predicate.matches(fields))
                    .map(|(id, fields)| RawDocument {
                        id: id.clone(),
                        fields: fields.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Push a fresh snapshot to every listener on `collection` whose result set changed.
    fn notify(&self, collection: &str) {
        for listener in self.listeners.values() {
            if listener.query.collection != collection {
                continue;
            }
            let next = self.results(&listener.query);
            listener.tx.send_if_modified(|current| {
                if *current == next {
                    false
                } else {
                    *current = next;
                    true
                }
            });
        }
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.read_only {
            Err(StoreError::PermissionDenied("store is read-only".to_string()))
        } else {
            Ok(())
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reject every write with `PermissionDenied`, as restrictive security rules would.
    pub fn set_read_only(&self, read_only: bool) {
        self.lock().read_only = read_only;
    }

    /// Number of listeners currently registered.
    pub fn active_listeners(&self) -> usize {
        self.lock().listeners.len()
    }

    /// Number of listeners cancelled so far.
    pub fn cancelled_listeners(&self) -> usize {
        self.lock().cancelled
    }

    /// Number of documents in a collection.
    pub fn count(&self, collection: &str) -> usize {
        self.lock()
            .collections
            .get(collection)
            .map_or(0, BTreeMap::len)
    }
}

fn cancel_listener(state: &Weak<Mutex<State>>, id: u64) {
    let Some(state) = state.upgrade() else {
        return;
    };
    let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
    if state.listeners.remove(&id).is_some() {
        state.cancelled += 1;
        tracing::debug!(listener = id, "listener cancelled");
    }
}

impl DocumentStore for MemoryStore {
    fn subscribe<T: DeserializeOwned>(&self, query: &Query) -> Result<LiveQuery<T>, StoreError> {
        let mut state = self.lock();
        let id = state.next_listener;
        state.next_listener += 1;

        let (tx, rx) = watch::channel(state.results(query));
        state.listeners.insert(
            id,
            Listener {
                query: query.clone(),
                tx,
            },
        );
        tracing::debug!(listener = id, collection = %query.collection, "listener registered");

        let weak = Arc::downgrade(&self.state);
        let registration = ListenerRegistration::new(move || cancel_listener(&weak, id));
        Ok(LiveQuery::new(query.clone(), rx, registration))
    }

    async fn create_document<T: Serialize>(
        &self,
        collection: &str,
        id: Option<&str>,
        data: &T,
    ) -> Result<DocumentId, StoreError> {
        let fields = to_fields(data)?;
        let mut state = self.lock();
        state.check_writable()?;

        let id = id.map(DocumentId::from).unwrap_or_else(DocumentId::generate);
        let docs = state.collections.entry(collection.to_string()).or_default();
        if docs.contains_key(&id) {
            return Err(StoreError::AlreadyExists {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        docs.insert(id.clone(), fields);
        state.notify(collection);
        Ok(id)
    }

    async fn set_document<T: Serialize>(
        &self,
        collection: &str,
        id: &str,
        data: &T,
    ) -> Result<(), StoreError> {
        let fields = to_fields(data)?;
        let mut state = self.lock();
        state.check_writable()?;

        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(DocumentId::from(id), fields);
        state.notify(collection);
        Ok(())
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError> {
        let mut state = self.lock();
        state.check_writable()?;

        let doc = state
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(&DocumentId::from(id)))
            .and_then(Value::as_object_mut)
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        doc.extend(fields);
        state.notify(collection);
        Ok(())
    }

    async fn get_document<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document<T>>, StoreError> {
        let id = DocumentId::from(id);
        let fields = self
            .lock()
            .collections
            .get(collection)
            .and_then(|docs| docs.get(&id))
            .cloned();

        fields
            .map(|fields| {
                let data = serde_json::from_value(fields).map_err(|source| StoreError::Decode {
                    id: id.to_string(),
                    source,
                })?;
                Ok(Document { id, data })
            })
            .transpose()
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut state = self.lock();
        state.check_writable()?;

        if let Some(docs) = state.collections.get_mut(collection) {
            docs.remove(&DocumentId::from(id));
        }
        state.notify(collection);
        Ok(())
    }
}
