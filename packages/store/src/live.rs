//! Live queries: standing subscriptions that yield full snapshots.
//!
//! [`LiveQuery`] is a lazy, restartable sequence of snapshot events for a single
//! query. The first call to [`LiveQuery::next`] yields the result set as it was
//! when the subscription was registered; every later call waits for the backend
//! to push a new one. Delivery goes through a `tokio::sync::watch` channel, so a
//! reader that falls behind only ever sees the latest snapshot.
//!
//! [`ListenerRegistration`] is the cancellation handle. Removing it tears the
//! server-side listener down; dropping it without removing does the same.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use tokio::sync::watch;

use crate::error::StoreError;
use crate::query::{Query, RawDocument, Snapshot};

type CancelFn = Box<dyn FnOnce() + Send + Sync>;

/// Handle that cancels one listener. Cancels at most once.
pub struct ListenerRegistration {
    cancel: Option<CancelFn>,
}

impl ListenerRegistration {
    pub fn new(cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Stop listening. Takes effect immediately.
    pub fn remove(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for ListenerRegistration {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl fmt::Debug for ListenerRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistration")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Stream of snapshots for one query, decoded as `T`.
pub struct LiveQuery<T> {
    query: Query,
    rx: watch::Receiver<Vec<RawDocument>>,
    primed: bool,
    registration: ListenerRegistration,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> LiveQuery<T> {
    pub fn new(
        query: Query,
        rx: watch::Receiver<Vec<RawDocument>>,
        registration: ListenerRegistration,
    ) -> Self {
        Self {
            query,
            rx,
            primed: false,
            registration,
            _marker: PhantomData,
        }
    }

    /// Wait for the next snapshot. `None` once the listener has been cancelled.
    ///
    /// Cancel-safe: dropping the future loses no snapshot.
    pub async fn next(&mut self) -> Option<Result<Snapshot<T>, StoreError>> {
        if self.primed {
            if self.rx.changed().await.is_err() {
                return None;
            }
        } else {
            self.primed = true;
        }
        let raw = self.rx.borrow_and_update().clone();
        Some(Snapshot::decode(&raw))
    }

    /// Cancel the underlying listener.
    pub fn cancel(self) {
        self.registration.remove();
    }
}

impl<T> fmt::Debug for LiveQuery<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveQuery")
            .field("query", &self.query)
            .field("registration", &self.registration)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_remove_cancels_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let reg = ListenerRegistration::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        reg.remove();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_cancels() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        {
            let _reg = ListenerRegistration::new(move || {
                c.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_first_next_yields_initial_result_set() {
        let (tx, rx) = watch::channel(Vec::new());
        let query = Query::field_equals("goals", "createdBy", "u1");
        let mut live: LiveQuery<crate::Goal> =
            LiveQuery::new(query, rx, ListenerRegistration::new(|| {}));

        let first = live.next().await.unwrap().unwrap();
        assert!(first.is_empty());

        drop(tx);
        assert!(live.next().await.is_none());
    }
}
