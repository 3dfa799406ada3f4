//! # Goal history: a live, merged list of inactive goals
//!
//! [`GoalHistory`] keeps two standing queries against the inactive-goals
//! collection and mirrors their results for rendering:
//!
//! | Feed | Predicate |
//! |------|-----------|
//! | [`GoalFeed::Created`] | `createdBy == <uid>` |
//! | [`GoalFeed::Shared`] | `sharingEmails array-contains <email>` |
//!
//! Each notification is the feed's complete result set, so applying one
//! *replaces* that feed's documents. The rendered list is the union of both
//! feeds keyed by document id: a goal that matches both predicates, or that is
//! re-delivered any number of times, appears exactly once.
//!
//! ## Lifecycle
//!
//! - [`mount`](GoalHistory::mount) registers both subscriptions. Mounting an
//!   already-mounted controller changes nothing.
//! - [`pump`](GoalHistory::pump) waits for the next snapshot from either feed
//!   and applies it. [`is_loaded`](GoalHistory::is_loaded) turns true once both
//!   feeds have answered, so the placeholder is not shown before that. A snapshot that fails to decode is logged and dropped; the
//!   feed keeps its previous documents.
//! - [`on_focus`](GoalHistory::on_focus) leaves the subscriptions alone unless
//!   `goal_history.refresh_on_focus` is set, in which case both are cancelled
//!   and registered again.
//! - [`unmount`](GoalHistory::unmount) cancels both subscriptions exactly once.
//!   Dropping a mounted controller unmounts it.

use std::collections::{BTreeMap, HashSet};

use api::AuthUser;
use dioxus::prelude::*;
use store::{AppConfig, Document, DocumentId, DocumentStore, Goal, LiveQuery, Query, Snapshot, StoreError};

/// Text shown when neither feed has any goal.
pub const NO_GOALS_MESSAGE: &str = "No Past Goals yet";

/// One of the two standing queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GoalFeed {
    Created,
    Shared,
}

/// One rendered row.
#[derive(Clone, Debug, PartialEq)]
pub struct GoalRow {
    pub id: DocumentId,
    pub title: String,
    pub amount: f64,
    /// Created by someone else and shared with the current user.
    pub shared_with_me: bool,
}

/// What the screen shows.
#[derive(Clone, Debug, PartialEq)]
pub enum GoalHistoryRender {
    Empty { message: &'static str },
    Rows(Vec<GoalRow>),
}

struct LiveFeeds {
    created: LiveQuery<Goal>,
    shared: LiveQuery<Goal>,
}

impl LiveFeeds {
    fn cancel(self) {
        self.created.cancel();
        self.shared.cancel();
    }
}

/// Controller for the goal history screen.
pub struct GoalHistory<S: DocumentStore> {
    store: S,
    user: AuthUser,
    config: AppConfig,
    feeds: Option<LiveFeeds>,
    created: BTreeMap<DocumentId, Goal>,
    shared: BTreeMap<DocumentId, Goal>,
    /// Feeds that delivered since the last mount.
    delivered: HashSet<GoalFeed>,
}

impl<S: DocumentStore> GoalHistory<S> {
    pub fn new(store: S, user: AuthUser, config: AppConfig) -> Self {
        Self {
            store,
            user,
            config,
            feeds: None,
            created: BTreeMap::new(),
            shared: BTreeMap::new(),
            delivered: HashSet::new(),
        }
    }

    fn query(&self, feed: GoalFeed) -> Query {
        let collection = self.config.collections.inactive_goals.as_str();
        match feed {
            GoalFeed::Created => Query::field_equals(collection, "createdBy", &self.user.uid),
            GoalFeed::Shared => Query::array_contains(collection, "sharingEmails", &self.user.email),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.feeds.is_some()
    }

    /// Register both subscriptions.
    pub fn mount(&mut self) -> Result<(), StoreError> {
        if self.feeds.is_some() {
            return Ok(());
        }
        let created = self.store.subscribe(&self.query(GoalFeed::Created))?;
        let shared = self.store.subscribe(&self.query(GoalFeed::Shared))?;
        self.feeds = Some(LiveFeeds { created, shared });
        self.delivered.clear();
        tracing::debug!(uid = %self.user.uid, "goal history mounted");
        Ok(())
    }

    /// Cancel both subscriptions. No-op when not mounted.
    pub fn unmount(&mut self) {
        if let Some(feeds) = self.feeds.take() {
            feeds.cancel();
            tracing::debug!(uid = %self.user.uid, "goal history unmounted");
        }
    }

    /// The screen regained focus.
    pub fn on_focus(&mut self) -> Result<(), StoreError> {
        if !self.config.goal_history.refresh_on_focus || !self.is_mounted() {
            return Ok(());
        }
        tracing::debug!("refreshing goal history subscriptions");
        self.unmount();
        self.mount()
    }

    /// Both feeds have answered at least once since mounting.
    pub fn is_loaded(&self) -> bool {
        self.delivered.contains(&GoalFeed::Created) && self.delivered.contains(&GoalFeed::Shared)
    }

    /// Replace one feed's documents with a freshly delivered snapshot.
    pub fn apply(&mut self, feed: GoalFeed, event: Result<Snapshot<Goal>, StoreError>) {
        self.delivered.insert(feed);
        match event {
            Ok(snapshot) => {
                let docs: BTreeMap<DocumentId, Goal> = snapshot
                    .documents
                    .into_iter()
                    .map(|doc| (doc.id, doc.data))
                    .collect();
                match feed {
                    GoalFeed::Created => self.created = docs,
                    GoalFeed::Shared => self.shared = docs,
                }
            }
            Err(e) => tracing::warn!(?feed, "dropping goal snapshot: {e}"),
        }
    }

    /// Wait for the next snapshot from either feed and apply it.
    ///
    /// Returns `false` once no feed is live. Cancel-safe.
    pub async fn pump(&mut self) -> bool {
        let Some(feeds) = self.feeds.as_mut() else {
            return false;
        };
        let (feed, event) = tokio::select! {
            Some(event) = feeds.created.next() => (GoalFeed::Created, event),
            Some(event) = feeds.shared.next() => (GoalFeed::Shared, event),
            else => return false,
        };
        self.apply(feed, event);
        true
    }

    /// Goals from both feeds, each id once, ordered by id.
    pub fn goals(&self) -> Vec<Document<Goal>> {
        let mut merged: BTreeMap<&DocumentId, &Goal> = self.created.iter().collect();
        for (id, goal) in &self.shared {
            merged.entry(id).or_insert(goal);
        }
        merged
            .into_iter()
            .map(|(id, goal)| Document {
                id: id.clone(),
                data: goal.clone(),
            })
            .collect()
    }

    pub fn render(&self) -> GoalHistoryRender {
        let goals = self.goals();
        if goals.is_empty() {
            return GoalHistoryRender::Empty {
                message: NO_GOALS_MESSAGE,
            };
        }
        GoalHistoryRender::Rows(
            goals
                .into_iter()
                .map(|doc| GoalRow {
                    shared_with_me: doc.data.created_by != self.user.uid,
                    id: doc.id,
                    title: doc.data.title,
                    amount: doc.data.amount,
                })
                .collect(),
        )
    }
}

impl<S: DocumentStore> Drop for GoalHistory<S> {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Renders a [`GoalHistoryRender`]: one row per goal or the placeholder.
#[component]
pub fn GoalList(render: GoalHistoryRender) -> Element {
    match render {
        GoalHistoryRender::Empty { message } => rsx! {
            p { class: "goal-list-empty", "{message}" }
        },
        GoalHistoryRender::Rows(rows) => rsx! {
            ul {
                class: "goal-list",
                for row in rows {
                    GoalRowItem { key: "{row.id}", row: row.clone() }
                }
            }
        },
    }
}

#[component]
fn GoalRowItem(row: GoalRow) -> Element {
    let class = if row.shared_with_me {
        "goal-row goal-row--shared"
    } else {
        "goal-row"
    };
    let amount = format!("${:.2}", row.amount);

    rsx! {
        li {
            class: "{class}",
            span { class: "goal-row-title", "{row.title}" }
            span { class: "goal-row-amount", "{amount}" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use store::MemoryStore;

    const GOALS: &str = "inactive goals";

    fn me() -> AuthUser {
        AuthUser {
            uid: "uid-me".into(),
            email: "me@example.com".into(),
            display_name: Some("Me".into()),
            photo_url: None,
        }
    }

    fn doc(id: &str, goal: Goal) -> Document<Goal> {
        Document {
            id: id.into(),
            data: goal,
        }
    }

    fn snapshot(docs: Vec<Document<Goal>>) -> Result<Snapshot<Goal>, StoreError> {
        Ok(Snapshot { documents: docs })
    }

    /// Apply every pending notification.
    async fn settle(history: &mut GoalHistory<MemoryStore>) {
        while let Ok(true) = tokio::time::timeout(Duration::from_millis(20), history.pump()).await {}
    }

    fn row_ids(render: &GoalHistoryRender) -> Vec<&str> {
        match render {
            GoalHistoryRender::Empty { .. } => Vec::new(),
            GoalHistoryRender::Rows(rows) => rows.iter().map(|r| r.id.as_str()).collect(),
        }
    }

    #[test]
    fn test_empty_renders_placeholder_only() {
        let history = GoalHistory::new(MemoryStore::new(), me(), AppConfig::default());
        assert_eq!(
            history.render(),
            GoalHistoryRender::Empty {
                message: "No Past Goals yet"
            }
        );
    }

    #[test]
    fn test_repeated_delivery_is_idempotent() {
        let mut history = GoalHistory::new(MemoryStore::new(), me(), AppConfig::default());
        let mine = doc("g1", Goal::new("uid-me", "Bike", 200.0));

        for _ in 0..5 {
            history.apply(GoalFeed::Created, snapshot(vec![mine.clone()]));
        }
        assert_eq!(row_ids(&history.render()), vec!["g1"]);
    }

    #[test]
    fn test_snapshot_replaces_previous_result_set() {
        let mut history = GoalHistory::new(MemoryStore::new(), me(), AppConfig::default());
        history.apply(
            GoalFeed::Created,
            snapshot(vec![
                doc("g1", Goal::new("uid-me", "A", 1.0)),
                doc("g2", Goal::new("uid-me", "B", 1.0)),
            ]),
        );
        history.apply(
            GoalFeed::Created,
            snapshot(vec![doc("g2", Goal::new("uid-me", "B", 1.0))]),
        );
        assert_eq!(row_ids(&history.render()), vec!["g2"]);
    }

    #[test]
    fn test_one_goal_per_feed_renders_two_rows() {
        let mut history = GoalHistory::new(MemoryStore::new(), me(), AppConfig::default());
        history.apply(
            GoalFeed::Created,
            snapshot(vec![doc("mine", Goal::new("uid-me", "Mine", 10.0))]),
        );
        history.apply(
            GoalFeed::Shared,
            snapshot(vec![doc(
                "theirs",
                Goal::new("uid-them", "Theirs", 20.0).shared_with("me@example.com"),
            )]),
        );

        let GoalHistoryRender::Rows(rows) = history.render() else {
            panic!("expected rows");
        };
        assert_eq!(rows.len(), 2);
        let mine = rows.iter().find(|r| r.id.as_str() == "mine").unwrap();
        let theirs = rows.iter().find(|r| r.id.as_str() == "theirs").unwrap();
        assert!(!mine.shared_with_me);
        assert!(theirs.shared_with_me);
    }

    #[test]
    fn test_goal_in_both_feeds_appears_once() {
        let mut history = GoalHistory::new(MemoryStore::new(), me(), AppConfig::default());
        let both = doc(
            "g1",
            Goal::new("uid-me", "Both", 5.0).shared_with("me@example.com"),
        );
        history.apply(GoalFeed::Created, snapshot(vec![both.clone()]));
        history.apply(GoalFeed::Shared, snapshot(vec![both]));
        assert_eq!(history.goals().len(), 1);

        // Leaving one feed keeps the goal while the other still matches.
        history.apply(GoalFeed::Created, snapshot(vec![]));
        assert_eq!(row_ids(&history.render()), vec!["g1"]);
    }

    #[test]
    fn test_listener_error_keeps_previous_state() {
        let mut history = GoalHistory::new(MemoryStore::new(), me(), AppConfig::default());
        history.apply(
            GoalFeed::Shared,
            snapshot(vec![doc("g1", Goal::new("uid-x", "A", 1.0))]),
        );
        history.apply(
            GoalFeed::Shared,
            Err(StoreError::Unavailable("listener failed".into())),
        );
        assert_eq!(row_ids(&history.render()), vec!["g1"]);
    }

    #[tokio::test]
    async fn test_live_updates_from_store() {
        let store = MemoryStore::new();
        store
            .set_document(GOALS, "old", &Goal::new("uid-me", "Old", 1.0))
            .await
            .unwrap();

        let mut history = GoalHistory::new(store.clone(), me(), AppConfig::default());
        history.mount().unwrap();
        settle(&mut history).await;
        assert_eq!(row_ids(&history.render()), vec!["old"]);

        store
            .set_document(
                GOALS,
                "shared",
                &Goal::new("uid-them", "Shared", 2.0).shared_with("me@example.com"),
            )
            .await
            .unwrap();
        store
            .set_document(GOALS, "other", &Goal::new("uid-them", "Not mine", 3.0))
            .await
            .unwrap();
        settle(&mut history).await;
        assert_eq!(row_ids(&history.render()), vec!["old", "shared"]);

        // Re-writing the same goals many times never duplicates rows.
        for _ in 0..3 {
            store
                .set_document(GOALS, "old", &Goal::new("uid-me", "Old", 1.0).shared_with("me@example.com"))
                .await
                .unwrap();
            settle(&mut history).await;
        }
        assert_eq!(row_ids(&history.render()), vec!["old", "shared"]);
    }

    #[tokio::test]
    async fn test_loaded_once_both_feeds_answer() {
        let store = MemoryStore::new();
        let mut history = GoalHistory::new(store.clone(), me(), AppConfig::default());
        history.mount().unwrap();
        assert!(!history.is_loaded());

        assert!(history.pump().await);
        assert!(!history.is_loaded());
        assert!(history.pump().await);
        assert!(history.is_loaded());
        assert_eq!(history.render(), GoalHistoryRender::Empty { message: NO_GOALS_MESSAGE });

        // A failed snapshot still counts as an answer.
        let mut failing = GoalHistory::new(store, me(), AppConfig::default());
        failing.apply(GoalFeed::Created, snapshot(vec![]));
        failing.apply(GoalFeed::Shared, Err(StoreError::Unavailable("offline".into())));
        assert!(failing.is_loaded());
    }

    #[tokio::test]
    async fn test_remount_waits_for_fresh_snapshots() {
        let config = AppConfig::default().with_refresh_on_focus(true);
        let mut history = GoalHistory::new(MemoryStore::new(), me(), config);
        history.mount().unwrap();
        settle(&mut history).await;
        assert!(history.is_loaded());

        history.on_focus().unwrap();
        assert!(!history.is_loaded());
        settle(&mut history).await;
        assert!(history.is_loaded());
    }

    #[tokio::test]
    async fn test_unmount_cancels_each_subscription_once() {
        let store = MemoryStore::new();
        let mut history = GoalHistory::new(store.clone(), me(), AppConfig::default());
        history.mount().unwrap();
        history.mount().unwrap();
        assert_eq!(store.active_listeners(), 2);

        history.unmount();
        assert_eq!(store.active_listeners(), 0);
        assert_eq!(store.cancelled_listeners(), 2);

        history.unmount();
        drop(history);
        assert_eq!(store.cancelled_listeners(), 2);
        assert!(!GoalHistory::new(store, me(), AppConfig::default()).is_mounted());
    }

    #[tokio::test]
    async fn test_drop_unmounts() {
        let store = MemoryStore::new();
        {
            let mut history = GoalHistory::new(store.clone(), me(), AppConfig::default());
            history.mount().unwrap();
        }
        assert_eq!(store.active_listeners(), 0);
        assert_eq!(store.cancelled_listeners(), 2);
    }

    #[tokio::test]
    async fn test_pump_after_unmount_returns_false() {
        let mut history = GoalHistory::new(MemoryStore::new(), me(), AppConfig::default());
        assert!(!history.pump().await);
        history.mount().unwrap();
        history.unmount();
        assert!(!history.pump().await);
    }

    #[tokio::test]
    async fn test_focus_leaves_subscriptions_running_by_default() {
        let store = MemoryStore::new();
        let mut history = GoalHistory::new(store.clone(), me(), AppConfig::default());
        history.mount().unwrap();

        history.on_focus().unwrap();
        assert_eq!(store.active_listeners(), 2);
        assert_eq!(store.cancelled_listeners(), 0);
    }

    #[tokio::test]
    async fn test_focus_resubscribes_when_configured() {
        let store = MemoryStore::new();
        store
            .set_document(GOALS, "g1", &Goal::new("uid-me", "A", 1.0))
            .await
            .unwrap();
        let config = AppConfig::default().with_refresh_on_focus(true);
        let mut history = GoalHistory::new(store.clone(), me(), config);
        history.mount().unwrap();
        settle(&mut history).await;

        history.on_focus().unwrap();
        assert_eq!(store.active_listeners(), 2);
        assert_eq!(store.cancelled_listeners(), 2);

        // The fresh subscriptions deliver the current result set again.
        settle(&mut history).await;
        assert_eq!(row_ids(&history.render()), vec!["g1"]);

        history.unmount();
        assert_eq!(store.cancelled_listeners(), 4);
    }

    #[tokio::test]
    async fn test_focus_before_mount_does_not_subscribe() {
        let store = MemoryStore::new();
        let config = AppConfig::default().with_refresh_on_focus(true);
        let mut history = GoalHistory::new(store.clone(), me(), config);
        history.on_focus().unwrap();
        assert_eq!(store.active_listeners(), 0);
    }
}
