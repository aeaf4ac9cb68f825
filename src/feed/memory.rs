//! In-process change-feed source.

use crate::error::{FeedError, Result};
use crate::types::{ChangeEvent, Expense, ExpenseId};
use crossbeam_channel::{bounded, Sender};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use super::source::ChangeFeedSource;
use super::types::{DropReason, FeedEvent, FeedSubscription, SubscriptionConfig, SubscriptionId};

/// A single write in a commit against the store.
#[derive(Clone, Debug)]
pub enum Write {
    /// Create or overwrite a document.
    Set(Expense),
    /// Delete a document by id. Deleting an absent id is a no-op that
    /// produces no event.
    Delete(ExpenseId),
}

/// Internal subscriber state.
struct Subscriber {
    collection: String,
    sender: Sender<FeedEvent>,
}

impl Subscriber {
    /// Try to send an event. Returns false if the buffer is full or the
    /// receiver is gone (subscriber will be dropped).
    fn try_send(&self, event: FeedEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(crossbeam_channel::TrySendError::Full(_)) => false,
            Err(crossbeam_channel::TrySendError::Disconnected(_)) => false,
        }
    }

    fn matches(&self, collection: &str) -> bool {
        self.collection == collection
    }
}

/// An in-memory document store with live change feeds.
///
/// Holds insertion-ordered documents per named collection. Every commit
/// (single write or multi-write) notifies matching subscribers with one
/// batch, in commit order. Serves tests and embedded use; a networked
/// source implements [`ChangeFeedSource`] the same way elsewhere.
///
/// Lock order is `collections` before `subscribers`, everywhere. Commits
/// hold the collection lock across the broadcast so a new subscriber can
/// neither miss a commit nor see it twice around its initial replay.
pub struct MemoryFeed {
    collections: RwLock<HashMap<String, Vec<Expense>>>,
    subscribers: RwLock<HashMap<SubscriptionId, Subscriber>>,
    next_id: AtomicU64,
}

impl MemoryFeed {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            subscribers: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of open subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.subscribers.read().len()
    }

    /// Current contents of a collection, in insertion order.
    pub fn documents(&self, collection: &str) -> Vec<Expense> {
        self.collections
            .read()
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    /// Create or overwrite a single document.
    pub fn set(&self, collection: &str, expense: Expense) {
        self.commit(collection, vec![Write::Set(expense)]);
    }

    /// Apply several writes atomically and notify subscribers with a single
    /// batch.
    pub fn commit(&self, collection: &str, writes: Vec<Write>) {
        let mut collections = self.collections.write();
        let docs = collections.entry(collection.to_string()).or_default();

        let mut events = Vec::with_capacity(writes.len());
        for write in writes {
            match write {
                Write::Set(expense) => {
                    match docs.iter().position(|e| e.id == expense.id) {
                        Some(index) => {
                            docs[index] = expense.clone();
                            events.push(ChangeEvent::Modified { expense });
                        }
                        None => {
                            docs.push(expense.clone());
                            events.push(ChangeEvent::Added { expense });
                        }
                    }
                }
                Write::Delete(id) => {
                    let before = docs.len();
                    docs.retain(|e| e.id != id);
                    if docs.len() < before {
                        events.push(ChangeEvent::Removed { id });
                    }
                }
            }
        }

        if !events.is_empty() {
            tracing::debug!(collection, count = events.len(), "committing batch");
            self.broadcast(collection, FeedEvent::Batch { events });
        }
    }

    /// Broadcast an event to subscribers of a collection, dropping any whose
    /// buffer is full.
    fn broadcast(&self, collection: &str, event: FeedEvent) {
        let mut to_remove = Vec::new();

        {
            let subs = self.subscribers.read();
            for (id, sub) in subs.iter() {
                if sub.matches(collection) && !sub.try_send(event.clone()) {
                    to_remove.push(*id);
                }
            }
        }

        if !to_remove.is_empty() {
            let mut subs = self.subscribers.write();
            for id in to_remove {
                if let Some(sub) = subs.remove(&id) {
                    // Best effort; the receiver may already be gone.
                    let _ = sub.sender.try_send(FeedEvent::Dropped {
                        reason: DropReason::BufferOverflow,
                    });
                }
            }
        }
    }
}

impl ChangeFeedSource for MemoryFeed {
    fn subscribe(&self, collection: &str, config: SubscriptionConfig) -> FeedSubscription {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let (sender, receiver) = bounded(config.buffer_size);

        let collections = self.collections.read();
        let mut subscribers = self.subscribers.write();

        if config.initial_snapshot {
            if let Some(docs) = collections.get(collection) {
                if !docs.is_empty() {
                    let events = docs
                        .iter()
                        .cloned()
                        .map(|expense| ChangeEvent::Added { expense })
                        .collect();
                    let _ = sender.try_send(FeedEvent::Batch { events });
                }
            }
        }
        let _ = sender.try_send(FeedEvent::CaughtUp);

        subscribers.insert(
            id,
            Subscriber {
                collection: collection.to_string(),
                sender,
            },
        );

        tracing::debug!(collection, id = id.0, "subscription opened");
        FeedSubscription { id, receiver }
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        let mut subs = self.subscribers.write();
        if let Some(sub) = subs.remove(&id) {
            let _ = sub.sender.try_send(FeedEvent::Dropped {
                reason: DropReason::Unsubscribed,
            });
            tracing::debug!(id = id.0, "subscription closed");
        }
    }

    fn delete(&self, collection: &str, id: &ExpenseId) -> Result<()> {
        let mut collections = self.collections.write();
        let docs = collections
            .get_mut(collection)
            .ok_or_else(|| FeedError::CollectionNotFound(collection.to_string()))?;

        let before = docs.len();
        docs.retain(|e| &e.id != id);
        if docs.len() == before {
            return Err(FeedError::DocumentNotFound(id.clone()));
        }

        self.broadcast(
            collection,
            FeedEvent::Batch {
                events: vec![ChangeEvent::Removed { id: id.clone() }],
            },
        );
        Ok(())
    }
}

impl Default for MemoryFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn expense(id: &str, name: &str, cost: f64) -> Expense {
        Expense::new(id, name, cost)
    }

    fn recv_batch(sub: &FeedSubscription) -> Vec<ChangeEvent> {
        match sub.recv_timeout(Duration::from_millis(100)).unwrap() {
            FeedEvent::Batch { events } => events,
            other => panic!("Expected Batch, got {:?}", other),
        }
    }

    #[test]
    fn test_subscribe_unsubscribe() {
        let feed = MemoryFeed::new();

        let sub = feed.subscribe("expenses", SubscriptionConfig::default());
        assert_eq!(feed.subscription_count(), 1);

        feed.unsubscribe(sub.id);
        assert_eq!(feed.subscription_count(), 0);
    }

    #[test]
    fn test_empty_collection_goes_straight_to_caught_up() {
        let feed = MemoryFeed::new();
        let sub = feed.subscribe("expenses", SubscriptionConfig::default());

        let event = sub.recv_timeout(Duration::from_millis(100)).unwrap();
        assert!(matches!(event, FeedEvent::CaughtUp));
    }

    #[test]
    fn test_initial_snapshot_replays_existing_documents() {
        let feed = MemoryFeed::new();
        feed.set("expenses", expense("a", "Rent", 1200.0));
        feed.set("expenses", expense("b", "Food", 400.0));

        let sub = feed.subscribe("expenses", SubscriptionConfig::default());

        let events = recv_batch(&sub);
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], ChangeEvent::Added { expense } if expense.id.as_str() == "a"));
        assert!(matches!(&events[1], ChangeEvent::Added { expense } if expense.id.as_str() == "b"));

        let event = sub.recv_timeout(Duration::from_millis(100)).unwrap();
        assert!(matches!(event, FeedEvent::CaughtUp));
    }

    #[test]
    fn test_no_initial_snapshot_when_disabled() {
        let feed = MemoryFeed::new();
        feed.set("expenses", expense("a", "Rent", 1200.0));

        let config = SubscriptionConfig {
            initial_snapshot: false,
            ..Default::default()
        };
        let sub = feed.subscribe("expenses", config);

        let event = sub.recv_timeout(Duration::from_millis(100)).unwrap();
        assert!(matches!(event, FeedEvent::CaughtUp));
    }

    #[test]
    fn test_set_broadcasts_added_then_modified() {
        let feed = MemoryFeed::new();
        let sub = feed.subscribe("expenses", SubscriptionConfig::default());
        sub.recv_timeout(Duration::from_millis(100)).unwrap(); // CaughtUp

        feed.set("expenses", expense("a", "Rent", 1200.0));
        let events = recv_batch(&sub);
        assert!(matches!(&events[0], ChangeEvent::Added { .. }));

        feed.set("expenses", expense("a", "Rent", 1300.0));
        let events = recv_batch(&sub);
        assert!(
            matches!(&events[0], ChangeEvent::Modified { expense } if expense.cost == 1300.0)
        );
    }

    #[test]
    fn test_commit_delivers_one_batch() {
        let feed = MemoryFeed::new();
        let sub = feed.subscribe("expenses", SubscriptionConfig::default());
        sub.recv_timeout(Duration::from_millis(100)).unwrap(); // CaughtUp

        feed.commit(
            "expenses",
            vec![
                Write::Set(expense("a", "Rent", 1200.0)),
                Write::Set(expense("b", "Food", 400.0)),
                Write::Delete(ExpenseId::new("a")),
            ],
        );

        let events = recv_batch(&sub);
        assert_eq!(events.len(), 3);
        assert!(matches!(&events[2], ChangeEvent::Removed { id } if id.as_str() == "a"));

        // No further events queued
        assert!(sub.recv_timeout(Duration::from_millis(50)).is_err());
    }

    #[test]
    fn test_delete_absent_write_is_silent() {
        let feed = MemoryFeed::new();
        let sub = feed.subscribe("expenses", SubscriptionConfig::default());
        sub.recv_timeout(Duration::from_millis(100)).unwrap(); // CaughtUp

        feed.commit("expenses", vec![Write::Delete(ExpenseId::new("ghost"))]);

        assert!(sub.recv_timeout(Duration::from_millis(50)).is_err());
    }

    #[test]
    fn test_delete_errors_on_unknown_document() {
        let feed = MemoryFeed::new();
        feed.set("expenses", expense("a", "Rent", 1200.0));

        let result = feed.delete("expenses", &ExpenseId::new("ghost"));
        assert!(matches!(result, Err(FeedError::DocumentNotFound(_))));

        let result = feed.delete("nonexistent", &ExpenseId::new("a"));
        assert!(matches!(result, Err(FeedError::CollectionNotFound(_))));
    }

    #[test]
    fn test_other_collections_do_not_leak() {
        let feed = MemoryFeed::new();
        let sub = feed.subscribe("expenses", SubscriptionConfig::default());
        sub.recv_timeout(Duration::from_millis(100)).unwrap(); // CaughtUp

        feed.set("income", expense("x", "Salary", 5000.0));

        assert!(sub.recv_timeout(Duration::from_millis(50)).is_err());
    }

    #[test]
    fn test_drop_slow_subscriber() {
        let feed = MemoryFeed::new();
        let config = SubscriptionConfig {
            buffer_size: 2,
            ..Default::default()
        };
        let _sub = feed.subscribe("expenses", config);

        // Flood without draining
        for i in 0..10 {
            feed.set("expenses", expense(&format!("e{}", i), "X", 1.0));
        }

        assert_eq!(feed.subscription_count(), 0);
    }

    #[test]
    fn test_unsubscribe_delivers_dropped() {
        let feed = MemoryFeed::new();
        let sub = feed.subscribe("expenses", SubscriptionConfig::default());
        sub.recv_timeout(Duration::from_millis(100)).unwrap(); // CaughtUp

        feed.unsubscribe(sub.id);

        let event = sub.recv_timeout(Duration::from_millis(100)).unwrap();
        assert!(matches!(
            event,
            FeedEvent::Dropped {
                reason: DropReason::Unsubscribed
            }
        ));
    }
}
