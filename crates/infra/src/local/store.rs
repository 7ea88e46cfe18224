use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use echo_core::subscription::{self, Subscription, SubscriptionSink};
use echo_core::{EntryQuery, EntryStore, SortDirection, StoreNotification};
use echo_domain::{EntryId, JournalEntry, JournalError, NewEntry, Result};
use parking_lot::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

struct Listener {
    query: EntryQuery,
    sink: SubscriptionSink<StoreNotification>,
}

/// Append-only entry store held in memory.
///
/// Appends are stamped with the current UTC time and pushed as full ordered
/// snapshots to every live listener of the same collection.
#[derive(Default)]
pub struct InMemoryEntryStore {
    collections: Mutex<HashMap<String, Vec<JournalEntry>>>,
    listeners: Mutex<Vec<Listener>>,
    reject_appends: AtomicBool,
}

impl InMemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following append fail until reset.
    pub fn reject_appends(&self, reject: bool) {
        self.reject_appends.store(reject, Ordering::SeqCst);
    }

    /// End every listener of `collection` with a subscription error.
    pub fn fail_listeners(&self, collection: &str, message: &str) {
        let mut listeners = self.listeners.lock();
        listeners.retain(|listener| {
            if listener.query.collection != collection {
                return true;
            }
            listener.sink.emit(Err(JournalError::Subscription(message.to_string())));
            false
        });
    }

    /// Number of listeners that have not been cancelled.
    pub fn live_listeners(&self) -> usize {
        let mut listeners = self.listeners.lock();
        listeners.retain(|listener| !listener.sink.is_closed());
        listeners.len()
    }

    /// Entries of `collection` in insertion order.
    pub fn entries(&self, collection: &str) -> Vec<JournalEntry> {
        self.collections.lock().get(collection).cloned().unwrap_or_default()
    }

    fn snapshot(&self, query: &EntryQuery) -> Vec<JournalEntry> {
        let mut entries = self.entries(&query.collection);
        // Insertion order already matches timestamp order.
        if query.direction == SortDirection::Descending {
            entries.reverse();
        }
        entries
    }

    fn notify(&self, collection: &str) {
        let mut listeners = self.listeners.lock();
        listeners.retain(|listener| {
            if listener.query.collection != collection {
                return !listener.sink.is_closed();
            }
            listener.sink.emit(Ok(self.snapshot(&listener.query)))
        });
        debug!(collection, listeners = listeners.len(), "store snapshot pushed");
    }
}

#[async_trait]
impl EntryStore for InMemoryEntryStore {
    async fn append(&self, collection: &str, entry: NewEntry) -> Result<EntryId> {
        if self.reject_appends.load(Ordering::SeqCst) {
            warn!(collection, "append rejected");
            return Err(JournalError::Persistence("permission denied".into()));
        }

        let id = EntryId::new(Uuid::now_v7().to_string());
        let stored = JournalEntry {
            id: id.clone(),
            author_id: entry.author_id,
            text: entry.text,
            created_at: Some(Utc::now()),
        };
        self.collections.lock().entry(collection.to_string()).or_default().push(stored);
        debug!(collection, entry_id = %id.as_str(), "entry appended");

        self.notify(collection);
        Ok(id)
    }

    fn subscribe_ordered(&self, query: EntryQuery) -> Subscription<StoreNotification> {
        let (sink, subscription) = subscription::channel();
        sink.emit(Ok(self.snapshot(&query)));
        self.listeners.lock().push(Listener { query, sink });
        subscription
    }
}
