//! Mock entry store

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use echo_core::subscription::{self, Subscription, SubscriptionSink};
use echo_core::{EntryQuery, EntryStore, StoreNotification};
use echo_domain::{EntryId, JournalEntry, JournalError, NewEntry, Result};
use parking_lot::Mutex;

/// In-memory append-only store that pushes every change to its listeners.
///
/// Timestamps come from a fixed base clock advanced one second per append,
/// so ordering assertions are deterministic.
#[derive(Default)]
pub struct MockEntryStore {
    docs: Mutex<Vec<(String, JournalEntry)>>,
    listeners: Mutex<Vec<(String, SubscriptionSink<StoreNotification>)>>,
    fail_appends: AtomicBool,
}

impl MockEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_appends(&self, fail: bool) {
        self.fail_appends.store(fail, Ordering::SeqCst);
    }

    pub fn appended(&self) -> Vec<(String, JournalEntry)> {
        self.docs.lock().clone()
    }

    pub fn live_listeners(&self) -> usize {
        self.listeners.lock().iter().filter(|(_, sink)| !sink.is_closed()).count()
    }

    pub fn total_subscriptions(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Push an error to every listener of `collection`.
    pub fn fail_listeners(&self, collection: &str, message: &str) {
        for (scope, sink) in self.listeners.lock().iter() {
            if scope == collection {
                sink.emit(Err(JournalError::Subscription(message.to_string())));
            }
        }
    }

    fn snapshot(&self, collection: &str) -> Vec<JournalEntry> {
        let mut entries: Vec<JournalEntry> = self
            .docs
            .lock()
            .iter()
            .filter(|(scope, _)| scope == collection)
            .map(|(_, entry)| entry.clone())
            .collect();
        entries.reverse();
        entries
    }

    fn notify(&self, collection: &str) {
        let snapshot = self.snapshot(collection);
        self.listeners
            .lock()
            .retain(|(scope, sink)| scope != collection || sink.emit(Ok(snapshot.clone())));
    }
}

#[async_trait]
impl EntryStore for MockEntryStore {
    async fn append(&self, collection: &str, entry: NewEntry) -> Result<EntryId> {
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(JournalError::Persistence("write rejected".into()));
        }
        let id = {
            let mut docs = self.docs.lock();
            let seq = docs.len() as i64;
            let base = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).single();
            let id = EntryId::new(format!("doc-{seq}"));
            docs.push((
                collection.to_string(),
                JournalEntry {
                    id: id.clone(),
                    author_id: entry.author_id,
                    text: entry.text,
                    created_at: base.map(|b| b + Duration::seconds(seq)),
                },
            ));
            id
        };
        self.notify(collection);
        Ok(id)
    }

    fn subscribe_ordered(&self, query: EntryQuery) -> Subscription<StoreNotification> {
        let (sink, subscription) = subscription::channel();
        sink.emit(Ok(self.snapshot(&query.collection)));
        self.listeners.lock().push((query.collection, sink));
        subscription
    }
}
