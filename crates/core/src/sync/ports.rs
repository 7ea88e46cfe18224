//! Port interfaces for the remote entry store

use async_trait::async_trait;
use echo_domain::constants::CREATED_AT_FIELD;
use echo_domain::{EntryId, JournalEntry, NewEntry, Result};

use crate::subscription::Subscription;

/// Sort direction of an ordered subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Scope and ordering of a live query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryQuery {
    /// Collection path, see `StoreConfig::collection_path`.
    pub collection: String,
    pub order_field: String,
    pub direction: SortDirection,
}

impl EntryQuery {
    /// Entries of `collection`, newest first.
    pub fn newest_first(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            order_field: CREATED_AT_FIELD.to_string(),
            direction: SortDirection::Descending,
        }
    }
}

/// One push from an ordered subscription: the full current result set, or
/// the error that ended the listener.
pub type StoreNotification = Result<Vec<JournalEntry>>;

/// Append-only remote document store.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Append `entry` to `collection`. The store stamps the creation time.
    async fn append(&self, collection: &str, entry: NewEntry) -> Result<EntryId>;

    /// Live ordered view of a collection.
    ///
    /// The first item is the current snapshot; later items follow every
    /// change. An `Err` item ends the stream.
    fn subscribe_ordered(&self, query: EntryQuery) -> Subscription<StoreNotification>;
}
