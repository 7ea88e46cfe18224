//! Live synchronization of the signed-in user's entries

pub mod ports;
pub mod synchronizer;

pub use ports::{EntryQuery, EntryStore, SortDirection, StoreNotification};
pub use synchronizer::CollectionSynchronizer;
