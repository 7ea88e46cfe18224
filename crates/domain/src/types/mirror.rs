//! Local mirror of the signed-in user's entries

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::entry::JournalEntry;

/// Entries ordered newest first.
///
/// Entries whose server timestamp is still pending sort ahead of every
/// stamped entry. Equal timestamps keep the order the store delivered them
/// in. A mirror is never patched in place; every store notification builds
/// a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mirror {
    entries: Vec<JournalEntry>,
}

impl Mirror {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_snapshot(mut entries: Vec<JournalEntry>) -> Self {
        // sort_by is stable, so delivery order survives for ties
        entries.sort_by(newest_first);
        Self { entries }
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_ordered(&self) -> bool {
        self.entries.windows(2).all(|pair| newest_first(&pair[0], &pair[1]) != Ordering::Greater)
    }

    pub fn into_entries(self) -> Vec<JournalEntry> {
        self.entries
    }
}

fn newest_first(a: &JournalEntry, b: &JournalEntry) -> Ordering {
    match (a.created_at, b.created_at) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(left), Some(right)) => right.cmp(&left),
    }
}
