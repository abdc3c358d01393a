//! Lyric entry data model.
//!
//! An entry is one line of lyric text with an optional timestamp. Identity is
//! an opaque id assigned at creation and never recomputed from text, so that
//! renaming a line does not change which line it is.

use std::time::Duration;

/// Opaque, session-unique identifier for a lyric entry.
///
/// Ids are allocated from a monotonic counter and never reused, including
/// across reconciliation passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

impl EntryId {
    /// Raw numeric value, for logging and UI keys.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One line of lyric text with an optional timestamp.
///
/// `timestamp` is `None` until the line has been synced. `Duration` cannot
/// represent a negative value, so the non-negativity invariant holds by
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricEntry {
    pub id: EntryId,
    pub text: String,
    pub timestamp: Option<Duration>,
}

impl LyricEntry {
    /// Create an entry with the given id and trimmed text, unsynced.
    #[must_use]
    pub fn new(id: EntryId, text: &str) -> Self {
        Self {
            id,
            text: text.trim().to_string(),
            timestamp: None,
        }
    }

    /// Create an entry with a timestamp already set (capture workflow).
    #[must_use]
    pub fn new_synced(id: EntryId, text: &str, timestamp: Duration) -> Self {
        Self {
            id,
            text: text.trim().to_string(),
            timestamp: Some(timestamp),
        }
    }

    /// Whether this entry has a timestamp.
    #[must_use]
    pub const fn is_synced(&self) -> bool {
        self.timestamp.is_some()
    }
}

/// Monotonic id allocator. Owned by the store; never resets within a session
/// so ids stay unique even after `clear_all`.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    pub fn allocate(&mut self) -> EntryId {
        let id = EntryId(self.next);
        self.next += 1;
        id
    }
}
