//! Ordered, in-memory store of lyric entries.
//!
//! The store owns creation, mutation, and deletion of entries, plus the id
//! allocator that keeps identities session-unique. Mutations referencing an
//! unknown id are silent no-ops (a stale UI callback must never be fatal);
//! they are logged at debug level for diagnostics.

use crate::entry::{EntryId, IdAllocator, LyricEntry};
use crate::reconcile;
use crate::time::offset_by_millis;
use crate::view::SyncCounts;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Default)]
pub struct EntryStore {
    entries: Vec<LyricEntry>,
    ids: IdAllocator,
}

impl EntryStore {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            ids: IdAllocator::new(),
        }
    }

    /// The ordered entry collection.
    #[must_use]
    pub fn entries(&self) -> &[LyricEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: EntryId) -> Option<&LyricEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    #[must_use]
    pub fn counts(&self) -> SyncCounts {
        SyncCounts::of(&self.entries)
    }

    /// Append a new unsynced entry (freeform population path).
    pub fn push_line(&mut self, text: &str) -> EntryId {
        let entry = LyricEntry::new(self.ids.allocate(), text);
        let id = entry.id;
        self.entries.push(entry);
        id
    }

    /// Append a new entry with a timestamp captured at the current cursor
    /// (capture-while-playing path).
    pub fn push_line_at(&mut self, text: &str, timestamp: Duration) -> EntryId {
        let entry = LyricEntry::new_synced(self.ids.allocate(), text, timestamp);
        let id = entry.id;
        self.entries.push(entry);
        id
    }

    /// Set or clear an entry's timestamp. Returns whether an entry matched.
    pub fn set_timestamp(&mut self, id: EntryId, timestamp: Option<Duration>) -> bool {
        let Some(entry) = self.entry_mut(id) else {
            return false;
        };
        entry.timestamp = timestamp;
        true
    }

    /// Replace an entry's text, preserving its id and timestamp.
    pub fn edit_text(&mut self, id: EntryId, new_text: &str) -> bool {
        let Some(entry) = self.entry_mut(id) else {
            return false;
        };
        entry.text = new_text.trim().to_string();
        true
    }

    /// Nudge an entry's timestamp by a signed millisecond delta, flooring at
    /// zero. Adjusting an untimed line is undefined, so an unset timestamp is
    /// left unset rather than silently assigned one.
    pub fn adjust_timestamp(&mut self, id: EntryId, delta_ms: i64) -> bool {
        let Some(entry) = self.entry_mut(id) else {
            return false;
        };
        let Some(current) = entry.timestamp else {
            debug!("Ignoring nudge on unsynced entry {id}");
            return false;
        };
        entry.timestamp = Some(offset_by_millis(current, delta_ms));
        true
    }

    /// Assign `position` to the first unsynced entry in display order.
    pub fn sync_next_unsynced(&mut self, position: Duration) -> Option<EntryId> {
        let entry = self.entries.iter_mut().find(|e| !e.is_synced())?;
        entry.timestamp = Some(position);
        Some(entry.id)
    }

    /// Remove the timestamp from the last synced entry in display order.
    pub fn clear_last_synced(&mut self) -> Option<EntryId> {
        let entry = self.entries.iter_mut().rev().find(|e| e.is_synced())?;
        entry.timestamp = None;
        Some(entry.id)
    }

    /// Clear every entry's timestamp without reordering or deleting entries.
    pub fn reset_all_timestamps(&mut self) {
        for entry in &mut self.entries {
            entry.timestamp = None;
        }
    }

    /// Empty the collection. The id allocator is not reset, so ids stay
    /// unique across the whole session.
    pub fn clear_all(&mut self) {
        self.entries.clear();
    }

    /// Wholesale-replace the collection from a free-text draft, preserving
    /// the identity and timestamp of lines whose text is unchanged.
    pub fn apply_draft(&mut self, draft: &str) {
        self.entries = reconcile::reconcile(&self.entries, draft, &mut self.ids);
    }

    /// All entry texts joined with newlines, for rebuilding the draft block
    /// after an in-place line edit.
    #[must_use]
    pub fn joined_text(&self) -> String {
        self.entries
            .iter()
            .map(|e| e.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn entry_mut(&mut self, id: EntryId) -> Option<&mut LyricEntry> {
        let found = self.entries.iter_mut().find(|e| e.id == id);
        if found.is_none() {
            debug!("Ignoring mutation for unknown entry {id}");
        }
        found
    }
}
