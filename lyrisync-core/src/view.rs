//! Derived views over the entry collection, partitioned by sync state.

use crate::entry::LyricEntry;
use serde::{Deserialize, Serialize};

/// Which subset of entries is displayed.
///
/// Pure UI state; never stored in the entry model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    #[default]
    All,
    Unsynced,
    Synced,
}

impl FilterMode {
    /// Stable string identifier for UI state and logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Unsynced => "unsynced",
            Self::Synced => "synced",
        }
    }

    /// Whether an entry belongs to this view.
    #[must_use]
    pub const fn matches(&self, entry: &LyricEntry) -> bool {
        match self {
            Self::All => true,
            Self::Unsynced => entry.timestamp.is_none(),
            Self::Synced => entry.timestamp.is_some(),
        }
    }
}

impl std::fmt::Display for FilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cardinalities of the three views, for display next to the filter buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncCounts {
    pub total: usize,
    pub synced: usize,
    pub unsynced: usize,
}

impl SyncCounts {
    /// Count entries by sync state in a single pass.
    #[must_use]
    pub fn of(entries: &[LyricEntry]) -> Self {
        let synced = entries.iter().filter(|e| e.is_synced()).count();
        Self {
            total: entries.len(),
            synced,
            unsynced: entries.len() - synced,
        }
    }

    /// Whether every entry has a timestamp (the export precondition).
    #[must_use]
    pub const fn is_fully_synced(&self) -> bool {
        self.unsynced == 0
    }
}

/// Filter entries by mode, preserving collection order.
#[must_use]
pub fn filter_entries<'a>(entries: &'a [LyricEntry], mode: FilterMode) -> Vec<&'a LyricEntry> {
    entries.iter().filter(|e| mode.matches(e)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::IdAllocator;
    use std::time::Duration;

    fn sample_entries() -> Vec<LyricEntry> {
        let mut ids = IdAllocator::new();
        vec![
            LyricEntry::new_synced(ids.allocate(), "first", Duration::from_secs(1)),
            LyricEntry::new(ids.allocate(), "second"),
            LyricEntry::new_synced(ids.allocate(), "third", Duration::from_secs(8)),
            LyricEntry::new(ids.allocate(), "fourth"),
        ]
    }

    #[test]
    fn test_partition_is_complete_and_disjoint() {
        let entries = sample_entries();
        let all = filter_entries(&entries, FilterMode::All);
        let unsynced = filter_entries(&entries, FilterMode::Unsynced);
        let synced = filter_entries(&entries, FilterMode::Synced);

        assert_eq!(all.len(), unsynced.len() + synced.len());
        for entry in &unsynced {
            assert!(!synced.iter().any(|s| s.id == entry.id));
        }
        for entry in &synced {
            assert!(all.iter().any(|a| a.id == entry.id));
        }
    }

    #[test]
    fn test_counts_match_views() {
        let entries = sample_entries();
        let counts = SyncCounts::of(&entries);
        assert_eq!(counts.total, 4);
        assert_eq!(counts.synced, 2);
        assert_eq!(counts.unsynced, 2);
        assert!(!counts.is_fully_synced());
    }

    #[test]
    fn test_filter_preserves_order() {
        let entries = sample_entries();
        let synced = filter_entries(&entries, FilterMode::Synced);
        assert_eq!(synced[0].text, "first");
        assert_eq!(synced[1].text, "third");
    }

    #[test]
    fn test_counts_empty_collection() {
        let counts = SyncCounts::of(&[]);
        assert_eq!(counts.total, 0);
        assert!(counts.is_fully_synced());
    }

    #[test]
    fn test_filter_mode_as_str() {
        assert_eq!(FilterMode::All.as_str(), "all");
        assert_eq!(FilterMode::Unsynced.as_str(), "unsynced");
        assert_eq!(FilterMode::Synced.as_str(), "synced");
    }
}
