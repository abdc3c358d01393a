//! Reconciliation of a free-text draft against the existing entry collection.
//!
//! Free-text editing is the primary lyric-entry workflow, so reordering,
//! inserting, and deleting lines must not discard sync work already done on
//! lines the user didn't touch. Matching is by exact trimmed-text equality
//! rather than position: inserting a line above already-synced lines must not
//! shift their timestamps onto the wrong text.

use crate::entry::{IdAllocator, LyricEntry};
use tracing::debug;

/// Build the replacement collection for a draft text block.
///
/// Each non-empty trimmed line of `draft`, in order, claims the first
/// not-yet-claimed prior entry whose text is exactly equal, reusing its id
/// and timestamp. Unmatched lines become fresh, unsynced entries. Duplicate
/// identical lines claim distinct prior entries first-come, first-served; if
/// the occurrence count grew, the surplus occurrences are new unsynced
/// entries.
///
/// The output order is exactly the draft's line order.
#[must_use]
pub fn reconcile(previous: &[LyricEntry], draft: &str, ids: &mut IdAllocator) -> Vec<LyricEntry> {
    let mut claimed = vec![false; previous.len()];
    let mut next = Vec::new();

    for line in draft.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let matched = previous
            .iter()
            .enumerate()
            .find(|(i, entry)| !claimed[*i] && entry.text == line);

        if let Some((i, entry)) = matched {
            claimed[i] = true;
            next.push(entry.clone());
        } else {
            next.push(LyricEntry::new(ids.allocate(), line));
        }
    }

    let reused = claimed.iter().filter(|c| **c).count();
    debug!(
        "Reconciled draft: {} line(s), {} reused, {} new",
        next.len(),
        reused,
        next.len() - reused
    );

    debug_assert!(ids_are_unique(&next), "reconciliation produced duplicate ids");

    next
}

fn ids_are_unique(entries: &[LyricEntry]) -> bool {
    let mut seen: Vec<_> = entries.iter().map(|e| e.id).collect();
    seen.sort_unstable();
    seen.windows(2).all(|pair| pair[0] != pair[1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn seeded(ids: &mut IdAllocator, lines: &[(&str, Option<f64>)]) -> Vec<LyricEntry> {
        lines
            .iter()
            .map(|(text, secs)| {
                let mut entry = LyricEntry::new(ids.allocate(), text);
                entry.timestamp = secs.map(Duration::from_secs_f64);
                entry
            })
            .collect()
    }

    #[test]
    fn test_identity_preservation() {
        let mut ids = IdAllocator::new();
        let previous = seeded(&mut ids, &[("A", Some(5.0)), ("B", None), ("C", Some(9.5))]);
        let next = reconcile(&previous, "A\nB\nC", &mut ids);
        assert_eq!(next, previous);
    }

    #[test]
    fn test_reorder_preserves_identity_and_timestamp() {
        let mut ids = IdAllocator::new();
        let previous = seeded(&mut ids, &[("A", Some(5.0)), ("B", None)]);
        let next = reconcile(&previous, "B\nA", &mut ids);

        assert_eq!(next.len(), 2);
        assert_eq!(next[0].id, previous[1].id);
        assert_eq!(next[0].text, "B");
        assert_eq!(next[0].timestamp, None);
        assert_eq!(next[1].id, previous[0].id);
        assert_eq!(next[1].text, "A");
        assert_eq!(next[1].timestamp, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_insertion_above_synced_line() {
        let mut ids = IdAllocator::new();
        let previous = seeded(&mut ids, &[("A", Some(5.0))]);
        let next = reconcile(&previous, "X\nA", &mut ids);

        assert_eq!(next.len(), 2);
        assert_eq!(next[0].text, "X");
        assert_eq!(next[0].timestamp, None);
        assert_ne!(next[0].id, previous[0].id);
        assert_eq!(next[1], previous[0]);
    }

    #[test]
    fn test_deletion_drops_entry() {
        let mut ids = IdAllocator::new();
        let previous = seeded(&mut ids, &[("A", Some(1.0)), ("B", Some(2.0))]);
        let next = reconcile(&previous, "B", &mut ids);

        assert_eq!(next.len(), 1);
        assert_eq!(next[0], previous[1]);
    }

    #[test]
    fn test_duplicates_claim_distinct_entries_first_come() {
        let mut ids = IdAllocator::new();
        let previous = seeded(&mut ids, &[("A", Some(1.0)), ("A", Some(2.0))]);
        let next = reconcile(&previous, "A\nA\nA", &mut ids);

        assert_eq!(next.len(), 3);
        assert_eq!(next[0].id, previous[0].id);
        assert_eq!(next[0].timestamp, Some(Duration::from_secs(1)));
        assert_eq!(next[1].id, previous[1].id);
        assert_eq!(next[1].timestamp, Some(Duration::from_secs(2)));
        assert_eq!(next[2].timestamp, None);
        assert_ne!(next[2].id, previous[0].id);
        assert_ne!(next[2].id, previous[1].id);
    }

    #[test]
    fn test_shrinking_duplicate_count_keeps_first_match() {
        let mut ids = IdAllocator::new();
        let previous = seeded(&mut ids, &[("A", Some(1.0)), ("A", Some(2.0))]);
        let next = reconcile(&previous, "A", &mut ids);

        assert_eq!(next.len(), 1);
        assert_eq!(next[0].id, previous[0].id);
        assert_eq!(next[0].timestamp, Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_blank_and_whitespace_lines_dropped() {
        let mut ids = IdAllocator::new();
        let next = reconcile(&[], "first\n\n   \n  second  \n", &mut ids);

        assert_eq!(next.len(), 2);
        assert_eq!(next[0].text, "first");
        assert_eq!(next[1].text, "second");
    }

    #[test]
    fn test_match_is_on_trimmed_text() {
        let mut ids = IdAllocator::new();
        let previous = seeded(&mut ids, &[("A line", Some(3.0))]);
        let next = reconcile(&previous, "   A line\t", &mut ids);

        assert_eq!(next.len(), 1);
        assert_eq!(next[0], previous[0]);
    }

    #[test]
    fn test_renamed_line_becomes_new_entry() {
        let mut ids = IdAllocator::new();
        let previous = seeded(&mut ids, &[("old words", Some(3.0))]);
        let next = reconcile(&previous, "new words", &mut ids);

        assert_eq!(next.len(), 1);
        assert_ne!(next[0].id, previous[0].id);
        assert_eq!(next[0].timestamp, None);
    }

    #[test]
    fn test_empty_draft_yields_empty_collection() {
        let mut ids = IdAllocator::new();
        let previous = seeded(&mut ids, &[("A", Some(1.0))]);
        let next = reconcile(&previous, "", &mut ids);
        assert!(next.is_empty());
    }
}
