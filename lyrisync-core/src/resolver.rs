//! Active-line resolution against the playback cursor.

use crate::entry::LyricEntry;
use std::time::Duration;

/// Find the index of the entry that is "now playing" for the given cursor
/// position, or `None` before the first timestamp.
///
/// The scan tolerates display order differing from timestamp order: an entry
/// is only accepted if its timestamp is both `<=` the cursor and `>=` every
/// previously accepted timestamp, so entries are effectively considered in
/// timestamp order. Equal timestamps resolve to the later-scanned entry.
///
/// Accepts any iterable of entry references so it works over both the full
/// collection and a filtered view.
///
/// Runs in O(n) with no allocation; cheap enough for every cursor tick.
#[must_use]
pub fn active_line_index<'a, I>(entries: I, position: Duration) -> Option<usize>
where
    I: IntoIterator<Item = &'a LyricEntry>,
{
    let mut active = None;
    let mut threshold = None;

    for (index, entry) in entries.into_iter().enumerate() {
        let Some(timestamp) = entry.timestamp else {
            continue;
        };
        if timestamp <= position && threshold.map_or(true, |t| timestamp >= t) {
            active = Some(index);
            threshold = Some(timestamp);
        }
    }

    active
}
