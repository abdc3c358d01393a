//! LRC rendering of a fully-synced entry collection.

use crate::entry::LyricEntry;
use crate::error::{CoreError, Result};
use crate::time::lrc_timestamp;

/// Render entries as a time-coded lyric file.
///
/// This is the one user-facing validation gate in the engine: if any entry
/// lacks a timestamp the export fails with [`CoreError::IncompleteSync`] and
/// produces no output. On success, entries are sorted ascending by timestamp
/// (stable, so equal timestamps keep their relative collection order) and
/// rendered one per line as `[MM:SS.CC]text`, newline-separated, with no
/// header or trailing metadata.
///
/// # Errors
///
/// Returns [`CoreError::IncompleteSync`] if any entry has no timestamp.
pub fn render_lrc(entries: &[LyricEntry]) -> Result<String> {
    let unsynced = entries.iter().filter(|e| !e.is_synced()).count();
    if unsynced > 0 {
        return Err(CoreError::IncompleteSync { unsynced });
    }

    let mut timed: Vec<_> = entries
        .iter()
        .filter_map(|e| e.timestamp.map(|ts| (ts, e.text.as_str())))
        .collect();
    timed.sort_by_key(|(ts, _)| *ts);

    let lines: Vec<_> = timed
        .into_iter()
        .map(|(ts, text)| format!("[{}]{text}", lrc_timestamp(ts)))
        .collect();

    Ok(lines.join("\n"))
}

/// Suggested download filename for an exported file.
#[must_use]
pub fn suggested_filename(title: &str) -> String {
    format!("{title}.lrc")
}
