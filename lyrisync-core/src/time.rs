//! Duration formatting and offset helpers.
//!
//! All timestamp arithmetic in the engine happens in integer milliseconds;
//! these helpers keep the truncation behavior in one place.

use std::time::Duration;

/// Format a position as `MM:SS.CC` (minutes zero-padded, unbounded width;
/// seconds and centiseconds zero-padded to two digits).
///
/// Centiseconds are truncated, not rounded.
#[must_use]
pub fn lrc_timestamp(position: Duration) -> String {
    let total_ms = position.as_millis();
    let minutes = total_ms / 60_000;
    let seconds = (total_ms / 1000) % 60;
    let centis = (total_ms % 1000) / 10;
    format!("{minutes:02}:{seconds:02}.{centis:02}")
}

/// Format a position as `MM:SS` for transport displays.
#[must_use]
pub fn clock_timestamp(position: Duration) -> String {
    let total_secs = position.as_secs();
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    format!("{minutes:02}:{seconds:02}")
}

/// Apply a signed millisecond offset to a position, flooring at zero.
#[must_use]
pub fn offset_by_millis(position: Duration, offset_ms: i64) -> Duration {
    let magnitude = Duration::from_millis(offset_ms.unsigned_abs());
    if offset_ms >= 0 {
        position.saturating_add(magnitude)
    } else {
        position.saturating_sub(magnitude)
    }
}
