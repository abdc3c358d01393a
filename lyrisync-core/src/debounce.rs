//! Debounced reconciliation scheduling.
//!
//! Every keystroke in the lyrics text view calls [`DraftDebouncer::text_changed`].
//! The draft is stored immediately, but reconciliation only runs once the
//! burst settles: each new edit cancels the previously scheduled run and
//! schedules a fresh one, so exactly one reconciliation runs per burst and it
//! always reads the newest draft (earlier scheduled runs are cancelled, not
//! run-then-overwritten).

use crate::session::SyncSession;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Default settle delay after the last edit in a burst.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

pub struct DraftDebouncer {
    session: Arc<SyncSession>,
    delay: Duration,
    pending: Mutex<Option<CancellationToken>>,
}

impl DraftDebouncer {
    #[must_use]
    pub fn new(session: Arc<SyncSession>, delay: Duration) -> Self {
        Self {
            session,
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Record a draft edit and (re)schedule reconciliation after the settle
    /// delay.
    pub async fn text_changed(&self, text: &str) {
        self.session.set_draft(text).await;

        let token = CancellationToken::new();
        if let Some(previous) = self.replace_pending(Some(token.clone())) {
            previous.cancel();
        }

        let session = Arc::clone(&self.session);
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::select! {
                () = token.cancelled() => {
                    debug!("Scheduled reconciliation superseded by a newer edit");
                }
                () = sleep(delay) => {
                    session.apply_draft().await;
                }
            }
        });
    }

    /// Cancel any scheduled run and reconcile right now. Used before
    /// operations that need the collection current (e.g. export).
    pub async fn flush(&self) {
        if let Some(previous) = self.replace_pending(None) {
            previous.cancel();
        }
        self.session.apply_draft().await;
    }

    fn replace_pending(&self, token: Option<CancellationToken>) -> Option<CancellationToken> {
        let mut pending = match self.pending.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        std::mem::replace(&mut *pending, token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::playback::AudioPlayer;
    use crate::session::SessionEvent;
    use async_trait::async_trait;
    use tokio::task::yield_now;
    use tokio::time::advance;

    struct NullPlayer;

    #[async_trait]
    impl AudioPlayer for NullPlayer {
        async fn play(&self) -> Result<()> {
            Ok(())
        }
        async fn pause(&self) -> Result<()> {
            Ok(())
        }
        async fn seek(&self, _position: Duration) -> Result<()> {
            Ok(())
        }
    }

    fn debouncer() -> (Arc<SyncSession>, DraftDebouncer) {
        let session = SyncSession::new(Arc::new(NullPlayer));
        let debouncer = DraftDebouncer::new(Arc::clone(&session), DEFAULT_DEBOUNCE);
        (session, debouncer)
    }

    /// Let the freshly spawned task run up to its sleep (registering the
    /// timer deadline) or observe a wakeup, on the current-thread test
    /// runtime.
    async fn settle() {
        yield_now().await;
        yield_now().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_reconciles_after_settle_delay() {
        let (session, debouncer) = debouncer();

        debouncer.text_changed("hello").await;
        settle().await;
        advance(Duration::from_millis(499)).await;
        settle().await;
        assert!(session.entries().await.is_empty());

        advance(Duration::from_millis(2)).await;
        settle().await;
        let entries = session.entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "hello");
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_runs_single_reconciliation_with_newest_text() {
        let (session, debouncer) = debouncer();
        let mut events = session.subscribe();

        debouncer.text_changed("a").await;
        settle().await;
        advance(Duration::from_millis(300)).await;
        settle().await;
        debouncer.text_changed("a\nb").await;
        settle().await;
        advance(Duration::from_millis(300)).await;
        settle().await;
        debouncer.text_changed("a\nb\nc").await;
        settle().await;

        // 600ms since the first edit, but only 0ms since the last: nothing ran
        assert!(session.entries().await.is_empty());

        advance(Duration::from_millis(501)).await;
        settle().await;

        let entries = session.entries().await;
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[2].text, "c");

        let mut changes = 0;
        while let Ok(event) = events.try_recv() {
            if matches!(event, SessionEvent::EntriesChanged { .. }) {
                changes += 1;
            }
        }
        assert_eq!(changes, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_cancels_pending_and_applies_now() {
        let (session, debouncer) = debouncer();
        let mut events = session.subscribe();

        debouncer.text_changed("line").await;
        debouncer.flush().await;
        assert_eq!(session.entries().await.len(), 1);

        // The cancelled scheduled run must not fire later
        advance(Duration::from_secs(1)).await;
        settle().await;

        let mut changes = 0;
        while let Ok(event) = events.try_recv() {
            if matches!(event, SessionEvent::EntriesChanged { .. }) {
                changes += 1;
            }
        }
        assert_eq!(changes, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_later_edit_wins_over_earlier_schedule() {
        let (session, debouncer) = debouncer();

        debouncer.text_changed("first").await;
        settle().await;
        advance(Duration::from_millis(499)).await;
        settle().await;
        debouncer.text_changed("second").await;
        settle().await;
        advance(Duration::from_millis(501)).await;
        settle().await;

        let entries = session.entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "second");
    }
}
