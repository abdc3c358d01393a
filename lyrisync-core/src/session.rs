//! The editing session: the single owned engine object.
//!
//! `SyncSession` owns the entry store, the draft text block, the mirrored
//! player state, and the track metadata. Its methods are the only write path
//! into that state; every mutation completes atomically under one write lock
//! and is announced on a broadcast channel so views can react without
//! polling.

use crate::entry::{EntryId, LyricEntry};
use crate::error::Result;
use crate::export;
use crate::identify::{resolve_track_metadata, TrackIdentifier, TrackMetadata};
use crate::playback::{AudioPlayer, PlayerState};
use crate::resolver::active_line_index;
use crate::store::EntryStore;
use crate::view::{filter_entries, FilterMode, SyncCounts};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, warn};

/// Events emitted by the session
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The entry collection changed shape or content
    EntriesChanged { counts: SyncCounts },
    /// An entry received a timestamp (capture, set, or nudge)
    TimestampAssigned { id: EntryId, position: Duration },
    /// An entry's timestamp was removed
    TimestampCleared { id: EntryId },
    /// Regular cursor update from the player
    PositionSync { position: Duration },
    /// The cursor jumped (user seek)
    SeekOccurred { position: Duration },
    /// Playback resumed
    PlaybackResumed { position: Duration },
    /// Playback paused (including a refused play, reverted to paused)
    PlaybackPaused { position: Duration },
    /// Track metadata became available
    TrackIdentified { metadata: TrackMetadata },
}

/// Tuning knobs for a session, usually taken from the config file.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Position jump beyond which an update counts as a seek
    pub seek_jump_threshold: Duration,
    /// Export filename stem used when no track title is known
    pub fallback_title: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            seek_jump_threshold: Duration::from_secs(2),
            fallback_title: "lyrics".to_string(),
        }
    }
}

impl SessionOptions {
    /// Build options from the loaded config file.
    #[must_use]
    pub fn from_config(config: &crate::config::EditorConfig) -> Self {
        Self {
            seek_jump_threshold: Duration::from_secs(config.sync.seek_jump_threshold_secs),
            fallback_title: config.export.fallback_title.clone(),
        }
    }
}

struct SessionInner {
    store: EntryStore,
    draft: String,
    player: PlayerState,
    track: TrackMetadata,
}

/// Engine object for one lyric-editing session.
pub struct SyncSession {
    inner: RwLock<SessionInner>,
    event_tx: broadcast::Sender<SessionEvent>,
    player_handle: Arc<dyn AudioPlayer>,
    options: SessionOptions,
}

impl SyncSession {
    /// Create a new session around an audio player collaborator.
    #[must_use]
    pub fn new(player_handle: Arc<dyn AudioPlayer>) -> Arc<Self> {
        Self::with_options(player_handle, SessionOptions::default())
    }

    /// Create a new session with explicit options.
    #[must_use]
    pub fn with_options(player_handle: Arc<dyn AudioPlayer>, options: SessionOptions) -> Arc<Self> {
        let (event_tx, _) = broadcast::channel(64);

        Arc::new(Self {
            inner: RwLock::new(SessionInner {
                store: EntryStore::new(),
                draft: String::new(),
                player: PlayerState::default(),
                track: TrackMetadata::default(),
            }),
            event_tx,
            player_handle,
            options,
        })
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    // --- Draft text / reconciliation ---

    /// Store the latest draft text without reconciling yet. The debouncer
    /// calls [`Self::apply_draft`] once the edit burst settles.
    pub async fn set_draft(&self, text: &str) {
        let mut inner = self.inner.write().await;
        inner.draft = text.to_string();
    }

    /// The current draft text block.
    pub async fn draft(&self) -> String {
        self.inner.read().await.draft.clone()
    }

    /// Reconcile the entry collection against the current draft. Always
    /// reads the draft as it exists now, so a late-running scheduled
    /// reconciliation still operates on the newest text.
    pub async fn apply_draft(&self) {
        let mut inner = self.inner.write().await;
        let draft = std::mem::take(&mut inner.draft);
        inner.store.apply_draft(&draft);
        inner.draft = draft;

        let counts = inner.store.counts();
        let _ = self.event_tx.send(SessionEvent::EntriesChanged { counts });
    }

    // --- Entry snapshots and derived views ---

    /// Snapshot of the full entry collection.
    pub async fn entries(&self) -> Vec<LyricEntry> {
        self.inner.read().await.store.entries().to_vec()
    }

    /// Snapshot of the entries visible under a filter mode.
    pub async fn filtered(&self, mode: FilterMode) -> Vec<LyricEntry> {
        let inner = self.inner.read().await;
        filter_entries(inner.store.entries(), mode)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Counts for the three filter views.
    pub async fn counts(&self) -> SyncCounts {
        self.inner.read().await.store.counts()
    }

    /// Index of the "now playing" entry within the filtered view, resolved
    /// against the interpolated cursor.
    pub async fn active_line(&self, mode: FilterMode) -> Option<usize> {
        let inner = self.inner.read().await;
        let position = inner.player.interpolated_position();
        active_line_index(filter_entries(inner.store.entries(), mode), position)
    }

    // --- Sync actions ---

    /// Assign the current cursor position to the next unsynced line.
    pub async fn sync_next(&self) -> Option<EntryId> {
        let mut inner = self.inner.write().await;
        let position = inner.player.interpolated_position();
        let id = inner.store.sync_next_unsynced(position)?;

        debug!("Captured {position:?} onto entry {id}");
        let _ = self
            .event_tx
            .send(SessionEvent::TimestampAssigned { id, position });
        Some(id)
    }

    /// Remove the timestamp from the last synced line.
    pub async fn unsync_last(&self) -> Option<EntryId> {
        let mut inner = self.inner.write().await;
        let id = inner.store.clear_last_synced()?;

        let _ = self.event_tx.send(SessionEvent::TimestampCleared { id });
        Some(id)
    }

    /// Set or clear a specific entry's timestamp.
    pub async fn set_timestamp(&self, id: EntryId, timestamp: Option<Duration>) -> bool {
        let mut inner = self.inner.write().await;
        if !inner.store.set_timestamp(id, timestamp) {
            return false;
        }

        let event = match timestamp {
            Some(position) => SessionEvent::TimestampAssigned { id, position },
            None => SessionEvent::TimestampCleared { id },
        };
        let _ = self.event_tx.send(event);
        true
    }

    /// Nudge an entry's timestamp by a signed millisecond delta.
    pub async fn nudge(&self, id: EntryId, delta_ms: i64) -> bool {
        let mut inner = self.inner.write().await;
        if !inner.store.adjust_timestamp(id, delta_ms) {
            return false;
        }

        if let Some(position) = inner.store.get(id).and_then(|e| e.timestamp) {
            let _ = self
                .event_tx
                .send(SessionEvent::TimestampAssigned { id, position });
        }
        true
    }

    /// Replace one line's text in place, keeping its id and timestamp, and
    /// rewrite the draft block so the text view stays in step.
    pub async fn edit_line(&self, id: EntryId, new_text: &str) -> bool {
        let mut inner = self.inner.write().await;
        if !inner.store.edit_text(id, new_text) {
            return false;
        }
        inner.draft = inner.store.joined_text();

        let counts = inner.store.counts();
        let _ = self.event_tx.send(SessionEvent::EntriesChanged { counts });
        true
    }

    /// Clear every timestamp, keeping all entries in order.
    pub async fn reset_all_timestamps(&self) {
        let mut inner = self.inner.write().await;
        inner.store.reset_all_timestamps();

        let counts = inner.store.counts();
        let _ = self.event_tx.send(SessionEvent::EntriesChanged { counts });
    }

    /// Remove all entries and the draft text.
    pub async fn clear_lyrics(&self) {
        let mut inner = self.inner.write().await;
        inner.store.clear_all();
        inner.draft.clear();

        let counts = inner.store.counts();
        let _ = self.event_tx.send(SessionEvent::EntriesChanged { counts });
    }

    // --- Playback mirroring and commands ---

    /// Mirror a state report from the player and emit the matching
    /// transition event (pause/resume beats seek beats plain position sync).
    pub async fn update_player(&self, new_state: PlayerState) {
        let mut inner = self.inner.write().await;
        let old_state = &inner.player;

        let playback_changed = old_state.playback_state_changed(&new_state);
        let seek_occurred = old_state.seek_occurred(&new_state, self.options.seek_jump_threshold);

        let position = new_state.position;
        if playback_changed {
            if new_state.is_playing {
                let _ = self.event_tx.send(SessionEvent::PlaybackResumed { position });
            } else {
                let _ = self.event_tx.send(SessionEvent::PlaybackPaused { position });
            }
        } else if seek_occurred {
            let _ = self.event_tx.send(SessionEvent::SeekOccurred { position });
        } else {
            let _ = self.event_tx.send(SessionEvent::PositionSync { position });
        }

        inner.player = new_state;
    }

    /// The interpolated cursor position.
    pub async fn position(&self) -> Duration {
        self.inner.read().await.player.interpolated_position()
    }

    /// Snapshot of the mirrored player state.
    pub async fn player(&self) -> PlayerState {
        self.inner.read().await.player.clone()
    }

    /// Seek to an entry's timestamp and start playback from there. A line
    /// with no timestamp is ignored. A refused play command reverts the
    /// mirrored state to paused; playback refusal is never fatal.
    pub async fn play_from(&self, id: EntryId) {
        let target = {
            let inner = self.inner.read().await;
            inner
                .store
                .get(id)
                .and_then(|e| e.timestamp)
                .map(|ts| inner.player.clamp_seek(ts))
        };
        let Some(target) = target else {
            debug!("Ignoring play-from on entry {id} with no timestamp");
            return;
        };

        let command = async {
            self.player_handle.seek(target).await?;
            self.player_handle.play().await
        };

        match command.await {
            Ok(()) => {
                let mut inner = self.inner.write().await;
                inner.player = PlayerState::new(true, target, inner.player.duration);
                let _ = self
                    .event_tx
                    .send(SessionEvent::PlaybackResumed { position: target });
            }
            Err(e) => {
                warn!("Player refused to start from {target:?}: {e}");
                let mut inner = self.inner.write().await;
                inner.player.is_playing = false;
                let position = inner.player.position;
                let _ = self.event_tx.send(SessionEvent::PlaybackPaused { position });
            }
        }
    }

    /// Pause playback and mirror the paused state immediately.
    pub async fn pause(&self) {
        if let Err(e) = self.player_handle.pause().await {
            warn!("Player rejected pause: {e}");
        }

        let mut inner = self.inner.write().await;
        let position = inner.player.interpolated_position();
        inner.player.position = position;
        inner.player.is_playing = false;
        let _ = self.event_tx.send(SessionEvent::PlaybackPaused { position });
    }

    // --- Track metadata ---

    /// Identify the loaded track, falling back to filename metadata on
    /// failure or no-match. Never errors.
    pub async fn identify_track(
        &self,
        identifier: &dyn TrackIdentifier,
        audio: &[u8],
        filename: &str,
    ) -> TrackMetadata {
        let metadata = resolve_track_metadata(identifier, audio, filename).await;
        self.set_track_metadata(metadata.clone()).await;
        metadata
    }

    /// Store track metadata directly (e.g. from embedded tags).
    pub async fn set_track_metadata(&self, metadata: TrackMetadata) {
        let mut inner = self.inner.write().await;
        inner.track = metadata.clone();
        let _ = self.event_tx.send(SessionEvent::TrackIdentified { metadata });
    }

    /// The current track metadata.
    pub async fn track_metadata(&self) -> TrackMetadata {
        self.inner.read().await.track.clone()
    }

    // --- Export ---

    /// Render the collection as an LRC file.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::IncompleteSync`](crate::CoreError::IncompleteSync)
    /// if any entry has no timestamp; no partial output is produced.
    pub async fn export_lrc(&self) -> Result<String> {
        let inner = self.inner.read().await;
        export::render_lrc(inner.store.entries())
    }

    /// Suggested filename for the export, derived from the track title.
    pub async fn suggested_filename(&self) -> String {
        let inner = self.inner.read().await;
        let title = if inner.track.title.is_empty() {
            self.options.fallback_title.as_str()
        } else {
            inner.track.title.as_str()
        };
        export::suggested_filename(title)
    }
}
