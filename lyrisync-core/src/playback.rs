//! Mirrored playback state and the audio player collaborator trait.
//!
//! The engine never decodes audio. It mirrors the player's reported state
//! read-only and issues play/pause/seek commands back only in response to
//! user sync actions.

use crate::error::Result;
use async_trait::async_trait;
use std::time::{Duration, Instant};

/// Snapshot of the external player's state, as last reported.
#[derive(Debug, Clone)]
pub struct PlayerState {
    /// Whether audio is currently playing
    pub is_playing: bool,
    /// Reported playback position
    pub position: Duration,
    /// Total track duration (fixed once media loads)
    pub duration: Duration,
    /// When this state was last reported (for interpolation)
    pub updated_at: Instant,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            is_playing: false,
            position: Duration::ZERO,
            duration: Duration::ZERO,
            updated_at: Instant::now(),
        }
    }
}

impl PlayerState {
    #[must_use]
    pub fn new(is_playing: bool, position: Duration, duration: Duration) -> Self {
        Self {
            is_playing,
            position,
            duration,
            updated_at: Instant::now(),
        }
    }

    /// Position advanced by the wall-clock time since the last report while
    /// playing, clamped to the track duration. Reports arrive on the player's
    /// own cadence; interpolation keeps the cursor smooth between them.
    #[must_use]
    pub fn interpolated_position(&self) -> Duration {
        if !self.is_playing {
            return self.position;
        }

        let elapsed = self.updated_at.elapsed();
        (self.position + elapsed).min(self.duration)
    }

    /// Clamp a seek target into the playable range `[0, duration]`.
    #[must_use]
    pub fn clamp_seek(&self, target: Duration) -> Duration {
        target.min(self.duration)
    }

    /// Whether playback toggled between playing and paused.
    #[must_use]
    pub const fn playback_state_changed(&self, other: &Self) -> bool {
        self.is_playing != other.is_playing
    }

    /// Whether the position jumped further than `threshold` from where
    /// interpolation expected it (i.e. the user sought).
    #[must_use]
    pub fn seek_occurred(&self, other: &Self, threshold: Duration) -> bool {
        let expected = self.interpolated_position();
        let actual = other.position;

        if actual > expected {
            actual - expected > threshold
        } else {
            expected - actual > threshold
        }
    }
}

/// Commands the engine may issue to the external audio player.
///
/// Implementations wrap whatever actually plays audio (a media element, a
/// local decoder). They should report failures rather than panic; a refused
/// `play` (e.g. an autoplay restriction) is recovered by the session, which
/// reverts to the paused state.
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Start or resume playback.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::PlaybackRefused`](crate::CoreError::PlaybackRefused)
    /// if the player refuses to start.
    async fn play(&self) -> Result<()>;

    /// Pause playback.
    ///
    /// # Errors
    ///
    /// Returns an error if the player rejects the command.
    async fn pause(&self) -> Result<()>;

    /// Seek to an absolute position. Callers clamp into `[0, duration]`
    /// before issuing the command.
    ///
    /// # Errors
    ///
    /// Returns an error if the player rejects the command.
    async fn seek(&self, position: Duration) -> Result<()>;
}
