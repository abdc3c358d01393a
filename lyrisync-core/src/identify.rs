//! Track metadata and the identification collaborator trait.
//!
//! Identification is best-effort: whatever the provider returns is accepted
//! as-is and stored for display and export-filename purposes only. Failure
//! and no-match both degrade to filename-derived metadata; neither is ever
//! surfaced to the user as an error.

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;
use tracing::{info, warn};

/// Artist shown when identification fails or finds no match.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Cover art shown when identification finds no match.
pub const PLACEHOLDER_COVER_URL: &str = "/cover-1.png";

/// Display metadata for the loaded track.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrackMetadata {
    pub title: String,
    pub artist: String,
    pub cover_url: String,
}

impl TrackMetadata {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        cover_url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            cover_url: cover_url.into(),
        }
    }

    /// Metadata derived from the audio filename alone: the file stem as
    /// title, a placeholder artist and cover.
    #[must_use]
    pub fn fallback_for_file(filename: &str) -> Self {
        let title = Path::new(filename)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(filename)
            .to_string();

        Self {
            title,
            artist: UNKNOWN_ARTIST.to_string(),
            cover_url: PLACEHOLDER_COVER_URL.to_string(),
        }
    }
}

/// Outcome of an identification attempt that completed without a transport
/// error.
#[derive(Debug, Clone)]
pub enum IdentifyOutcome {
    /// The provider recognized the track.
    Identified(TrackMetadata),
    /// The provider answered but did not recognize the track.
    NoMatch,
}

/// Trait for track identification providers.
#[async_trait]
pub trait TrackIdentifier: Send + Sync {
    /// Provider name, for logs.
    fn name(&self) -> &'static str;

    /// Identify a track from its raw audio bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider could not be reached or answered
    /// with a malformed response. A well-formed "no match" answer is
    /// [`IdentifyOutcome::NoMatch`], not an error.
    async fn identify(&self, audio: &[u8], filename: &str) -> Result<IdentifyOutcome>;
}

/// Resolve display metadata for a track, never failing.
///
/// Provider errors and no-match answers both fall back to
/// [`TrackMetadata::fallback_for_file`]; the result is always usable.
pub async fn resolve_track_metadata(
    identifier: &dyn TrackIdentifier,
    audio: &[u8],
    filename: &str,
) -> TrackMetadata {
    match identifier.identify(audio, filename).await {
        Ok(IdentifyOutcome::Identified(metadata)) => {
            info!(
                "Identified track via {}: {} - {}",
                identifier.name(),
                metadata.artist,
                metadata.title
            );
            metadata
        }
        Ok(IdentifyOutcome::NoMatch) => {
            info!(
                "No identification match from {} for {filename}, using filename metadata",
                identifier.name()
            );
            TrackMetadata::fallback_for_file(filename)
        }
        Err(e) => {
            warn!("Identification via {} failed: {e}", identifier.name());
            TrackMetadata::fallback_for_file(filename)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    struct FixedIdentifier(Option<TrackMetadata>);

    #[async_trait]
    impl TrackIdentifier for FixedIdentifier {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn identify(&self, _audio: &[u8], _filename: &str) -> Result<IdentifyOutcome> {
            Ok(self
                .0
                .clone()
                .map_or(IdentifyOutcome::NoMatch, IdentifyOutcome::Identified))
        }
    }

    struct FailingIdentifier;

    #[async_trait]
    impl TrackIdentifier for FailingIdentifier {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn identify(&self, _audio: &[u8], _filename: &str) -> Result<IdentifyOutcome> {
            Err(CoreError::IdentifyFailed {
                provider: "failing".to_string(),
                reason: "boom".to_string(),
            })
        }
    }

    #[test]
    fn test_fallback_strips_extension() {
        let metadata = TrackMetadata::fallback_for_file("My Song.flac");
        assert_eq!(metadata.title, "My Song");
        assert_eq!(metadata.artist, UNKNOWN_ARTIST);
        assert_eq!(metadata.cover_url, PLACEHOLDER_COVER_URL);
    }

    #[test]
    fn test_fallback_without_extension() {
        let metadata = TrackMetadata::fallback_for_file("track");
        assert_eq!(metadata.title, "track");
    }

    #[tokio::test]
    async fn test_resolve_uses_identified_metadata() {
        let identifier = FixedIdentifier(Some(TrackMetadata::new("Title", "Artist", "url")));
        let metadata = resolve_track_metadata(&identifier, b"audio", "file.mp3").await;
        assert_eq!(metadata.title, "Title");
        assert_eq!(metadata.artist, "Artist");
    }

    #[tokio::test]
    async fn test_resolve_falls_back_on_no_match() {
        let identifier = FixedIdentifier(None);
        let metadata = resolve_track_metadata(&identifier, b"audio", "file.mp3").await;
        assert_eq!(metadata.title, "file");
        assert_eq!(metadata.artist, UNKNOWN_ARTIST);
    }

    #[tokio::test]
    async fn test_resolve_falls_back_on_error() {
        let metadata = resolve_track_metadata(&FailingIdentifier, b"audio", "song.mp3").await;
        assert_eq!(metadata.title, "song");
        assert_eq!(metadata.cover_url, PLACEHOLDER_COVER_URL);
    }
}
