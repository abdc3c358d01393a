use async_trait::async_trait;
use lyrisync_core::{
    CoreError, IdentifyConfig, IdentifyOutcome, TrackIdentifier, TrackMetadata, UNKNOWN_ARTIST,
};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

const AUDD_API_URL: &str = "https://api.audd.io/";

/// Default timeout for HTTP requests (30 seconds; the whole audio blob is
/// uploaded)
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Cover art size requested from Apple Music artwork URL templates
const APPLE_ARTWORK_SIZE: &str = "500x500";

/// AudD audio fingerprint identification provider.
///
/// Uploads the audio bytes in a single multipart request and is never
/// retried: the engine treats identification as best-effort, and replaying a
/// full audio upload on transient failure is worse than falling back to
/// filename metadata.
pub struct AuddIdentifier {
    client: reqwest::Client,
    api_token: String,
    endpoint: String,
}

impl AuddIdentifier {
    /// Create a new AudD identifier against the public endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(api_token: impl Into<String>) -> Result<Self, CoreError> {
        Self::with_endpoint(api_token, AUDD_API_URL)
    }

    /// Create a new AudD identifier against a custom endpoint (used for
    /// self-hosted proxies and tests).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_endpoint(
        api_token: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(5))
            .user_agent("Lyrisync/1.0 (https://github.com/kvnxiao/lyrisync)")
            .build()
            .map_err(|e| CoreError::IdentifyFailed {
                provider: "audd".to_string(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_token: api_token.into(),
            endpoint: endpoint.into(),
        })
    }

    /// Build an identifier from the `[identify]` config section.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn from_config(config: &IdentifyConfig) -> Result<Self, CoreError> {
        Self::with_endpoint(config.api_token.clone(), config.endpoint.clone())
    }

    fn parse_response(response: AuddResponse, filename: &str) -> IdentifyOutcome {
        let Some(result) = response.result else {
            debug!("AudD returned no match for {filename}");
            return IdentifyOutcome::NoMatch;
        };

        // Cover preference: Spotify album image, then Apple Music artwork
        // (size template substituted), then AudD's own album_art
        let cover_url = result
            .spotify
            .as_ref()
            .and_then(|s| s.album.as_ref())
            .and_then(|album| album.images.first())
            .map(|image| image.url.clone())
            .or_else(|| {
                result
                    .apple_music
                    .as_ref()
                    .and_then(|apple| apple.artwork.as_ref())
                    .and_then(|artwork| artwork.url.as_ref())
                    .map(|url| url.replace("{w}x{h}", APPLE_ARTWORK_SIZE))
            })
            .or(result.album_art)
            .unwrap_or_default();

        let fallback = TrackMetadata::fallback_for_file(filename);
        IdentifyOutcome::Identified(TrackMetadata::new(
            result.title.unwrap_or(fallback.title),
            result.artist.unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
            cover_url,
        ))
    }
}

/// Response envelope from the AudD API.
/// The API returns additional fields (timecode, song_link, ...) that we
/// don't use; serde ignores unknown fields by default.
#[derive(Debug, Deserialize)]
struct AuddResponse {
    status: String,
    result: Option<AuddResult>,
    error: Option<AuddError>,
}

#[derive(Debug, Deserialize)]
struct AuddResult {
    title: Option<String>,
    artist: Option<String>,
    album_art: Option<String>,
    spotify: Option<SpotifyInfo>,
    apple_music: Option<AppleMusicInfo>,
}

#[derive(Debug, Deserialize)]
struct SpotifyInfo {
    album: Option<SpotifyAlbum>,
}

#[derive(Debug, Deserialize)]
struct SpotifyAlbum {
    #[serde(default)]
    images: Vec<SpotifyImage>,
}

#[derive(Debug, Deserialize)]
struct SpotifyImage {
    url: String,
}

#[derive(Debug, Deserialize)]
struct AppleMusicInfo {
    artwork: Option<AppleArtwork>,
}

#[derive(Debug, Deserialize)]
struct AppleArtwork {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuddError {
    error_code: Option<i64>,
    error_message: Option<String>,
}

#[async_trait]
impl TrackIdentifier for AuddIdentifier {
    fn name(&self) -> &'static str {
        "audd"
    }

    async fn identify(&self, audio: &[u8], filename: &str) -> Result<IdentifyOutcome, CoreError> {
        info!(
            "Identifying {filename} via AudD ({} bytes of audio)",
            audio.len()
        );

        let form = reqwest::multipart::Form::new()
            .text("api_token", self.api_token.clone())
            .text("return", "apple_music,spotify")
            .part(
                "file",
                reqwest::multipart::Part::bytes(audio.to_vec()).file_name(filename.to_string()),
            );

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| CoreError::IdentifyFailed {
                provider: "audd".to_string(),
                reason: format!("request failed: {e}"),
            })?;

        let status = response.status();
        debug!("AudD response status: {status}");
        if !status.is_success() {
            warn!("AudD returned status: {status}");
            return Err(CoreError::IdentifyFailed {
                provider: "audd".to_string(),
                reason: format!("AudD returned status: {status}"),
            });
        }

        let parsed: AuddResponse =
            response.json().await.map_err(|e| CoreError::IdentifyFailed {
                provider: "audd".to_string(),
                reason: format!("malformed response: {e}"),
            })?;

        if parsed.status != "success" {
            let reason = parsed
                .error
                .map(|e| {
                    format!(
                        "AudD error {}: {}",
                        e.error_code.unwrap_or_default(),
                        e.error_message.unwrap_or_default()
                    )
                })
                .unwrap_or_else(|| format!("AudD status: {}", parsed.status));
            return Err(CoreError::IdentifyFailed {
                provider: "audd".to_string(),
                reason,
            });
        }

        Ok(Self::parse_response(parsed, filename))
    }
}
