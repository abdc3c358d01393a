use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    // Export errors
    #[error("cannot export: {unsynced} line(s) have no timestamp yet")]
    IncompleteSync { unsynced: usize },

    // Playback errors
    #[error("playback refused to start: {reason}")]
    PlaybackRefused { reason: String },

    // Identification errors
    #[error("track identification via {provider} failed: {reason}")]
    IdentifyFailed { provider: String, reason: String },

    // Configuration errors
    #[error("Config file not found at {path}. A template has been created - please edit it and restart.")]
    ConfigNotFound { path: PathBuf },

    #[error("Missing required config field: {field}")]
    ConfigMissingField { field: String },

    #[error("Failed to parse config file: {0}")]
    ConfigParseError(#[from] toml::de::Error),

    // IO errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
