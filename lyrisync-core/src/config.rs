use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EditorConfig {
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub identify: IdentifyConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Settle delay after the last draft edit before reconciliation runs
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Fine nudge increment for timestamp adjustment buttons
    #[serde(default = "default_nudge_fine_ms")]
    pub nudge_fine_ms: u64,
    /// Coarse nudge increment for timestamp adjustment buttons
    #[serde(default = "default_nudge_coarse_ms")]
    pub nudge_coarse_ms: u64,
    /// Position jump beyond which a player update counts as a seek
    #[serde(default = "default_seek_jump_threshold_secs")]
    pub seek_jump_threshold_secs: u64,
}

const fn default_debounce_ms() -> u64 {
    500
}

const fn default_nudge_fine_ms() -> u64 {
    10
}

const fn default_nudge_coarse_ms() -> u64 {
    30
}

const fn default_seek_jump_threshold_secs() -> u64 {
    2
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            nudge_fine_ms: default_nudge_fine_ms(),
            nudge_coarse_ms: default_nudge_coarse_ms(),
            seek_jump_threshold_secs: default_seek_jump_threshold_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifyConfig {
    /// Whether to attempt remote track identification at all
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// API token for the identification service
    #[serde(default)]
    pub api_token: String,
    /// Identification endpoint
    #[serde(default = "default_identify_endpoint")]
    pub endpoint: String,
}

const fn default_true() -> bool {
    true
}

fn default_identify_endpoint() -> String {
    "https://api.audd.io/".to_string()
}

impl Default for IdentifyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_token: String::new(),
            endpoint: default_identify_endpoint(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Filename stem used when no track title is known
    #[serde(default = "default_fallback_title")]
    pub fallback_title: String,
}

fn default_fallback_title() -> String {
    "lyrics".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            fallback_title: default_fallback_title(),
        }
    }
}

impl EditorConfig {
    /// Get the configuration directory path (~/.config/lyrisync/)
    #[must_use]
    pub fn config_dir() -> PathBuf {
        crate::paths::config_dir()
    }

    /// Get the config file path (~/.config/lyrisync/config.toml)
    #[must_use]
    pub fn config_path() -> PathBuf {
        crate::paths::config_path()
    }

    /// Load config from file or create template on first run
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed, or if
    /// identification is enabled without an API token.
    pub fn load_or_create() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            // Create config directory if it doesn't exist
            if let Some(parent) = config_path.parent() {
                fs::create_dir_all(parent)?;
            }

            // Write template config
            fs::write(&config_path, CONFIG_TEMPLATE)?;

            return Err(CoreError::ConfigNotFound { path: config_path });
        }

        let content = fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;

        Ok(config)
    }

    /// Parse config from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid config TOML or required
    /// fields are missing.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.identify.enabled && self.identify.api_token.is_empty() {
            return Err(CoreError::ConfigMissingField {
                field: "identify.api_token".to_string(),
            });
        }
        Ok(())
    }
}

const CONFIG_TEMPLATE: &str = r#"# Lyrisync Configuration
# ~/.config/lyrisync/config.toml

[sync]
# Settle delay (ms) after the last lyrics edit before re-matching lines
debounce_ms = 500
# Timestamp nudge increments (ms)
nudge_fine_ms = 10
nudge_coarse_ms = 30
# Position jump (s) beyond which a player update counts as a seek
seek_jump_threshold_secs = 2

[identify]
# Remote track identification (title/artist/cover). Set enabled = false to
# always use filename-derived metadata instead.
enabled = true
# Required when enabled: get a token from https://audd.io
api_token = ""
endpoint = "https://api.audd.io/"

[export]
# Filename stem used when no track title is known
fallback_title = "lyrics"
"#;
