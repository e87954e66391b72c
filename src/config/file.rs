//! TOML configuration file loading
//!
//! Supports `~/.config/deva/config.toml` as a persistent config source.
//! All fields are optional; the file is a partial overlay on top of defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::Result;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct DevaConfigFile {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerFileConfig,

    /// Language model configuration
    #[serde(default)]
    pub llm: LlmFileConfig,

    /// Speech synthesis configuration
    #[serde(default)]
    pub tts: TtsFileConfig,
}

/// HTTP server configuration
#[derive(Debug, Default, Deserialize)]
pub struct ServerFileConfig {
    /// Bind address (e.g. "127.0.0.1")
    pub host: Option<String>,

    /// Port to listen on
    pub port: Option<u16>,

    /// Named conversations kept in memory
    pub max_sessions: Option<usize>,
}

/// Language model configuration
#[derive(Debug, Default, Deserialize)]
pub struct LlmFileConfig {
    /// Gemini model identifier (e.g. "gemini-1.5-flash")
    pub model: Option<String>,

    /// API base URL
    pub base_url: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// Speech synthesis configuration
#[derive(Debug, Default, Deserialize)]
pub struct TtsFileConfig {
    /// Attach spoken audio to replies
    pub enabled: Option<bool>,

    /// Language code (e.g. "en")
    pub lang: Option<String>,

    /// Endpoint override, replaces `https://translate.google.<accent>`
    pub base_url: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,

    /// Time allowed for a whole reply in seconds
    pub total_timeout_secs: Option<u64>,
}

/// Load the TOML config file from `DEVA_CONFIG` or the standard path
///
/// Returns `DevaConfigFile::default()` if the file doesn't exist or can't be
/// read or parsed.
pub fn load_config_file() -> DevaConfigFile {
    let Some(path) = std::env::var("DEVA_CONFIG")
        .ok()
        .map(PathBuf::from)
        .or_else(config_file_path)
    else {
        return DevaConfigFile::default();
    };

    match load_from(&path) {
        Ok(Some(config)) => {
            tracing::info!(path = %path.display(), "loaded config file");
            config
        }
        Ok(None) => DevaConfigFile::default(),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to load config file, using defaults"
            );
            DevaConfigFile::default()
        }
    }
}

/// Load a config file from an explicit path
///
/// Returns `Ok(None)` if the file doesn't exist.
///
/// # Errors
///
/// Returns error if the file can't be read or isn't valid TOML
pub fn load_from(path: &Path) -> Result<Option<DevaConfigFile>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)?;
    Ok(Some(toml::from_str(&content)?))
}

/// Return the config file path: `~/.config/deva/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("deva").join("config.toml"))
}
