//! Configuration management for the Deva gateway
//!
//! Values are resolved env > TOML file > default.

pub mod file;

use std::num::NonZeroUsize;
use std::time::Duration;

use secrecy::SecretString;

use crate::conversation::DEFAULT_MAX_SESSIONS;
use crate::voice::DEFAULT_SPEECH_BUDGET;
use crate::{Error, Result};

/// Default Gemini model
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Default Gemini REST base URL
pub const DEFAULT_LLM_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Deva gateway configuration
#[derive(Debug)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Language model configuration
    pub llm: LlmConfig,

    /// Speech synthesis configuration
    pub tts: TtsConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    /// Named conversations kept before the least recently used is dropped
    pub max_sessions: NonZeroUsize,
}

/// Language model configuration
#[derive(Debug)]
pub struct LlmConfig {
    /// Gemini API key (from `GEMINI_API_KEY`)
    pub api_key: SecretString,

    pub model: String,

    pub base_url: String,

    pub timeout: Duration,
}

/// Speech synthesis configuration
#[derive(Debug, Clone)]
pub struct TtsConfig {
    pub enabled: bool,

    /// Language code passed to the TTS provider
    pub lang: String,

    /// Endpoint override, used instead of the per-accent Google host
    pub base_url: Option<String>,

    /// Per-request timeout
    pub timeout: Duration,

    /// Time allowed for synthesizing one whole reply
    pub total_timeout: Duration,
}

impl Config {
    /// Load configuration from the process environment and config file
    ///
    /// # Errors
    ///
    /// Returns error if `GEMINI_API_KEY` is not set
    pub fn load() -> Result<Self> {
        let fc = file::load_config_file();
        Self::from_sources(fc, |key| std::env::var(key).ok())
    }

    /// Build configuration from a parsed config file and an env lookup
    ///
    /// # Errors
    ///
    /// Returns error if `GEMINI_API_KEY` is missing or blank
    pub fn from_sources(
        fc: file::DevaConfigFile,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let api_key = env("GEMINI_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| Error::Config("GEMINI_API_KEY not found".to_string()))?;

        let server = ServerConfig {
            host: env("DEVA_HOST")
                .or(fc.server.host)
                .unwrap_or_else(|| "127.0.0.1".to_string()),
            port: env("DEVA_PORT")
                .and_then(|s| s.parse().ok())
                .or(fc.server.port)
                .unwrap_or(5000),
            max_sessions: env("DEVA_MAX_SESSIONS")
                .and_then(|s| s.parse().ok())
                .or_else(|| fc.server.max_sessions.and_then(NonZeroUsize::new))
                .or_else(|| NonZeroUsize::new(DEFAULT_MAX_SESSIONS))
                .unwrap_or(NonZeroUsize::MIN),
        };

        let llm = LlmConfig {
            api_key: SecretString::from(api_key),
            model: env("DEVA_LLM_MODEL")
                .or(fc.llm.model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: env("DEVA_LLM_BASE_URL")
                .or(fc.llm.base_url)
                .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string()),
            timeout: Duration::from_secs(
                env("DEVA_LLM_TIMEOUT_SECS")
                    .and_then(|s| s.parse().ok())
                    .or(fc.llm.timeout_secs)
                    .unwrap_or(30),
            ),
        };

        let tts = TtsConfig {
            enabled: env("DEVA_TTS_ENABLED")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .or(fc.tts.enabled)
                .unwrap_or(true),
            lang: fc.tts.lang.unwrap_or_else(|| "en".to_string()),
            base_url: fc.tts.base_url,
            timeout: Duration::from_secs(
                env("DEVA_TTS_TIMEOUT_SECS")
                    .and_then(|s| s.parse().ok())
                    .or(fc.tts.timeout_secs)
                    .unwrap_or(15),
            ),
            total_timeout: env("DEVA_TTS_TOTAL_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .or(fc.tts.total_timeout_secs)
                .map_or(DEFAULT_SPEECH_BUDGET, Duration::from_secs),
        };

        Ok(Self { server, llm, tts })
    }
}
