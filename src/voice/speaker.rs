//! Character-aware speech for assistant replies

use std::sync::Arc;
use std::time::Duration;

use crate::persona::Character;

use super::SpeechSynthesizer;

/// Longest a whole reply may take to synthesize
pub const DEFAULT_SPEECH_BUDGET: Duration = Duration::from_secs(30);

/// Speaks replies in the selected character's accent
///
/// Synthesis failures never reach the caller; a failed, slow, or disabled
/// synthesis simply yields no audio.
#[derive(Clone)]
pub struct Speaker {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    lang: String,
    enabled: bool,
    budget: Duration,
}

impl Speaker {
    #[must_use]
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>, lang: impl Into<String>) -> Self {
        Self {
            synthesizer,
            lang: lang.into(),
            enabled: true,
            budget: DEFAULT_SPEECH_BUDGET,
        }
    }

    /// Bound the time spent on one reply across every chunk request
    #[must_use]
    pub fn budget(mut self, budget: Duration) -> Self {
        self.budget = budget;
        self
    }

    /// Turn audio generation on or off
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Synthesize `text` for `character`, or `None` if that fails
    pub async fn speak(&self, text: &str, character: Character) -> Option<Vec<u8>> {
        if !self.enabled || text.trim().is_empty() {
            return None;
        }

        let accent = character.tts_accent();
        tracing::debug!(character = %character, accent, "generating speech");

        let synthesis = self.synthesizer.synthesize(text, &self.lang, accent);
        match tokio::time::timeout(self.budget, synthesis).await {
            Ok(Ok(audio)) => Some(audio),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, character = %character, "speech synthesis failed, replying without audio");
                None
            }
            Err(_) => {
                tracing::warn!(
                    budget_ms = u64::try_from(self.budget.as_millis()).unwrap_or(u64::MAX),
                    character = %character,
                    "speech synthesis timed out, replying without audio"
                );
                None
            }
        }
    }
}
