//! Text-to-speech (TTS) processing

use async_trait::async_trait;

use crate::config::TtsConfig;
use crate::{Error, Result};

/// Longest text Google Translate TTS accepts per request
pub const MAX_CHUNK_CHARS: usize = 100;

/// Characters a chunk may be split after
const SPLIT_AFTER: &[char] = &['.', ',', ';', ':', '!', '?', '\u{2026}'];

/// A hosted speech synthesis backend
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize text to encoded audio
    ///
    /// # Arguments
    ///
    /// * `text` - Text to synthesize
    /// * `lang` - Language code (e.g. "en")
    /// * `accent` - Provider accent selector (e.g. "co.in")
    ///
    /// # Errors
    ///
    /// Returns error if synthesis fails
    async fn synthesize(&self, text: &str, lang: &str, accent: &str) -> Result<Vec<u8>>;
}

/// Synthesizes speech through the Google Translate TTS endpoint
pub struct TranslateTts {
    client: reqwest::Client,
    base_url: Option<String>,
}

impl TranslateTts {
    /// Create a TTS instance from configuration
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn new(config: &TtsConfig) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config
                .base_url
                .as_deref()
                .map(|u| u.trim_end_matches('/').to_string()),
        })
    }

    fn endpoint(&self, accent: &str) -> String {
        self.base_url.as_ref().map_or_else(
            || format!("https://translate.google.{accent}/translate_tts"),
            |base| format!("{base}/translate_tts"),
        )
    }

    async fn fetch_chunk(
        &self,
        url: &str,
        chunk: &str,
        lang: &str,
        idx: usize,
        total: usize,
    ) -> Result<Vec<u8>> {
        let query = [
            ("ie", "UTF-8".to_string()),
            ("q", chunk.to_string()),
            ("tl", lang.to_string()),
            ("ttsspeed", "1".to_string()),
            ("total", total.to_string()),
            ("idx", idx.to_string()),
            ("client", "tw-ob".to_string()),
            ("textlen", chunk.chars().count().to_string()),
        ];

        let response = self.client.get(url).query(&query).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Error::Tts(format!(
                "translate TTS error {status} on chunk {idx}/{total}"
            )));
        }

        let audio = response.bytes().await?;
        if audio.is_empty() {
            return Err(Error::Tts(format!("empty audio for chunk {idx}/{total}")));
        }
        Ok(audio.to_vec())
    }
}

#[async_trait]
impl SpeechSynthesizer for TranslateTts {
    async fn synthesize(&self, text: &str, lang: &str, accent: &str) -> Result<Vec<u8>> {
        let chunks = split_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(Error::Tts("no speakable text".to_string()));
        }

        let url = self.endpoint(accent);
        let total = chunks.len();
        let mut audio = Vec::new();

        // MP3 frames are self-delimiting, so chunk bodies concatenate cleanly
        for (idx, chunk) in chunks.iter().enumerate() {
            audio.extend(self.fetch_chunk(&url, chunk, lang, idx, total).await?);
        }

        tracing::debug!(chunks = total, bytes = audio.len(), accent, "synthesized speech");
        Ok(audio)
    }
}

/// Split text into chunks of at most `max_chars` characters
///
/// Prefers to cut after whitespace or punctuation, falling back to a hard cut.
/// Chunks without any alphanumeric character are dropped.
#[must_use]
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut rest = text.trim();

    while !rest.is_empty() {
        let Some((limit, _)) = rest.char_indices().nth(max_chars) else {
            push_chunk(&mut chunks, rest);
            break;
        };

        let window = &rest[..limit];
        let cut = window
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace() || SPLIT_AFTER.contains(c))
            .map_or(limit, |(i, c)| i + c.len_utf8());

        let (head, tail) = rest.split_at(cut);
        push_chunk(&mut chunks, head);
        rest = tail.trim_start();
    }

    chunks
}

fn push_chunk(chunks: &mut Vec<String>, chunk: &str) {
    let chunk = chunk.trim();
    if chunk.chars().any(char::is_alphanumeric) {
        chunks.push(chunk.to_string());
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(split_text("  Hello Sir!  ", 100), vec!["Hello Sir!"]);
    }

    #[test]
    fn long_text_splits_on_boundaries() {
        let text = "Good morning Sir. The weather today is sunny, with a light breeze from the west and no rain expected at all. Have a great day!";
        let chunks = split_text(text, MAX_CHUNK_CHARS);

        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.chars().count() <= MAX_CHUNK_CHARS));
        assert_eq!(chunks.join(" ").split_whitespace().count(), text.split_whitespace().count());
    }

    #[test]
    fn unbroken_text_is_hard_cut() {
        let text = "a".repeat(250);
        let chunks = split_text(&text, 100);
        assert_eq!(chunks.iter().map(String::len).collect::<Vec<_>>(), vec![100, 100, 50]);
    }

    #[test]
    fn multibyte_text_is_cut_on_char_boundaries() {
        let text = "\u{0928}".repeat(150);
        let chunks = split_text(&text, 100);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chars().count(), 100);
    }

    #[test]
    fn punctuation_only_is_dropped() {
        assert!(split_text("... !!", 100).is_empty());
        assert!(split_text("", 100).is_empty());
    }

    fn config(base_url: &str) -> TtsConfig {
        TtsConfig {
            enabled: true,
            lang: "en".to_string(),
            base_url: Some(base_url.to_string()),
            timeout: Duration::from_secs(5),
            total_timeout: Duration::from_secs(10),
        }
    }

    #[test]
    fn endpoint_uses_accent_domain_by_default() {
        let tts = TranslateTts::new(&TtsConfig {
            base_url: None,
            ..config("unused")
        })
        .unwrap();
        assert_eq!(
            tts.endpoint("com.au"),
            "https://translate.google.com.au/translate_tts"
        );
    }

    #[tokio::test]
    async fn synthesize_concatenates_chunks() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/translate_tts")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("tl".into(), "en".into()),
                mockito::Matcher::UrlEncoded("client".into(), "tw-ob".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "audio/mpeg")
            .with_body(vec![0xFF_u8, 0xF3])
            .expect(2)
            .create_async()
            .await;

        let tts = TranslateTts::new(&config(&server.url())).unwrap();
        let text = format!("{} {}", "word ".repeat(15), "more ".repeat(15));
        let audio = tts.synthesize(&text, "en", "co.in").await.unwrap();

        assert_eq!(audio, vec![0xFF, 0xF3, 0xFF, 0xF3]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn provider_failure_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/translate_tts")
            .match_query(mockito::Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let tts = TranslateTts::new(&config(&server.url())).unwrap();
        let err = tts.synthesize("Hello", "en", "co.in").await.unwrap_err();
        assert!(matches!(err, Error::Tts(_)));
    }
}
