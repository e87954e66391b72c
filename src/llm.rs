//! Language model client
//!
//! [`ChatModel`] is the seam between the assistant and the hosted provider.
//! [`GeminiClient`] talks to the Gemini `generateContent` REST endpoint.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::conversation::Turn;
use crate::{Error, Result};

/// A hosted model that continues a conversation
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate a reply to `message` given the prior turns
    ///
    /// # Errors
    ///
    /// Returns error on any provider failure (network, quota, content policy)
    async fn generate(
        &self,
        system_instruction: &str,
        history: &[Turn],
        message: &str,
    ) -> Result<String>;
}

/// Gemini REST client
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            api_key: SecretString::from(config.api_key.expose_secret().to_string()),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl ChatModel for GeminiClient {
    async fn generate(
        &self,
        system_instruction: &str,
        history: &[Turn],
        message: &str,
    ) -> Result<String> {
        let request = GenerateContentRequest::new(system_instruction, history, message);

        tracing::debug!(
            model = %self.model,
            history = history.len(),
            "sending generateContent request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Llm(format!("Gemini error {status}: {body}")));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        parsed.into_text()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: SystemInstruction<'a>,
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct SystemInstruction<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

impl<'a> GenerateContentRequest<'a> {
    fn new(system_instruction: &'a str, history: &'a [Turn], message: &'a str) -> Self {
        let contents = history
            .iter()
            .map(|turn| Content {
                role: turn.role.as_str(),
                parts: [Part { text: &turn.text }],
            })
            .chain(std::iter::once(Content {
                role: "user",
                parts: [Part { text: message }],
            }))
            .collect();

        Self {
            system_instruction: SystemInstruction {
                parts: [Part {
                    text: system_instruction,
                }],
            },
            contents,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    fn into_text(self) -> Result<String> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(Error::Llm(format!("prompt blocked: {reason}")));
        }

        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(Error::Llm("response contained no text".to_string()));
        }

        Ok(text)
    }
}
