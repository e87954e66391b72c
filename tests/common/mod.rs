//! Shared test utilities

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use deva_gateway::api::AppState;
use deva_gateway::{
    Assistant, ChatModel, Conversations, Error, Result, Speaker, SpeechSynthesizer, Turn,
};

/// What the fake model does when called
#[derive(Clone)]
pub enum ModelBehavior {
    Reply(String),
    Fail,
    Panic,
    /// Reply after a delay, echoing the message
    SlowEcho(Duration),
}

/// One recorded `ChatModel::generate` call
#[derive(Debug, Clone)]
pub struct ModelCall {
    pub system_instruction: String,
    pub history: Vec<Turn>,
    pub message: String,
}

/// Chat model that records calls and follows a fixed behavior
pub struct FakeModel {
    behavior: Mutex<ModelBehavior>,
    pub calls: Mutex<Vec<ModelCall>>,
}

impl FakeModel {
    pub fn new(behavior: ModelBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior: Mutex::new(behavior),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(text: &str) -> Arc<Self> {
        Self::new(ModelBehavior::Reply(text.to_string()))
    }

    pub fn set_behavior(&self, behavior: ModelBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    pub fn calls(&self) -> Vec<ModelCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for FakeModel {
    async fn generate(
        &self,
        system_instruction: &str,
        history: &[Turn],
        message: &str,
    ) -> Result<String> {
        self.calls.lock().unwrap().push(ModelCall {
            system_instruction: system_instruction.to_string(),
            history: history.to_vec(),
            message: message.to_string(),
        });

        let behavior = self.behavior.lock().unwrap().clone();
        match behavior {
            ModelBehavior::Reply(text) => Ok(text),
            ModelBehavior::Fail => Err(Error::Llm("simulated quota exceeded".to_string())),
            ModelBehavior::Panic => panic!("simulated model crash"),
            ModelBehavior::SlowEcho(delay) => {
                tokio::time::sleep(delay).await;
                Ok(format!("echo: {message}"))
            }
        }
    }
}

/// One recorded `SpeechSynthesizer::synthesize` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechCall {
    pub text: String,
    pub lang: String,
    pub accent: String,
}

/// Synthesizer that records calls and returns fixed bytes
pub struct FakeSynth {
    fail: bool,
    delay: Option<Duration>,
    pub calls: Mutex<Vec<SpeechCall>>,
}

/// Audio bytes returned by a succeeding [`FakeSynth`]
pub const FAKE_AUDIO: &[u8] = b"ID3fake-mp3";

impl FakeSynth {
    pub fn working() -> Arc<Self> {
        Arc::new(Self {
            fail: false,
            delay: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            delay: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Succeeds, but only after `delay`
    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            fail: false,
            delay: Some(delay),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<SpeechCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechSynthesizer for FakeSynth {
    async fn synthesize(&self, text: &str, lang: &str, accent: &str) -> Result<Vec<u8>> {
        self.calls.lock().unwrap().push(SpeechCall {
            text: text.to_string(),
            lang: lang.to_string(),
            accent: accent.to_string(),
        });
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            Err(Error::Tts("simulated TTS outage".to_string()))
        } else {
            Ok(FAKE_AUDIO.to_vec())
        }
    }
}

/// Build handler state around fake providers
pub fn test_state(model: Arc<FakeModel>, synth: Arc<FakeSynth>) -> Arc<AppState> {
    test_state_with(Conversations::new(), Speaker::new(synth, "en"), model)
}

/// Build handler state with an explicit registry and speaker
pub fn test_state_with(
    conversations: Conversations,
    speaker: Speaker,
    model: Arc<FakeModel>,
) -> Arc<AppState> {
    Arc::new(AppState::new(conversations, Assistant::new(model), speaker))
}

/// Build a JSON POST request
pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Read a response body as JSON
pub async fn json_body(response: Response<Body>) -> (StatusCode, serde_json::Value) {
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

/// Number of turns in the default session
pub async fn default_history_len(state: &AppState) -> usize {
    state.conversations.session(None).await.lock().await.len()
}
