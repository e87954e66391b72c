//! HTTP API server for the Deva gateway

pub mod chat;
pub mod health;
pub mod index;

use std::any::Any;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::response::{IntoResponse, Response};
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::Result;
use crate::assistant::Assistant;
use crate::conversation::Conversations;
use crate::llm::ChatModel;
use crate::voice::{DEFAULT_SPEECH_BUDGET, Speaker, SpeechSynthesizer};

/// Shared state for API handlers
pub struct AppState {
    pub conversations: Conversations,
    pub assistant: Assistant,
    pub speaker: Speaker,
}

impl AppState {
    #[must_use]
    pub fn new(conversations: Conversations, assistant: Assistant, speaker: Speaker) -> Self {
        Self {
            conversations,
            assistant,
            speaker,
        }
    }
}

/// Build the router with all routes
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    Router::new()
        .merge(index::router(state.clone()))
        .merge(chat::router(state))
        .merge(health::router())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Log a handler panic and answer with the generic 500 body
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    tracing::error!(panic = details, "request handler panicked");
    chat::ChatError::Internal.into_response()
}

/// Configuration for building an API server
pub struct ApiServerBuilder {
    model: Arc<dyn ChatModel>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    host: String,
    port: u16,
    max_sessions: Option<NonZeroUsize>,
    tts_lang: String,
    tts_enabled: bool,
    tts_budget: Duration,
}

impl ApiServerBuilder {
    /// Create a new API server builder
    #[must_use]
    pub fn new(model: Arc<dyn ChatModel>, synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        Self {
            model,
            synthesizer,
            host: "127.0.0.1".to_string(),
            port: 5000,
            max_sessions: None,
            tts_lang: "en".to_string(),
            tts_enabled: true,
            tts_budget: DEFAULT_SPEECH_BUDGET,
        }
    }

    /// Set the bind address
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the port to listen on
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set how many named conversations are kept in memory
    #[must_use]
    pub fn max_sessions(mut self, max_sessions: NonZeroUsize) -> Self {
        self.max_sessions = Some(max_sessions);
        self
    }

    /// Set speech configuration from `TtsConfig`
    #[must_use]
    pub fn tts_config(mut self, config: &crate::config::TtsConfig) -> Self {
        self.tts_lang.clone_from(&config.lang);
        self.tts_enabled = config.enabled;
        self.tts_budget = config.total_timeout;
        self
    }

    /// Build the API server
    #[must_use]
    pub fn build(self) -> ApiServer {
        let conversations = self
            .max_sessions
            .map_or_else(Conversations::new, Conversations::with_capacity);
        let assistant = Assistant::new(self.model);
        let speaker = Speaker::new(self.synthesizer, self.tts_lang)
            .enabled(self.tts_enabled)
            .budget(self.tts_budget);

        ApiServer {
            state: Arc::new(AppState::new(conversations, assistant, speaker)),
            addr: format!("{}:{}", self.host, self.port),
        }
    }
}

/// API server
pub struct ApiServer {
    state: Arc<AppState>,
    addr: String,
}

impl ApiServer {
    /// Run the API server until interrupted
    ///
    /// # Errors
    ///
    /// Returns error if server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(&self.addr)
            .await
            .map_err(|e| crate::Error::Config(format!("failed to bind API server on {}: {e}", self.addr)))?;

        tracing::info!(
            addr = %self.addr,
            tts = self.state.speaker.is_enabled(),
            "API server listening"
        );

        axum::serve(listener, router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| crate::Error::Config(format!("API server error: {e}")))?;

        tracing::info!("API server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
