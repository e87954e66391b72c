//! Chat and history endpoints

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::persona::Character;

/// Generic reply used when a request fails unexpectedly
pub const INTERNAL_ERROR_MESSAGE: &str = "Sorry, an internal error occurred.";

/// Build chat router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/clear_history", post(clear_history))
        .with_state(state)
}

/// Chat request body
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub query: Option<String>,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Chat response body
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatResponse {
    pub response: String,
    /// Base64-encoded MP3, absent when synthesis failed or was skipped
    pub audio_content: Option<String>,
}

/// Answer a query with text and, when available, spoken audio
async fn chat(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ChatResponse>, ChatError> {
    let request: ChatRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(error = %e, "rejecting malformed chat body");
        ChatError::BadRequest("Invalid JSON body")
    })?;

    let query = match request.query.as_deref() {
        Some(q) if !q.trim().is_empty() => q,
        _ => return Err(ChatError::BadRequest("No query provided")),
    };
    let character = Character::parse(request.character.as_deref());

    let store = state.conversations.session(request.session_id.as_deref()).await;

    let reply = match state.assistant.respond(query, &store, character).await {
        Ok(reply) => reply,
        Err(e) => {
            return Ok(Json(ChatResponse {
                response: e.user_message().to_string(),
                audio_content: None,
            }));
        }
    };

    let audio_content = state
        .speaker
        .speak(&reply, character)
        .await
        .map(|audio| BASE64_STANDARD.encode(audio));

    tracing::info!(
        character = %character,
        reply_chars = reply.len(),
        has_audio = audio_content.is_some(),
        "chat reply sent"
    );

    Ok(Json(ChatResponse {
        response: reply,
        audio_content,
    }))
}

/// Optional clear-history request body
#[derive(Debug, Default, Deserialize)]
pub struct ClearHistoryRequest {
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Clear-history response body
#[derive(Debug, Serialize)]
pub struct ClearHistoryResponse {
    pub message: &'static str,
}

/// Forget a session's conversation
async fn clear_history(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Json<ClearHistoryResponse> {
    let request: ClearHistoryRequest = serde_json::from_slice(&body).unwrap_or_default();
    state.conversations.clear(request.session_id.as_deref()).await;

    Json(ClearHistoryResponse {
        message: "Conversation history cleared.",
    })
}

/// Chat API errors
#[derive(Debug)]
pub enum ChatError {
    /// Client sent an unusable body
    BadRequest(&'static str),
    /// Unexpected failure; details stay in the logs
    Internal,
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: &'static str,
        }

        match self {
            Self::BadRequest(error) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { error })).into_response()
            }
            Self::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ChatResponse {
                    response: INTERNAL_ERROR_MESSAGE.to_string(),
                    audio_content: None,
                }),
            )
                .into_response(),
        }
    }
}
