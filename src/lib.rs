//! Deva Gateway - Voice assistant web backend
//!
//! This library provides the pieces behind the Deva web assistant:
//! - Per-session conversation history
//! - Character selection (system prompt and voice accent)
//! - LLM replies via the Gemini API
//! - Spoken replies via a hosted TTS endpoint
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                  HTTP API (axum)                    │
//! │        /        │      /chat      │ /clear_history  │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │  Conversations  │  Assistant  │  Speaker            │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │        Gemini (LLM)      │    Translate TTS         │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod assistant;
pub mod config;
pub mod conversation;
pub mod error;
pub mod greeting;
pub mod llm;
pub mod markdown;
pub mod persona;
pub mod voice;

pub use assistant::{Assistant, AssistantError};
pub use config::Config;
pub use conversation::{ConversationStore, Conversations, Role, Turn};
pub use error::{Error, Result};
pub use llm::{ChatModel, GeminiClient};
pub use persona::Character;
pub use voice::{Speaker, SpeechSynthesizer, TranslateTts};
