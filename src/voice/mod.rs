//! Voice output
//!
//! Replies are spoken through a hosted TTS provider and returned as audio
//! bytes; nothing is played locally.

mod speaker;
mod tts;

pub use speaker::{DEFAULT_SPEECH_BUDGET, Speaker};
pub use tts::{MAX_CHUNK_CHARS, SpeechSynthesizer, TranslateTts, split_text};
