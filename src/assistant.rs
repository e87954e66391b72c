//! Conversational assistant
//!
//! [`Assistant::respond`] runs one exchange against a session's store: the user
//! turn is appended, the model is called with everything before it as context,
//! and the model turn is appended on success. A failed exchange leaves the store
//! exactly as it found it.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

use crate::conversation::{ConversationStore, Turn};
use crate::llm::ChatModel;
use crate::markdown::strip_bold;
use crate::persona::Character;

/// Shown when the query is empty
pub const EMPTY_INPUT_MESSAGE: &str = "Error: Message cannot be empty";

/// Shown when the model provider fails
pub const PROVIDER_FAILURE_MESSAGE: &str =
    "Sorry, I had trouble connecting to the AI. Please try again.";

/// Why an exchange produced no reply
#[derive(Debug, Error)]
pub enum AssistantError {
    /// The query was empty or whitespace
    #[error("message cannot be empty")]
    EmptyInput,

    /// The model provider failed; the store was rolled back
    #[error("provider failure: {0}")]
    Provider(#[source] crate::Error),
}

impl AssistantError {
    /// Text safe to show the end user
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::EmptyInput => EMPTY_INPUT_MESSAGE,
            Self::Provider(_) => PROVIDER_FAILURE_MESSAGE,
        }
    }
}

/// Relays queries to a chat model with conversation context
#[derive(Clone)]
pub struct Assistant {
    model: Arc<dyn ChatModel>,
}

impl Assistant {
    #[must_use]
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Answer `query` as `character`, extending `store` on success
    ///
    /// The store stays locked for the whole exchange, so exchanges on one
    /// session never interleave.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::EmptyInput`] for a blank query and
    /// [`AssistantError::Provider`] if the model call fails
    pub async fn respond(
        &self,
        query: &str,
        store: &Mutex<ConversationStore>,
        character: Character,
    ) -> Result<String, AssistantError> {
        if query.trim().is_empty() {
            return Err(AssistantError::EmptyInput);
        }

        let mut guard = store.lock().await;
        let mut exchange = Exchange::begin(&mut guard, Turn::user(query));
        let context = exchange.context();

        tracing::debug!(
            character = %character,
            context_turns = context.len(),
            "requesting model reply"
        );

        match self
            .model
            .generate(character.system_instruction(), &context, query)
            .await
        {
            Ok(reply) => {
                let cleaned = strip_bold(&reply);
                exchange.commit(Turn::model(reply));
                Ok(cleaned)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    character = %character,
                    "model provider failed, rolling back user turn"
                );
                Err(AssistantError::Provider(e))
            }
        }
    }
}

/// An exchange in progress
///
/// Dropping it without [`Exchange::commit`] removes the pending user turn,
/// including when the model call panics.
struct Exchange<'a> {
    store: &'a mut ConversationStore,
    rollback_len: usize,
    committed: bool,
}

impl<'a> Exchange<'a> {
    fn begin(store: &'a mut ConversationStore, user_turn: Turn) -> Self {
        let rollback_len = store.len();
        store.append(user_turn);
        Self {
            store,
            rollback_len,
            committed: false,
        }
    }

    /// Every turn except the pending user turn
    fn context(&self) -> Vec<Turn> {
        self.store.turns()[..self.rollback_len].to_vec()
    }

    fn commit(&mut self, model_turn: Turn) {
        self.store.append(model_turn);
        self.committed = true;
    }
}

impl Drop for Exchange<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.store.truncate(self.rollback_len);
        }
    }
}
