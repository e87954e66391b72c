//! In-memory conversation state
//!
//! A [`ConversationStore`] is the ordered turn log for one session. Stores are
//! handed out by [`Conversations`] behind a `tokio` mutex, so every exchange on a
//! session is serialized. Callers that never name a session share
//! [`DEFAULT_SESSION`].

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// Session used when the caller does not supply one
pub const DEFAULT_SESSION: &str = "default";

/// Author of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    /// Wire name used by the LLM provider
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

/// One message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    /// Create a user turn
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    /// Create a model turn
    #[must_use]
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// Ordered turn log for a single session
#[derive(Debug, Default, Clone)]
pub struct ConversationStore {
    turns: Vec<Turn>,
}

impl ConversationStore {
    #[must_use]
    pub const fn new() -> Self {
        Self { turns: Vec::new() }
    }

    /// Add a turn to the end of the log
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Drop every turn
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Copy of the current log
    #[must_use]
    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.clone()
    }

    /// Borrowed view of the log
    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Discard turns past `len`
    pub fn truncate(&mut self, len: usize) {
        self.turns.truncate(len);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// Shared handle to one session's store
pub type SharedStore = Arc<Mutex<ConversationStore>>;

/// Named sessions kept before the least recently used one is dropped
pub const DEFAULT_MAX_SESSIONS: usize = 1024;

/// Registry of conversation stores keyed by session id
///
/// The default session is always kept. Named sessions live in an LRU bounded
/// by the configured capacity.
#[derive(Debug, Clone)]
pub struct Conversations {
    default: SharedStore,
    named: Arc<Mutex<LruCache<String, SharedStore>>>,
}

impl Default for Conversations {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversations {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(NonZeroUsize::new(DEFAULT_MAX_SESSIONS).unwrap_or(NonZeroUsize::MIN))
    }

    /// Create a registry holding at most `max_sessions` named sessions
    #[must_use]
    pub fn with_capacity(max_sessions: NonZeroUsize) -> Self {
        Self {
            default: SharedStore::default(),
            named: Arc::new(Mutex::new(LruCache::new(max_sessions))),
        }
    }

    /// Resolve the session id a request refers to
    ///
    /// Missing or blank ids map to [`DEFAULT_SESSION`].
    #[must_use]
    pub fn session_key(id: Option<&str>) -> &str {
        match id.map(str::trim) {
            Some(id) if !id.is_empty() => id,
            _ => DEFAULT_SESSION,
        }
    }

    /// Get the store for a session, creating it on first use
    pub async fn session(&self, id: Option<&str>) -> SharedStore {
        let key = Self::session_key(id);
        if key == DEFAULT_SESSION {
            return self.default.clone();
        }

        let mut named = self.named.lock().await;
        if let Some(store) = named.get(key) {
            return store.clone();
        }

        let store = SharedStore::default();
        if let Some((evicted, _)) = named.push(key.to_string(), store.clone()) {
            tracing::debug!(session = %evicted, "evicted least recently used conversation");
        }
        store
    }

    /// Clear one session's history
    ///
    /// Unknown sessions are left alone. Waits for any exchange in flight on
    /// that session to finish.
    pub async fn clear(&self, id: Option<&str>) {
        let key = Self::session_key(id);
        let store = if key == DEFAULT_SESSION {
            Some(self.default.clone())
        } else {
            self.named.lock().await.peek(key).cloned()
        };

        if let Some(store) = store {
            store.lock().await.clear();
            tracing::debug!(session = key, "conversation history cleared");
        }
    }

    /// Clear every session's history
    pub async fn clear_all(&self) {
        let mut stores: Vec<SharedStore> = self
            .named
            .lock()
            .await
            .iter()
            .map(|(_, store)| store.clone())
            .collect();
        stores.push(self.default.clone());

        for store in stores {
            store.lock().await.clear();
        }
    }

    /// Number of known sessions, counting the default one
    pub async fn session_count(&self) -> usize {
        self.named.lock().await.len() + 1
    }
}
