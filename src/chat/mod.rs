//! Sage chat: per-session message history with a streaming assistant reply.
//!
//! A reply streams into a transient per-session buffer and is only
//! finalized into the message list when the stream ends. Every path out of
//! the streaming state (completion, transport failure, unload, reload)
//! preserves whatever text already arrived; a partial reply is valid data
//! and is never discarded.

mod sessions;
mod transport;

pub use sessions::{HistoryTurn, SessionStore};
pub use transport::{ChatClient, ChatRequest};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opening message of every new session
pub const GREETING: &str = "Hello, friend! 🌸 I'm here to listen and support you. How are you feeling today? You can type or use the microphone to talk to me.";

/// Assistant message appended when the transport fails
pub const FALLBACK_REPLY: &str =
    "Sorry, I couldn't connect to my brain right now. Please try again soon!";

/// Stands in for a reply that streamed to completion with no content
pub const EMPTY_REPLY: &str = "I'm here for you.";

/// Prior turns sent as context with each message
pub const HISTORY_LIMIT: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: Uuid,
    /// Empty until the first user message, which becomes the title
    #[serde(default)]
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub messages: Vec<ChatMessage>,
    /// True while a reply is streaming in
    #[serde(default)]
    pub is_typing: bool,
    /// Reply text received so far; empty when idle
    #[serde(default)]
    pub streaming_reply: String,
}

impl ChatSession {
    /// Fresh session opened with the Sage greeting
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: String::new(),
            created_at: now,
            updated_at: now,
            messages: vec![ChatMessage {
                role: Role::Assistant,
                content: GREETING.to_string(),
                time: now,
            }],
            is_typing: false,
            streaming_reply: String::new(),
        }
    }
}
