//! Session list and the Idle -> Streaming -> Idle state machine.
//!
//! Persistence is flush-on-mutation under the `sage-chats` key, including
//! once per streamed chunk, so the on-disk state is never more than one
//! chunk behind the live one. Sessions are matched by id throughout;
//! position in the list only encodes recency.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ChatError;
use crate::store::{self, KvStore};

use super::{ChatMessage, ChatSession, Role, EMPTY_REPLY, FALLBACK_REPLY, HISTORY_LIMIT};

const KEY: &str = "sage-chats";

/// One prior turn of context sent to the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryTurn {
    pub role: Role,
    pub content: String,
}

/// Shape of the persisted blob
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavedChats {
    chats: Vec<ChatSession>,
    last_active_id: Option<Uuid>,
}

pub struct SessionStore {
    chats: Vec<ChatSession>,
    active: Option<Uuid>,
}

impl SessionStore {
    /// Load sessions, reconciling any streaming state left over from an
    /// interrupted run: a non-empty transient buffer becomes a finalized
    /// assistant message. Missing or unreadable state seeds one fresh
    /// session with the greeting.
    pub fn load(kv: &mut dyn KvStore, now: DateTime<Utc>) -> Self {
        let mut sessions = match store::get::<SavedChats>(kv, KEY) {
            Some(saved) if !saved.chats.is_empty() => {
                let active = saved
                    .last_active_id
                    .filter(|id| saved.chats.iter().any(|c| c.id == *id))
                    .or(saved.chats.first().map(|c| c.id));
                Self { chats: saved.chats, active }
            },
            _ => {
                let session = ChatSession::new(now);
                let active = Some(session.id);
                Self { chats: vec![session], active }
            },
        };
        if sessions.reconcile(now) {
            log::info!("recovered interrupted reply on load");
        }
        sessions.persist(kv);
        sessions
    }

    pub fn persist(&self, kv: &mut dyn KvStore) {
        let saved = SavedChats {
            chats: self.chats.clone(),
            last_active_id: self.active,
        };
        if let Err(e) = store::set(kv, KEY, &saved) {
            log::warn!("failed to persist chats: {e}");
        }
    }

    pub fn sessions(&self) -> &[ChatSession] {
        &self.chats
    }

    pub fn active_id(&self) -> Option<Uuid> {
        self.active
    }

    pub fn get(&self, id: Uuid) -> Option<&ChatSession> {
        self.chats.iter().find(|c| c.id == id)
    }

    fn get_mut(&mut self, id: Uuid) -> Result<&mut ChatSession, ChatError> {
        self.chats
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(ChatError::SessionNotFound(id))
    }

    /// Open a fresh session and make it active
    pub fn new_session(&mut self, kv: &mut dyn KvStore, now: DateTime<Utc>) -> Uuid {
        let session = ChatSession::new(now);
        let id = session.id;
        self.chats.insert(0, session);
        self.active = Some(id);
        self.persist(kv);
        id
    }

    /// Delete a session; if it was active, the first remaining one takes
    /// over. Deleting the last session leaves the list empty.
    pub fn delete_session(&mut self, kv: &mut dyn KvStore, id: Uuid) {
        self.chats.retain(|c| c.id != id);
        if self.active == Some(id) {
            self.active = self.chats.first().map(|c| c.id);
        }
        self.persist(kv);
    }

    pub fn rename_session(
        &mut self,
        kv: &mut dyn KvStore,
        id: Uuid,
        title: &str,
        now: DateTime<Utc>,
    ) -> Result<(), ChatError> {
        let session = self.get_mut(id)?;
        session.title = title.to_string();
        session.updated_at = now;
        self.persist(kv);
        Ok(())
    }

    /// Begin an exchange: record the user message, enter Streaming, and
    /// return the context to send (the most recent prior turns plus this
    /// message). An untitled session takes the message as its title, and
    /// the session moves to the front of the list.
    pub fn start_exchange(
        &mut self,
        kv: &mut dyn KvStore,
        id: Uuid,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<HistoryTurn>, ChatError> {
        let session = self.get_mut(id)?;

        let mut history: Vec<HistoryTurn> = session
            .messages
            .iter()
            .rev()
            .take(HISTORY_LIMIT)
            .rev()
            .map(|m| HistoryTurn { role: m.role, content: m.content.clone() })
            .collect();
        history.push(HistoryTurn { role: Role::User, content: text.to_string() });

        session.messages.push(ChatMessage {
            role: Role::User,
            content: text.to_string(),
            time: now,
        });
        if session.title.is_empty() {
            session.title = text.to_string();
        }
        session.is_typing = true;
        session.streaming_reply.clear();
        session.updated_at = now;

        // Most recently used session first
        if let Some(idx) = self.chats.iter().position(|c| c.id == id) {
            let session = self.chats.remove(idx);
            self.chats.insert(0, session);
        }
        self.persist(kv);
        Ok(history)
    }

    /// Append one streamed chunk to the transient buffer and flush
    pub fn append_chunk(&mut self, kv: &mut dyn KvStore, id: Uuid, chunk: &str) -> Result<(), ChatError> {
        let session = self.get_mut(id)?;
        session.streaming_reply.push_str(chunk);
        self.persist(kv);
        Ok(())
    }

    /// Stream ended normally: the buffer becomes one assistant message.
    /// A reply that arrived empty is replaced with a short standing-by line
    /// so the exchange still gets an answer.
    pub fn finish_streaming(
        &mut self,
        kv: &mut dyn KvStore,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<(), ChatError> {
        let session = self.get_mut(id)?;
        let text = session.streaming_reply.trim().to_string();
        let content = if text.is_empty() { EMPTY_REPLY.to_string() } else { text };
        session.messages.push(ChatMessage { role: Role::Assistant, content, time: now });
        session.streaming_reply.clear();
        session.is_typing = false;
        session.updated_at = now;
        self.persist(kv);
        Ok(())
    }

    /// Transport failed before or during the stream: back to Idle with a
    /// fixed apology message. Any partial text was already flushed per
    /// chunk, so nothing is lost beyond what never arrived.
    pub fn fail_streaming(
        &mut self,
        kv: &mut dyn KvStore,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<(), ChatError> {
        let session = self.get_mut(id)?;
        session.streaming_reply.clear();
        session.is_typing = false;
        session.messages.push(ChatMessage {
            role: Role::Assistant,
            content: FALLBACK_REPLY.to_string(),
            time: now,
        });
        session.updated_at = now;
        self.persist(kv);
        Ok(())
    }

    /// Unload-time flush: finalize every non-empty transient buffer across
    /// all sessions, then persist
    pub fn flush_pending(&mut self, kv: &mut dyn KvStore, now: DateTime<Utc>) {
        self.reconcile(now);
        self.persist(kv);
    }

    fn reconcile(&mut self, now: DateTime<Utc>) -> bool {
        let mut changed = false;
        for session in &mut self.chats {
            if !session.streaming_reply.trim().is_empty() {
                let content = session.streaming_reply.trim().to_string();
                session.messages.push(ChatMessage { role: Role::Assistant, content, time: now });
                changed = true;
            }
            session.streaming_reply.clear();
            session.is_typing = false;
        }
        changed
    }
}
