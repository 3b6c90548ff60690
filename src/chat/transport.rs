//! HTTP transport for the Sage backend. The reply body streams back as
//! plain UTF-8 text; chunks are surfaced in arrival order, with bytes that
//! split a codepoint carried over into the next chunk.

use chrono::Utc;
use futures_util::StreamExt;
use serde::Serialize;
use uuid::Uuid;

use crate::error::ChatError;
use crate::store::KvStore;

use super::sessions::{HistoryTurn, SessionStore};

/// Request body for the chat endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<HistoryTurn>,
}

pub struct ChatClient {
    client: reqwest::Client,
    endpoint: String,
}

impl ChatClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// POST the request and stream the reply, calling `on_chunk` for each
    /// decoded piece of text as it arrives. Returns the full reply.
    /// No retries; the caller decides what a failure means.
    pub async fn stream_chat(
        &self,
        request: &ChatRequest,
        mut on_chunk: impl FnMut(&str),
    ) -> Result<String, reqwest::Error> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?
            .error_for_status()?;

        let mut stream = response.bytes_stream();
        let mut carry: Vec<u8> = Vec::new();
        let mut full = String::new();

        while let Some(chunk) = stream.next().await {
            let bytes = chunk?;
            carry.extend_from_slice(&bytes);

            // Decode the longest valid prefix; the tail of a split
            // codepoint stays in `carry` for the next chunk
            let valid = match std::str::from_utf8(&carry) {
                Ok(_) => carry.len(),
                Err(e) => e.valid_up_to(),
            };
            if valid == 0 {
                continue;
            }
            let rest = carry.split_off(valid);
            if let Ok(text) = std::str::from_utf8(&carry) {
                full.push_str(text);
                on_chunk(text);
            }
            carry = rest;
        }
        if !carry.is_empty() {
            log::warn!("dropping {} trailing bytes of invalid utf-8", carry.len());
        }
        Ok(full)
    }

    /// Drive one full exchange against a session: record the user message,
    /// stream the reply into the session buffer, and settle the session
    /// back to idle. A transport failure becomes the fallback reply; it is
    /// not an error to the caller.
    pub async fn send_message(
        &self,
        sessions: &mut SessionStore,
        kv: &mut dyn KvStore,
        session_id: Uuid,
        text: &str,
    ) -> Result<(), ChatError> {
        let history = sessions.start_exchange(kv, session_id, text, Utc::now())?;
        let request = ChatRequest { message: text.to_string(), history };

        let outcome = self
            .stream_chat(&request, |chunk| {
                // Flush-per-chunk keeps the persisted state at most one
                // chunk behind the stream
                if let Err(e) = sessions.append_chunk(kv, session_id, chunk) {
                    log::warn!("dropping chunk for missing session: {e}");
                }
            })
            .await;

        match outcome {
            Ok(_) => sessions.finish_streaming(kv, session_id, Utc::now()),
            Err(e) => {
                log::warn!("chat transport failed: {e}");
                sessions.fail_streaming(kv, session_id, Utc::now())
            },
        }
    }
}
