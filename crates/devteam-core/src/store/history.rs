//! History reconciliation.
//!
//! Pulled history may overlap with live events that already arrived. Items are
//! mapped into the live frame shape, filtered through the store's seen-id set and
//! merged ahead of the live events.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::HistoryScope;
use crate::constants::{kinds, DEFAULT_AGENT_NAME, DEFAULT_ROLE_NAME};
use crate::models::RawEvent;
use crate::store::EventLogStore;

/// Body of `GET /chat/history` or `GET /events/history`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryResponse {
    #[serde(default, alias = "runId")]
    pub run_id: Option<u64>,
    /// Chat-scope items
    #[serde(default)]
    pub messages: Vec<HistoryMessage>,
    /// Events-scope items, validated one by one
    #[serde(default)]
    pub events: Vec<Value>,
}

/// A stored chat message as returned by the chat history endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub agent: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub message_id: Option<Value>,
}

impl HistoryMessage {
    /// Same shape the live feed uses for `chat.message`.
    pub fn into_event(self) -> RawEvent {
        let mut payload = Map::new();
        payload.insert(
            "agent".into(),
            Value::String(self.agent.unwrap_or_else(|| DEFAULT_AGENT_NAME.to_string())),
        );
        payload.insert(
            "role".into(),
            Value::String(self.role.unwrap_or_else(|| DEFAULT_ROLE_NAME.to_string())),
        );
        payload.insert("content".into(), Value::String(self.content.unwrap_or_default()));
        if let Some(id) = self.message_id {
            payload.insert("message_id".into(), id);
        }
        RawEvent {
            kind: kinds::CHAT_MESSAGE.to_string(),
            payload,
            occurred_at: self.timestamp,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HistoryReconciler {
    scope: HistoryScope,
}

impl HistoryReconciler {
    pub fn new(scope: HistoryScope) -> Self {
        Self { scope }
    }

    pub fn scope(&self) -> HistoryScope {
        self.scope
    }

    /// Map a history response into events, in the order the server returned them.
    pub fn to_events(&self, response: HistoryResponse) -> Vec<RawEvent> {
        let mut events: Vec<RawEvent> = response
            .messages
            .into_iter()
            .map(HistoryMessage::into_event)
            .collect();

        for item in response.events {
            match serde_json::from_value::<RawEvent>(item) {
                Ok(event) => events.push(event),
                Err(e) => debug!("Skipping malformed history event: {}", e),
            }
        }
        events
    }

    /// Merge a response into the store. Returns the events actually admitted.
    pub fn reconcile(&self, store: &mut EventLogStore, response: HistoryResponse) -> Vec<RawEvent> {
        let fresh: Vec<RawEvent> = self
            .to_events(response)
            .into_iter()
            .filter(|event| !store.is_duplicate(event))
            .collect();
        store.merge(fresh)
    }
}
