use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::kinds;
use crate::error::ConsoleError;

/// One structured notification from the orchestration backend.
///
/// Ordering is arrival/merge order only; `occurred_at` is display-only and may be
/// missing or skewed between the live feed and history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(rename = "type", alias = "kind")]
    pub kind: String,
    #[serde(default)]
    pub payload: Map<String, Value>,
    #[serde(
        rename = "timestamp",
        alias = "occurredAt",
        alias = "occurred_at",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub occurred_at: Option<String>,
}

/// Classified event kind, as consumed by the projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    ChatMessage,
    AgentResponse,
    ToolRequested,
    ToolCompleted,
    ThinkingStarted,
    ThinkingStopped,
    TeamBreak,
    TeamAttention,
    TeamResume,
    MemoryUpdated,
    File,
    Notification,
    Other,
}

impl RawEvent {
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        let payload = match payload {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            kind: kind.into(),
            payload,
            occurred_at: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.occurred_at = Some(timestamp.into());
        self
    }

    /// Decode one newline-delimited frame from the push channel.
    pub fn from_frame(line: &str) -> Result<Self, ConsoleError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(ConsoleError::malformed("empty frame"));
        }
        serde_json::from_str(line).map_err(|e| ConsoleError::malformed(e.to_string()))
    }

    /// Dedup key. Integer ids are stringified; empty strings count as absent.
    pub fn message_id(&self) -> Option<String> {
        match self.payload.get("message_id")? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(Value::as_str)
    }

    /// Agent name carried by the payload, if any
    pub fn agent(&self) -> Option<&str> {
        self.str_field("agent")
    }

    /// Display timestamp: the frame's own, falling back to the payload's
    pub fn timestamp(&self) -> Option<&str> {
        self.occurred_at
            .as_deref()
            .or_else(|| self.str_field("timestamp"))
    }

    pub fn event_kind(&self) -> EventKind {
        match self.kind.as_str() {
            kinds::CHAT_MESSAGE => EventKind::ChatMessage,
            kinds::AGENT_RESPONSE => EventKind::AgentResponse,
            kinds::TOOL_REQUESTED => EventKind::ToolRequested,
            kinds::TOOL_COMPLETED => EventKind::ToolCompleted,
            kinds::AGENT_THINKING_STARTED => EventKind::ThinkingStarted,
            kinds::AGENT_THINKING_STOPPED => EventKind::ThinkingStopped,
            kinds::AGENT_THINKING => self.thinking_state(),
            kinds::TEAM_BREAK => EventKind::TeamBreak,
            kinds::TEAM_ATTENTION => EventKind::TeamAttention,
            kinds::TEAM_RESUME => EventKind::TeamResume,
            kinds::MEMORY_UPDATED => EventKind::MemoryUpdated,
            kinds::NOTIFICATION_REQUESTED => EventKind::Notification,
            k if k.starts_with(kinds::FILE_PREFIX) => EventKind::File,
            _ => EventKind::Other,
        }
    }

    /// `agent.thinking` carries its state in the payload; a bare event means started.
    fn thinking_state(&self) -> EventKind {
        if let Some(thinking) = self.payload.get("thinking").and_then(Value::as_bool) {
            return if thinking {
                EventKind::ThinkingStarted
            } else {
                EventKind::ThinkingStopped
            };
        }
        let state = self.str_field("state").or_else(|| self.str_field("status"));
        match state.map(str::to_ascii_lowercase).as_deref() {
            Some("stopped" | "stop" | "done" | "finished" | "idle") => EventKind::ThinkingStopped,
            _ => EventKind::ThinkingStarted,
        }
    }
}
