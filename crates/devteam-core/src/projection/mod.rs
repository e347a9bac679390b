//! Pure projections over the event log.
//!
//! Every view here is re-derivable from the store contents alone. The engine
//! memoizes the last derivation by store version, so unrelated UI refreshes do
//! not walk the log again.

pub mod activity;
pub mod pending;

use std::collections::{BTreeSet, HashSet, VecDeque};

use serde_json::Value;

use crate::constants::{DEFAULT_AGENT_NAME, DEFAULT_ROLE_NAME};
use crate::models::{EventKind, RawEvent};
use crate::store::EventLogStore;

pub use activity::{thinking_line, tool_line};
pub use pending::PendingReplies;

/// Session-wide pause flag. Last event wins; resume always returns to `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PauseMode {
    #[default]
    None,
    Break,
    Attention,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub agent: String,
    pub role: String,
    pub content: String,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentReply {
    pub agent: String,
    pub content: String,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileActivity {
    pub kind: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryNote {
    pub agent: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEntry {
    pub title: String,
    pub body: String,
    pub targets: Vec<String>,
}

/// Aggregates over the retained window (not all-time totals).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counters {
    pub events: usize,
    /// Distinct `agent.response` authors
    pub distinct_agents: usize,
    pub file_events: usize,
    pub memory_updates: usize,
    pub chat_messages: usize,
    pub agent_responses: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectionState {
    pub chat_transcript: Vec<ChatEntry>,
    pub agent_replies: Vec<AgentReply>,
    /// Last `activity_window` tool/thinking lines, oldest first
    pub activity_log: Vec<String>,
    pub thinking_agents: BTreeSet<String>,
    pub pause_mode: PauseMode,
    pub file_events: Vec<FileActivity>,
    pub memory_notes: Vec<MemoryNote>,
    pub notifications: Vec<NotificationEntry>,
    pub counters: Counters,
}

pub struct ProjectionEngine {
    activity_window: usize,
    state: ProjectionState,
    cached_version: Option<u64>,
    recomputations: u64,
}

impl ProjectionEngine {
    pub fn new(activity_window: usize) -> Self {
        Self {
            activity_window,
            state: ProjectionState::default(),
            cached_version: None,
            recomputations: 0,
        }
    }

    /// Current projection, recomputed only if the store changed since last call.
    pub fn project(&mut self, store: &EventLogStore) -> &ProjectionState {
        if self.cached_version != Some(store.version()) {
            self.state = derive(store.iter(), self.activity_window);
            self.cached_version = Some(store.version());
            self.recomputations += 1;
        }
        &self.state
    }

    /// Forget the cached projection (e.g. after the store was swapped out).
    pub fn invalidate(&mut self) {
        self.cached_version = None;
    }

    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }
}

fn payload_string(event: &RawEvent, key: &str, default: &str) -> String {
    match event.payload.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => default.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Fold the log, in store order, into every derived view.
pub fn derive<'a>(
    events: impl Iterator<Item = &'a RawEvent>,
    activity_window: usize,
) -> ProjectionState {
    let mut state = ProjectionState::default();
    let mut activity: VecDeque<String> = VecDeque::with_capacity(activity_window + 1);
    let mut agents: HashSet<String> = HashSet::new();

    let mut push_activity = |line: String| {
        activity.push_back(line);
        while activity.len() > activity_window {
            activity.pop_front();
        }
    };

    for event in events {
        state.counters.events += 1;
        match event.event_kind() {
            EventKind::ChatMessage => {
                let entry = ChatEntry {
                    agent: payload_string(event, "agent", DEFAULT_AGENT_NAME),
                    role: payload_string(event, "role", DEFAULT_ROLE_NAME),
                    content: payload_string(event, "content", ""),
                    timestamp: event.timestamp().map(str::to_string),
                };
                state.counters.chat_messages += 1;
                state.chat_transcript.push(entry);
            }
            EventKind::AgentResponse => {
                let reply = AgentReply {
                    agent: payload_string(event, "agent", DEFAULT_AGENT_NAME),
                    content: payload_string(event, "content", ""),
                    timestamp: event.timestamp().map(str::to_string),
                };
                agents.insert(reply.agent.clone());
                state.counters.agent_responses += 1;
                state.agent_replies.push(reply);
            }
            EventKind::ToolRequested => push_activity(tool_line(event)),
            EventKind::ThinkingStarted => {
                let agent = payload_string(event, "agent", DEFAULT_AGENT_NAME);
                push_activity(thinking_line(&agent));
                state.thinking_agents.insert(agent);
            }
            EventKind::ThinkingStopped => {
                let agent = payload_string(event, "agent", DEFAULT_AGENT_NAME);
                state.thinking_agents.remove(&agent);
            }
            EventKind::TeamBreak => state.pause_mode = PauseMode::Break,
            EventKind::TeamAttention => state.pause_mode = PauseMode::Attention,
            EventKind::TeamResume => state.pause_mode = PauseMode::None,
            EventKind::MemoryUpdated => {
                state.counters.memory_updates += 1;
                state.memory_notes.push(MemoryNote {
                    agent: payload_string(event, "agent", DEFAULT_AGENT_NAME),
                    content: payload_string(event, "content", ""),
                });
            }
            EventKind::File => {
                state.counters.file_events += 1;
                state.file_events.push(FileActivity {
                    kind: event.kind.clone(),
                    path: payload_string(event, "path", ""),
                });
            }
            EventKind::Notification => {
                let targets = event
                    .payload
                    .get("targets")
                    .and_then(Value::as_array)
                    .map(|items| {
                        items
                            .iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default();
                state.notifications.push(NotificationEntry {
                    title: payload_string(event, "title", ""),
                    body: payload_string(event, "body", ""),
                    targets,
                });
            }
            // Observational only
            EventKind::ToolCompleted | EventKind::Other => {}
        }
    }

    state.activity_log = activity.into_iter().collect();
    state.counters.distinct_agents = agents.len();
    state
}
