use serde::{Deserialize, Serialize};

use crate::constants::{ACTIVITY_WINDOW, CHAT_LOG_CAPACITY, EVENT_LOG_CAPACITY, HUMAN_ROLE};

/// Which history endpoint backs a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryScope {
    /// Chat transcript only (`/chat/history`)
    #[default]
    Chat,
    /// Full run event log (`/events/history`)
    Events,
}

impl HistoryScope {
    pub fn default_capacity(self) -> usize {
        match self {
            HistoryScope::Chat => CHAT_LOG_CAPACITY,
            HistoryScope::Events => EVENT_LOG_CAPACITY,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            HistoryScope::Chat => "/chat/history",
            HistoryScope::Events => "/events/history",
        }
    }
}

impl std::str::FromStr for HistoryScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chat" => Ok(HistoryScope::Chat),
            "events" => Ok(HistoryScope::Events),
            other => Err(format!("unknown history scope: {other}")),
        }
    }
}

/// Per-run session settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Maximum number of retained events
    pub capacity: usize,
    /// Number of activity lines kept by the projection
    pub activity_window: usize,
    /// Role name of the operator; chat messages from it never clear pending replies
    pub human_role: String,
    pub history_scope: HistoryScope,
}

impl SessionConfig {
    pub fn for_scope(history_scope: HistoryScope) -> Self {
        Self {
            capacity: history_scope.default_capacity(),
            activity_window: ACTIVITY_WINDOW,
            human_role: HUMAN_ROLE.to_string(),
            history_scope,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::for_scope(HistoryScope::Chat)
    }
}
