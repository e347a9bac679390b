//! Application-wide constants
//!
//! Centralized location for event kind tags and default values
//! shared by the ingestion paths and the projections.

/// Role name the backend uses for messages typed by the operator
pub const HUMAN_ROLE: &str = "Stakeholder";

// Store defaults
/// Retained events for the chat screen
pub const CHAT_LOG_CAPACITY: usize = 200;
/// Retained events for the run-console screen
pub const EVENT_LOG_CAPACITY: usize = 400;
/// Number of activity lines kept for the activity feed
pub const ACTIVITY_WINDOW: usize = 10;

// Autocomplete
/// Maximum number of mention suggestions shown at once
pub const MAX_MENTION_SUGGESTIONS: usize = 8;
/// Team-wide aliases always offered by mention autocomplete
pub const BASE_MENTIONS: &[&str] = &["@all", "@team", "@everyone"];

// Transcript defaults (mirrors the backend's history mapping)
pub const DEFAULT_AGENT_NAME: &str = "agent";
pub const DEFAULT_ROLE_NAME: &str = "role";

/// Delay between feed reconnect attempts
pub const RECONNECT_DELAY_MS: u64 = 2_000;

/// Message shown when an attachment upload is attempted without a run
pub const NO_RUN_FOR_UPLOAD: &str = "Create or select a run before uploading attachments.";

/// Event kind tags emitted by the orchestration backend
pub mod kinds {
    pub const CHAT_MESSAGE: &str = "chat.message";
    pub const AGENT_RESPONSE: &str = "agent.response";
    pub const TOOL_REQUESTED: &str = "tool.requested";
    pub const TOOL_COMPLETED: &str = "tool.completed";
    /// Thinking state carried in the payload (`state`, `status` or `thinking`)
    pub const AGENT_THINKING: &str = "agent.thinking";
    pub const AGENT_THINKING_STARTED: &str = "agent.thinking.started";
    pub const AGENT_THINKING_STOPPED: &str = "agent.thinking.stopped";
    pub const TEAM_BREAK: &str = "team.break";
    pub const TEAM_ATTENTION: &str = "team.attention";
    pub const TEAM_RESUME: &str = "team.resume";
    pub const MEMORY_UPDATED: &str = "memory.updated";
    /// Prefix shared by all file activity kinds (`file.created`, `file.modified`, ...)
    pub const FILE_PREFIX: &str = "file.";
    pub const NOTIFICATION_REQUESTED: &str = "notification.requested";
    pub const CHAT_ATTACHMENT: &str = "chat.attachment";
    pub const CONNECTION_READY: &str = "connection.ready";
    pub const TASK_COMPLETED: &str = "task.completed";
}
