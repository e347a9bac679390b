//! Plain-text rendering of session views for the terminal.

use devteam_core::composer::{split_mentions, Segment};
use devteam_core::projection::{ChatEntry, PauseMode, ProjectionState};
use devteam_core::RunSession;
use serde_json::{json, Value};

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Message content with `@mentions` optionally emboldened.
pub fn render_content(content: &str, highlight: bool) -> String {
    if !highlight {
        return content.to_string();
    }
    split_mentions(content)
        .into_iter()
        .map(|segment| match segment {
            Segment::Text(text) => text,
            Segment::Mention(tag) => format!("{BOLD}{tag}{RESET}"),
        })
        .collect()
}

pub fn render_chat_entry(entry: &ChatEntry, highlight: bool) -> String {
    let content = render_content(&entry.content, highlight);
    match &entry.timestamp {
        Some(ts) => format!("{} {} ({}): {}", ts, entry.agent, entry.role, content),
        None => format!("{} ({}): {}", entry.agent, entry.role, content),
    }
}

pub fn pause_label(mode: PauseMode) -> Option<&'static str> {
    match mode {
        PauseMode::None => None,
        PauseMode::Break => Some("on break"),
        PauseMode::Attention => Some("attention requested"),
    }
}

/// One-line header: connectivity, run, typing and pause state.
pub fn render_status_line(session: &mut RunSession) -> String {
    let mut parts = vec![if session.is_connected() {
        "online".to_string()
    } else {
        "offline".to_string()
    }];
    match session.run_id() {
        Some(run_id) => parts.push(format!("run {}", run_id)),
        None => parts.push("no run".to_string()),
    }
    if session.is_typing() {
        let agents: Vec<&str> = session.pending().agents().iter().map(String::as_str).collect();
        parts.push(format!("waiting on {}", agents.join(", ")));
    }
    let state = session.projection();
    if !state.thinking_agents.is_empty() {
        let agents: Vec<&str> = state.thinking_agents.iter().map(String::as_str).collect();
        parts.push(format!("thinking: {}", agents.join(", ")));
    }
    if let Some(label) = pause_label(state.pause_mode) {
        parts.push(label.to_string());
    }
    format!("[{}]", parts.join(" | "))
}

/// Run-console summary as JSON.
pub fn render_stats(run_id: Option<u64>, state: &ProjectionState) -> Value {
    let counters = &state.counters;
    json!({
        "run_id": run_id,
        "events": counters.events,
        "agents": counters.distinct_agents,
        "files": counters.file_events,
        "memory_updates": counters.memory_updates,
        "chat_messages": counters.chat_messages,
        "agent_responses": counters.agent_responses,
        "pause": pause_label(state.pause_mode),
        "thinking": state.thinking_agents.iter().collect::<Vec<_>>(),
        "activity": state.activity_log,
        "recent_files": state
            .file_events
            .iter()
            .rev()
            .take(10)
            .map(|f| json!({"kind": f.kind, "path": f.path}))
            .collect::<Vec<_>>(),
        "notifications": state
            .notifications
            .iter()
            .map(|n| json!({"title": n.title, "body": n.body, "targets": n.targets}))
            .collect::<Vec<_>>(),
    })
}
