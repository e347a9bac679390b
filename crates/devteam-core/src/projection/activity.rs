use serde_json::Value;

use crate::constants::DEFAULT_AGENT_NAME;
use crate::models::RawEvent;

/// `[actor] tool arg1 arg2 ...` for a tool request.
pub fn tool_line(event: &RawEvent) -> String {
    let actor = event
        .str_field("actor")
        .or_else(|| event.agent())
        .unwrap_or(DEFAULT_AGENT_NAME);
    let tool = event
        .str_field("tool")
        .or_else(|| event.str_field("tool_name"))
        .unwrap_or("tool");

    let mut line = format!("[{actor}] {tool}");
    let arguments = event
        .payload
        .get("arguments")
        .or_else(|| event.payload.get("args"));
    for arg in arguments.map(render_arguments).unwrap_or_default() {
        line.push(' ');
        line.push_str(&arg);
    }
    line
}

/// `[agent] thinking` for a thinking-started event.
pub fn thinking_line(agent: &str) -> String {
    format!("[{agent}] thinking")
}

fn render_arguments(arguments: &Value) -> Vec<String> {
    match arguments {
        Value::Null => Vec::new(),
        Value::Array(items) => items.iter().map(render_value).collect(),
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| format!("{key}={}", render_value(value)))
            .collect(),
        scalar => vec![render_value(scalar)],
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
