use serde::{Deserialize, Serialize};

/// Agent entry from the roster endpoint; basis for mention tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterAgent {
    #[serde(default, alias = "displayName")]
    pub display_name: Option<String>,
    pub role: String,
}

impl RosterAgent {
    pub fn new(display_name: Option<&str>, role: &str) -> Self {
        Self {
            display_name: display_name.map(str::to_string),
            role: role.to_string(),
        }
    }
}

/// Minimal view of a run as listed by `GET /runs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub id: u64,
}
