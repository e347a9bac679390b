//! Agents expected to reply after a send.
//!
//! Seeded (overwritten) by a successful send and drained by chat messages from
//! those agents. Owned by the run session; one instance per active run.

use std::collections::BTreeSet;

use crate::models::{EventKind, RawEvent};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingReplies {
    agents: BTreeSet<String>,
}

impl PendingReplies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole set with the targets of the latest send.
    pub fn replace<I, S>(&mut self, targets: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.agents = targets.into_iter().map(Into::into).collect();
    }

    /// Apply an accepted event. Returns true if an agent stopped being pending.
    ///
    /// Only chat messages count, and never those posted under the human role.
    pub fn observe(&mut self, event: &RawEvent, human_role: &str) -> bool {
        if event.event_kind() != EventKind::ChatMessage {
            return false;
        }
        if event.str_field("role") == Some(human_role) {
            return false;
        }
        match event.agent() {
            Some(agent) => self.agents.remove(agent),
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.agents.clear();
    }

    /// The "agent is typing" indicator
    pub fn is_typing(&self) -> bool {
        !self.agents.is_empty()
    }

    pub fn contains(&self, agent: &str) -> bool {
        self.agents.contains(agent)
    }

    pub fn agents(&self) -> &BTreeSet<String> {
        &self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
