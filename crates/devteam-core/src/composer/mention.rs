//! Mention vocabulary, trigger detection and the suggestion menu.

use crate::constants::{BASE_MENTIONS, MAX_MENTION_SUGGESTIONS};
use crate::models::RosterAgent;

/// `[A-Za-z0-9_-]`
fn is_mention_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Tag strings offered by autocomplete: the base aliases plus one tag per agent
/// display name and per role, deduplicated in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionVocabulary {
    tags: Vec<String>,
}

impl Default for MentionVocabulary {
    fn default() -> Self {
        Self::from_tags(BASE_MENTIONS.iter().copied())
    }
}

impl MentionVocabulary {
    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut vocabulary = Self { tags: Vec::new() };
        for tag in tags {
            vocabulary.push(tag.into());
        }
        vocabulary
    }

    pub fn from_roster(roster: &[RosterAgent]) -> Self {
        let mut vocabulary = Self::default();
        vocabulary.extend_from_roster(roster);
        vocabulary
    }

    /// Rebuild after the roster was (re)loaded.
    pub fn rebuild(&mut self, roster: &[RosterAgent]) {
        *self = Self::from_roster(roster);
    }

    fn extend_from_roster(&mut self, roster: &[RosterAgent]) {
        for agent in roster {
            if let Some(name) = agent.display_name.as_deref() {
                self.push_name(name);
            }
            self.push_name(&agent.role);
        }
    }

    fn push_name(&mut self, name: &str) {
        let name = strip_whitespace(name);
        if !name.is_empty() {
            self.push(format!("@{name}"));
        }
    }

    fn push(&mut self, tag: String) {
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Tags starting with `@query` (case-insensitive), in vocabulary order.
    pub fn candidates(&self, query: &str, limit: usize) -> Vec<String> {
        let needle = format!("@{}", query.to_lowercase());
        self.tags
            .iter()
            .filter(|tag| tag.to_lowercase().starts_with(&needle))
            .take(limit)
            .cloned()
            .collect()
    }
}

/// A partial mention immediately before the caret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionQuery<'a> {
    /// Byte offset of the `@`
    pub start: usize,
    /// Identifier characters typed after the `@`
    pub query: &'a str,
}

/// Detect a mention being typed. Only fires with the caret at end of text and an
/// `@` at start of text or after whitespace, followed by identifier characters.
pub fn mention_query(text: &str, caret: usize) -> Option<MentionQuery<'_>> {
    if caret != text.len() {
        return None;
    }
    let start = text.rfind('@')?;
    let query = &text[start + 1..];
    if !query.chars().all(is_mention_char) {
        return None;
    }
    match text[..start].chars().next_back() {
        None => Some(MentionQuery { start, query }),
        Some(prev) if prev.is_whitespace() => Some(MentionQuery { start, query }),
        Some(_) => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AutocompleteState {
    #[default]
    Closed,
    Open {
        /// Byte offset of the `@` being completed
        anchor: usize,
        candidates: Vec<String>,
        selected: usize,
    },
}

#[derive(Debug, Clone, Default)]
pub struct MentionAutocomplete {
    state: AutocompleteState,
}

impl MentionAutocomplete {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-evaluate after any edit or caret move.
    pub fn update(&mut self, text: &str, caret: usize, vocabulary: &MentionVocabulary) {
        let Some(found) = mention_query(text, caret) else {
            self.close();
            return;
        };
        let candidates = vocabulary.candidates(found.query, MAX_MENTION_SUGGESTIONS);
        if candidates.is_empty() {
            self.close();
            return;
        }
        self.state = AutocompleteState::Open {
            anchor: found.start,
            candidates,
            selected: 0,
        };
    }

    pub fn state(&self) -> &AutocompleteState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, AutocompleteState::Open { .. })
    }

    pub fn candidates(&self) -> &[String] {
        match &self.state {
            AutocompleteState::Open { candidates, .. } => candidates,
            AutocompleteState::Closed => &[],
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        match &self.state {
            AutocompleteState::Open { selected, .. } => Some(*selected),
            AutocompleteState::Closed => None,
        }
    }

    pub fn selected(&self) -> Option<&str> {
        match &self.state {
            AutocompleteState::Open {
                candidates,
                selected,
                ..
            } => candidates.get(*selected).map(String::as_str),
            AutocompleteState::Closed => None,
        }
    }

    pub fn select_next(&mut self) {
        if let AutocompleteState::Open {
            candidates,
            selected,
            ..
        } = &mut self.state
        {
            if !candidates.is_empty() {
                *selected = (*selected + 1) % candidates.len();
            }
        }
    }

    pub fn select_prev(&mut self) {
        if let AutocompleteState::Open {
            candidates,
            selected,
            ..
        } = &mut self.state
        {
            if !candidates.is_empty() {
                *selected = if *selected == 0 {
                    candidates.len() - 1
                } else {
                    *selected - 1
                };
            }
        }
    }

    /// Replace the trailing partial mention with the selected tag and a space.
    /// Returns the inserted tag, or `None` if the menu was closed.
    pub fn confirm(&mut self, text: &mut String) -> Option<String> {
        let state = std::mem::take(&mut self.state);
        let AutocompleteState::Open {
            anchor,
            candidates,
            selected,
        } = state
        else {
            return None;
        };
        let tag = candidates.get(selected)?.clone();
        if anchor > text.len() || !text.is_char_boundary(anchor) {
            return None;
        }
        text.truncate(anchor);
        text.push_str(&tag);
        text.push(' ');
        Some(tag)
    }

    /// Close without touching the text.
    pub fn cancel(&mut self) {
        self.close();
    }

    fn close(&mut self) {
        self.state = AutocompleteState::Closed;
    }
}

/// A piece of rendered message content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Mention(String),
}

/// Split content into plain text and `@mention` segments for highlighting.
pub fn split_mentions(content: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut plain = String::new();
    let mut chars = content.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let starts_mention = c == '@'
            && chars
                .peek()
                .map(|&(_, next)| is_mention_char(next))
                .unwrap_or(false);
        if !starts_mention {
            plain.push(c);
            continue;
        }

        let mut end = i + c.len_utf8();
        while let Some(&(j, next)) = chars.peek() {
            if !is_mention_char(next) {
                break;
            }
            end = j + next.len_utf8();
            chars.next();
        }
        if !plain.is_empty() {
            segments.push(Segment::Text(std::mem::take(&mut plain)));
        }
        segments.push(Segment::Mention(content[i..end].to_string()));
    }

    if !plain.is_empty() {
        segments.push(Segment::Text(plain));
    }
    segments
}
