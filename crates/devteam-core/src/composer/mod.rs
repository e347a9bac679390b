//! Message input with mention autocomplete.
//!
//! Features:
//! - Caret tracked as a byte offset, always kept on a char boundary
//! - `@` completion over the agent/role vocabulary (Up/Down, Tab/Enter, Esc)
//! - One pending attachment, uploaded separately from the message text

pub mod mention;

use std::path::{Path, PathBuf};

pub use mention::{
    mention_query, split_mentions, AutocompleteState, MentionAutocomplete, MentionQuery,
    MentionVocabulary, Segment,
};

/// Keys the suggestion menu reacts to while open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerKey {
    Up,
    Down,
    Confirm,
    Cancel,
}

#[derive(Debug, Clone)]
pub struct Composer {
    text: String,
    /// Caret position as byte offset
    caret: usize,
    focused: bool,
    attachment: Option<PathBuf>,
    autocomplete: MentionAutocomplete,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new()
    }
}

fn clamp_to_boundary(text: &str, caret: usize) -> usize {
    let mut caret = caret.min(text.len());
    while !text.is_char_boundary(caret) {
        caret -= 1;
    }
    caret
}

impl Composer {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            caret: 0,
            focused: true,
            attachment: None,
            autocomplete: MentionAutocomplete::new(),
        }
    }

    /// Replace the text, caret at end.
    pub fn set_text(&mut self, text: impl Into<String>, vocabulary: &MentionVocabulary) {
        let text = text.into();
        let caret = text.len();
        self.set_text_with_caret(text, caret, vocabulary);
    }

    pub fn set_text_with_caret(
        &mut self,
        text: impl Into<String>,
        caret: usize,
        vocabulary: &MentionVocabulary,
    ) {
        self.text = text.into();
        self.caret = clamp_to_boundary(&self.text, caret);
        self.refresh(vocabulary);
    }

    /// Insert at the caret and advance past the inserted text.
    pub fn insert_str(&mut self, s: &str, vocabulary: &MentionVocabulary) {
        self.text.insert_str(self.caret, s);
        self.caret += s.len();
        self.refresh(vocabulary);
    }

    pub fn backspace(&mut self, vocabulary: &MentionVocabulary) {
        if let Some(prev) = self.text[..self.caret].chars().next_back() {
            self.caret -= prev.len_utf8();
            self.text.remove(self.caret);
            self.refresh(vocabulary);
        }
    }

    pub fn move_caret(&mut self, caret: usize, vocabulary: &MentionVocabulary) {
        self.caret = clamp_to_boundary(&self.text, caret);
        self.refresh(vocabulary);
    }

    /// Route a key to the suggestion menu. Returns false when the menu is closed
    /// and the key should be handled by the caller.
    pub fn handle_key(&mut self, key: ComposerKey) -> bool {
        if !self.autocomplete.is_open() {
            return false;
        }
        match key {
            ComposerKey::Up => self.autocomplete.select_prev(),
            ComposerKey::Down => self.autocomplete.select_next(),
            ComposerKey::Confirm => {
                if self.autocomplete.confirm(&mut self.text).is_some() {
                    self.caret = self.text.len();
                    self.focused = true;
                }
            }
            ComposerKey::Cancel => self.autocomplete.cancel(),
        }
        true
    }

    fn refresh(&mut self, vocabulary: &MentionVocabulary) {
        self.autocomplete.update(&self.text, self.caret, vocabulary);
    }

    /// Empty the input after a successful send.
    pub fn clear(&mut self) {
        self.text.clear();
        self.caret = 0;
        self.autocomplete.cancel();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
        self.autocomplete.cancel();
    }

    pub fn autocomplete(&self) -> &MentionAutocomplete {
        &self.autocomplete
    }

    // ===== Attachment =====

    pub fn attach(&mut self, path: impl AsRef<Path>) {
        self.attachment = Some(path.as_ref().to_path_buf());
    }

    pub fn attachment(&self) -> Option<&Path> {
        self.attachment.as_deref()
    }

    pub fn clear_attachment(&mut self) {
        self.attachment = None;
    }
}
