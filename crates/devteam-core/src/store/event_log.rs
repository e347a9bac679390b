//! Bounded, deduplicating event buffer.
//!
//! The single source of truth for every derived view of a run. Two invariants:
//! - once a message id has been admitted, no later event with that id is stored,
//!   whichever ingestion path it arrives through
//! - FIFO eviction trims the sequence only; the seen-id set lives until `clear()`

use std::collections::{HashSet, VecDeque};

use crate::models::RawEvent;

#[derive(Debug)]
pub struct EventLogStore {
    events: VecDeque<RawEvent>,
    /// Message ids admitted since creation or the last clear
    seen_ids: HashSet<String>,
    capacity: usize,
    /// Bumped on every mutation; keys projection caches
    version: u64,
}

impl EventLogStore {
    /// Create an empty store. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity),
            seen_ids: HashSet::new(),
            capacity,
            version: 0,
        }
    }

    /// Append a live event. Returns `false` (and stores nothing) when its
    /// message id was already seen.
    pub fn append(&mut self, event: RawEvent) -> bool {
        if !self.admit(&event) {
            return false;
        }
        self.events.push_back(event);
        self.evict_overflow();
        self.version += 1;
        true
    }

    /// Prepend a batch of older events ahead of everything already stored.
    ///
    /// Items whose id is already seen (including earlier items of the same batch)
    /// are skipped; the rest keep their relative order. Returns the admitted events.
    pub fn merge(&mut self, older: impl IntoIterator<Item = RawEvent>) -> Vec<RawEvent> {
        let admitted: Vec<RawEvent> = older
            .into_iter()
            .filter(|event| self.admit(event))
            .collect();
        if admitted.is_empty() {
            return admitted;
        }

        for event in admitted.iter().rev() {
            self.events.push_front(event.clone());
        }
        self.evict_overflow();
        self.version += 1;
        admitted
    }

    /// Empty the sequence and the seen-id set together.
    pub fn clear(&mut self) {
        self.events.clear();
        self.seen_ids.clear();
        self.version += 1;
    }

    /// Clear and adopt a new capacity (used when the active run changes).
    pub fn reset(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        self.clear();
    }

    /// Whether an event would be rejected as a duplicate.
    pub fn is_duplicate(&self, event: &RawEvent) -> bool {
        event
            .message_id()
            .map(|id| self.seen_ids.contains(&id))
            .unwrap_or(false)
    }

    pub fn is_seen(&self, message_id: &str) -> bool {
        self.seen_ids.contains(message_id)
    }

    /// Records the id (if any) and reports whether the event may be stored.
    fn admit(&mut self, event: &RawEvent) -> bool {
        match event.message_id() {
            Some(id) => self.seen_ids.insert(id),
            None => true,
        }
    }

    fn evict_overflow(&mut self) {
        while self.events.len() > self.capacity {
            self.events.pop_front();
        }
    }

    // ===== Query Methods =====

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn seen_count(&self) -> usize {
        self.seen_ids.len()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &RawEvent> + ExactSizeIterator {
        self.events.iter()
    }

    pub fn get(&self, index: usize) -> Option<&RawEvent> {
        self.events.get(index)
    }

    /// Most recently appended event
    pub fn latest(&self) -> Option<&RawEvent> {
        self.events.back()
    }
}
