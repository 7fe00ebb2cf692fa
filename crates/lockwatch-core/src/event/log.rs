use std::collections::VecDeque;

use super::Event;

/// Maximum number of events retained.
pub const EVENT_LOG_CAPACITY: usize = 50;

/// Bounded event history, newest first.
///
/// No deduplication: identical messages are kept as separate entries.
#[derive(Debug, Clone)]
pub struct EventLog {
    events: VecDeque<Event>,
    capacity: usize,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            events: VecDeque::with_capacity(EVENT_LOG_CAPACITY),
            capacity: EVENT_LOG_CAPACITY,
        }
    }

    /// Insert at the head, evicting the oldest entries beyond capacity.
    pub fn append(&mut self, event: Event) {
        self.events.push_front(event);
        self.events.truncate(self.capacity);
    }

    /// Append events in the order they were generated; the last ends up newest.
    pub fn extend(&mut self, events: impl IntoIterator<Item = Event>) {
        for event in events {
            self.append(event);
        }
    }

    /// Current contents, newest first.
    pub fn snapshot(&self) -> Vec<Event> {
        self.events.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}
