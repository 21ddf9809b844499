use std::collections::{HashMap, VecDeque};

use super::models::ChatEvent;

/// Per-room event history used to replay a room to new joiners
///
/// Each room keeps at most `capacity` events, evicting the oldest first.
/// A capacity of 0 keeps every event.
#[derive(Debug)]
pub struct HistoryLog {
    capacity: usize,
    logs: HashMap<String, VecDeque<ChatEvent>>,
}

impl HistoryLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            logs: HashMap::new(),
        }
    }

    pub fn unbounded() -> Self {
        Self::new(0)
    }

    /// Creates an empty log for the room if none exists yet
    pub fn ensure(&mut self, room: &str) {
        self.logs.entry(room.to_string()).or_default();
    }

    pub fn append(&mut self, room: &str, event: ChatEvent) {
        let log = self.logs.entry(room.to_string()).or_default();
        log.push_back(event);

        if self.capacity > 0 {
            while log.len() > self.capacity {
                log.pop_front();
            }
        }
    }

    /// Retained events for a room, oldest first; empty for unknown rooms
    pub fn get(&self, room: &str) -> Vec<ChatEvent> {
        self.logs
            .get(room)
            .map(|log| log.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self, room: &str) -> usize {
        self.logs.get(room).map_or(0, VecDeque::len)
    }

    pub fn contains_room(&self, room: &str) -> bool {
        self.logs.contains_key(room)
    }
}
