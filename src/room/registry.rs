use std::collections::{BTreeSet, HashMap};

/// Tracks which identities are currently present in each room
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<String, BTreeSet<String>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an identity to a room. Adding an existing member is a no-op.
    pub fn add(&mut self, room: &str, identity: &str) {
        self.rooms
            .entry(room.to_string())
            .or_default()
            .insert(identity.to_string());
    }

    /// Removes an identity from a room. Removing a non-member is a no-op.
    /// Rooms left without members are dropped.
    pub fn remove(&mut self, room: &str, identity: &str) {
        if let Some(members) = self.rooms.get_mut(room) {
            members.remove(identity);
            if members.is_empty() {
                self.rooms.remove(room);
            }
        }
    }

    /// Members of a room in sorted order; empty for unknown rooms
    pub fn members(&self, room: &str) -> Vec<String> {
        self.rooms
            .get(room)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, room: &str, identity: &str) -> bool {
        self.rooms
            .get(room)
            .is_some_and(|members| members.contains(identity))
    }

    pub fn member_count(&self, room: &str) -> usize {
        self.rooms.get(room).map_or(0, BTreeSet::len)
    }
}
