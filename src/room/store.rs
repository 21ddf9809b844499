use super::{history::HistoryLog, membership::MembershipTracker, registry::RoomRegistry};

/// All mutable presence and history state, owned by the coordinator
///
/// Only ever accessed through the coordinator's lock, so registry and
/// membership changes for one operation are applied together.
#[derive(Debug)]
pub struct StateStore {
    pub registry: RoomRegistry,
    pub membership: MembershipTracker,
    pub history: HistoryLog,
}

impl StateStore {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            registry: RoomRegistry::new(),
            membership: MembershipTracker::new(),
            history: HistoryLog::new(history_capacity),
        }
    }

    /// Adds the identity to the room on both sides.
    /// Returns false if it was already a member.
    pub fn add_member(&mut self, identity: &str, room: &str) -> bool {
        if !self.membership.join(identity, room) {
            return false;
        }
        self.registry.add(room, identity);
        true
    }

    /// Removes the identity from the room on both sides.
    /// Returns false if it was not tracked as a member.
    pub fn remove_member(&mut self, identity: &str, room: &str) -> bool {
        if !self.membership.leave(identity, room) {
            return false;
        }
        self.registry.remove(room, identity);
        true
    }

    /// Removes the identity from every room, returning the rooms it left
    pub fn remove_identity(&mut self, identity: &str) -> Vec<String> {
        let rooms = self.membership.remove_identity(identity);
        for room in &rooms {
            self.registry.remove(room, identity);
        }
        rooms
    }

    /// True when registry and membership agree on every membership pair
    #[cfg(test)]
    pub fn is_consistent(&self, identities: &[&str], rooms: &[&str]) -> bool {
        identities.iter().all(|identity| {
            rooms.iter().all(|room| {
                self.membership.is_member(identity, room) == self.registry.contains(room, identity)
            })
        })
    }
}
