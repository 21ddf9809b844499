use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MembershipError {
    #[error("{identity} is not a member of {room}")]
    NotAMember { identity: String, room: String },
}

/// Tracks the rooms each identity has joined and which one is active
///
/// The active room, when set, is always one of the identity's rooms.
#[derive(Debug, Default)]
pub struct MembershipTracker {
    rooms: HashMap<String, BTreeSet<String>>,
    active: HashMap<String, String>,
}

impl MembershipTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that an identity joined a room.
    /// Returns false if it was already a member.
    pub fn join(&mut self, identity: &str, room: &str) -> bool {
        self.rooms
            .entry(identity.to_string())
            .or_default()
            .insert(room.to_string())
    }

    /// Removes a room from an identity's memberships, clearing the active
    /// room if it was this one. Returns false if it was not a member.
    pub fn leave(&mut self, identity: &str, room: &str) -> bool {
        let Some(rooms) = self.rooms.get_mut(identity) else {
            return false;
        };

        let removed = rooms.remove(room);
        if rooms.is_empty() {
            self.rooms.remove(identity);
        }

        if self.active.get(identity).is_some_and(|active| active == room) {
            self.active.remove(identity);
        }

        removed
    }

    pub fn set_active(&mut self, identity: &str, room: &str) -> Result<(), MembershipError> {
        if !self.is_member(identity, room) {
            return Err(MembershipError::NotAMember {
                identity: identity.to_string(),
                room: room.to_string(),
            });
        }

        self.active.insert(identity.to_string(), room.to_string());
        Ok(())
    }

    pub fn active_room(&self, identity: &str) -> Option<&str> {
        self.active.get(identity).map(String::as_str)
    }

    pub fn is_member(&self, identity: &str, room: &str) -> bool {
        self.rooms
            .get(identity)
            .is_some_and(|rooms| rooms.contains(room))
    }

    /// Rooms an identity has joined, sorted; empty if none
    pub fn rooms_of(&self, identity: &str) -> Vec<String> {
        self.rooms
            .get(identity)
            .map(|rooms| rooms.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Forgets an identity entirely, returning the rooms it was in
    pub fn remove_identity(&mut self, identity: &str) -> Vec<String> {
        self.active.remove(identity);
        self.rooms
            .remove(identity)
            .map(|rooms| rooms.into_iter().collect())
            .unwrap_or_default()
    }
}
