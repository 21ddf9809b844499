use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Author recorded on join/leave notices
pub const SYSTEM_AUTHOR: &str = "system";

/// Author recorded on assistant replies
pub const ASSISTANT_AUTHOR: &str = "AI Assistant";

/// A single entry in a room's history
///
/// Created once, appended to exactly one room's log and never mutated.
/// Field names on the wire match what chat clients already consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEvent {
    pub id: String,
    #[serde(rename = "msg")]
    pub text: String,
    #[serde(rename = "username")]
    pub author: String,
    #[serde(rename = "system")]
    pub is_system: bool,
    /// Milliseconds since the Unix epoch
    #[serde(rename = "ts")]
    pub timestamp: i64,
}

impl ChatEvent {
    fn new(author: &str, text: String, is_system: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text,
            author: author.to_string(),
            is_system,
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// A message typed by a user, rendered as `"{identity}: {text}"`
    pub fn user_message(identity: &str, text: &str) -> Self {
        Self::new(identity, format!("{}: {}", identity, text), false)
    }

    pub fn joined(identity: &str) -> Self {
        Self::new(
            SYSTEM_AUTHOR,
            format!("{} has joined the room.", identity),
            true,
        )
    }

    pub fn left(identity: &str) -> Self {
        Self::new(SYSTEM_AUTHOR, format!("{} has left the room.", identity), true)
    }

    pub fn assistant_reply(reply: &str) -> Self {
        Self::new(
            ASSISTANT_AUTHOR,
            format!("{}: {}", ASSISTANT_AUTHOR, reply),
            true,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefixes_identity() {
        let event = ChatEvent::user_message("alice", "hello there");

        assert_eq!(event.text, "alice: hello there");
        assert_eq!(event.author, "alice");
        assert!(!event.is_system);
        assert!(event.timestamp > 0);
    }

    #[test]
    fn test_system_events_are_authored_by_system() {
        let joined = ChatEvent::joined("bob");
        let left = ChatEvent::left("bob");

        assert_eq!(joined.text, "bob has joined the room.");
        assert_eq!(left.text, "bob has left the room.");
        assert!(joined.is_system && left.is_system);
        assert_eq!(joined.author, SYSTEM_AUTHOR);
        assert_ne!(joined.id, left.id);
    }

    #[test]
    fn test_assistant_reply_is_system_event() {
        let event = ChatEvent::assistant_reply("It is 10:00");

        assert_eq!(event.author, ASSISTANT_AUTHOR);
        assert_eq!(event.text, "AI Assistant: It is 10:00");
        assert!(event.is_system);
    }

    #[test]
    fn test_wire_field_names() {
        let event = ChatEvent::user_message("alice", "hi");
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["msg"], "alice: hi");
        assert_eq!(json["username"], "alice");
        assert_eq!(json["system"], false);
        assert!(json["ts"].is_i64());
        assert!(json.get("text").is_none());
    }
}
