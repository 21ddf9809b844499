use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::room::models::ChatEvent;

/// Message types for WebSocket communication
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    // Client -> Server
    Join,
    Leave,
    Message,

    // Server -> Client
    ChatHistory,
    UpdateUsers,
}

/// Metadata for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessageMeta {
    pub timestamp: DateTime<Utc>,
    pub room: Option<String>,
}

/// Base structure for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessage {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    #[serde(default)]
    pub payload: serde_json::Value,
    pub meta: Option<WebSocketMessageMeta>,
}

/// Client-to-Server message payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomPayload {
    pub room: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatPayload {
    pub room: String,
    pub msg: String,
}

/// Server-to-Client message payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatHistoryPayload {
    pub history: Vec<ChatEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUsersPayload {
    pub users: Vec<String>,
}

/// Helper functions for creating messages
impl WebSocketMessage {
    pub fn new(message_type: MessageType, payload: serde_json::Value, room: &str) -> Self {
        Self {
            message_type,
            payload,
            meta: Some(WebSocketMessageMeta {
                timestamp: Utc::now(),
                room: Some(room.to_string()),
            }),
        }
    }

    /// Create a chat_history message replaying a room to one client
    pub fn chat_history(room: &str, history: Vec<ChatEvent>) -> Self {
        Self::new(MessageType::ChatHistory, json!({ "history": history }), room)
    }

    /// Create a message carrying a single room event
    pub fn message(room: &str, event: &ChatEvent) -> Self {
        Self::new(MessageType::Message, json!(event), room)
    }

    /// Create an update_users message with the room's current members
    pub fn update_users(room: &str, users: Vec<String>) -> Self {
        Self::new(MessageType::UpdateUsers, json!({ "users": users }), room)
    }
}
