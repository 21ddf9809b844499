use serde_json::json;
use std::time::Duration;

use roomchat::websockets::{MessageHandler, MessageType, WebSocketMessage};

use super::setup::TestSetup;

// ============================================================================
// Action Helpers
// ============================================================================

#[allow(dead_code)]
impl TestSetup {
    /// Send a WebSocket message as if it arrived on the identity's socket
    pub async fn send_message(&self, identity: &str, message: WebSocketMessage) {
        let message_json = serde_json::to_string(&message).unwrap();
        self.send_raw(identity, &message_json).await;
    }

    /// Send an arbitrary text frame
    pub async fn send_raw(&self, identity: &str, frame: &str) {
        self.input_handler
            .handle_message(identity, frame.to_string())
            .await;
    }

    /// Clear all recorded messages
    pub async fn clear_messages(&self) {
        self.mock_conn_manager.clear_messages().await;
    }

    // ============================================================================
    // Convenience Action Methods
    // ============================================================================

    pub async fn send_join(&self, identity: &str, room: &str) {
        self.send_message(
            identity,
            WebSocketMessage::new(MessageType::Join, json!({ "room": room }), room),
        )
        .await;
    }

    pub async fn send_leave(&self, identity: &str, room: &str) {
        self.send_message(
            identity,
            WebSocketMessage::new(MessageType::Leave, json!({ "room": room }), room),
        )
        .await;
    }

    pub async fn send_chat(&self, identity: &str, room: &str, text: &str) {
        self.send_message(
            identity,
            WebSocketMessage::new(MessageType::Message, json!({ "room": room, "msg": text }), room),
        )
        .await;
    }

    /// Join several identities to a room in order, then forget the frames
    pub async fn join_all(&self, identities: &[&str], room: &str) {
        for identity in identities {
            self.send_join(identity, room).await;
        }
        self.clear_messages().await;
    }

    /// Wait for background work (assistant replies) to grow a room's log
    pub async fn wait_for_history(&self, room: &str, len: usize) {
        for _ in 0..200 {
            if self.coordinator.history(room).await.len() >= len {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("{} never reached {} events", room, len);
    }
}
