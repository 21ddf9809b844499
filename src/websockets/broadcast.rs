use std::sync::Arc;

use crate::websockets::{connection_manager::ConnectionManager, messages::WebSocketMessage};

pub struct MessageBroadcaster;

impl MessageBroadcaster {
    /// Serializes once and enqueues the frame for every listed identity
    pub async fn broadcast_to_identities(
        connection_manager: &Arc<dyn ConnectionManager>,
        identities: &[String],
        message: &WebSocketMessage,
    ) -> Result<(), serde_json::Error> {
        let message_json = serde_json::to_string(message)?;
        connection_manager
            .send_to_identities(identities, &message_json)
            .await;
        Ok(())
    }

    pub async fn send_to_identity(
        connection_manager: &Arc<dyn ConnectionManager>,
        identity: &str,
        message: &WebSocketMessage,
    ) -> Result<(), serde_json::Error> {
        let message_json = serde_json::to_string(message)?;
        connection_manager
            .send_to_identity(identity, &message_json)
            .await;
        Ok(())
    }
}
