use async_trait::async_trait;
use axum::{
    extract::{State, WebSocketUpgrade},
    http::HeaderMap,
    response::Response,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::room::{BroadcastCoordinator, CoordinatorError};
use crate::shared::{AppError, AppState};
use crate::websockets::messages::{ChatPayload, MessageType, RoomPayload, WebSocketMessage};

use super::socket::{Connection, MessageHandler};

/// Message handler for receiving WebSocket messages from the client
///
/// Frames are dispatched to the coordinator. Failures are logged and the
/// frame is dropped; nothing is written back to the room.
pub struct WebsocketReceiveHandler {
    coordinator: Arc<BroadcastCoordinator>,
}

impl WebsocketReceiveHandler {
    pub fn new(coordinator: Arc<BroadcastCoordinator>) -> Self {
        Self { coordinator }
    }

    async fn dispatch(
        &self,
        identity: &str,
        ws_message: WebSocketMessage,
    ) -> Result<(), CoordinatorError> {
        match ws_message.message_type {
            MessageType::Join => {
                let payload: RoomPayload = parse_payload(ws_message.payload)?;
                self.coordinator.join(identity, &payload.room).await?;
            }
            MessageType::Leave => {
                let payload: RoomPayload = parse_payload(ws_message.payload)?;
                self.coordinator.leave(identity, &payload.room).await?;
            }
            MessageType::Message => {
                let payload: ChatPayload = parse_payload(ws_message.payload)?;
                self.coordinator
                    .message(identity, &payload.room, &payload.msg)
                    .await?;
            }
            MessageType::ChatHistory | MessageType::UpdateUsers => {
                debug!(
                    message_type = ?ws_message.message_type,
                    "Ignoring server-only message type from client"
                );
            }
        }
        Ok(())
    }
}

fn parse_payload<T: DeserializeOwned>(payload: serde_json::Value) -> Result<T, CoordinatorError> {
    serde_json::from_value(payload)
        .map_err(|e| CoordinatorError::Validation(format!("invalid payload: {}", e)))
}

#[async_trait]
impl MessageHandler for WebsocketReceiveHandler {
    async fn handle_message(&self, identity: &str, message: String) {
        debug!(identity = %identity, message = %message, "Received message");

        let ws_message = match serde_json::from_str::<WebSocketMessage>(&message) {
            Ok(ws_message) => ws_message,
            Err(e) => {
                warn!(
                    identity = %identity,
                    error = %e,
                    "Failed to parse WebSocket message"
                );
                return;
            }
        };

        let message_type = ws_message.message_type;
        if let Err(e) = self.dispatch(identity, ws_message).await {
            warn!(
                identity = %identity,
                message_type = ?message_type,
                error = %e,
                "Dropped WebSocket message"
            );
        }
    }
}

/// WebSocket endpoint that handles authentication via Sec-WebSocket-Protocol header
/// GET /ws with the session JWT in the Sec-WebSocket-Protocol header
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    headers: HeaderMap,
    State(app_state): State<AppState>,
) -> Result<Response, AppError> {
    let jwt_token = headers
        .get("sec-websocket-protocol")
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            warn!("Missing or invalid Sec-WebSocket-Protocol header");
            AppError::Unauthorized("Missing authentication token".to_string())
        })?;

    let claims = app_state
        .session_service
        .validate_session(jwt_token)
        .await?;
    let identity = claims.username;

    info!(identity = %identity, "WebSocket authentication successful");

    // Browsers drop the socket unless the offered protocol is echoed back
    Ok(ws
        .protocols([jwt_token.to_string()])
        .on_upgrade(move |socket| handle_websocket_connection(socket, identity, app_state)))
}

/// Handle the upgraded WebSocket connection
async fn handle_websocket_connection(
    socket: axum::extract::ws::WebSocket,
    identity: String,
    app_state: AppState,
) {
    let connection_id = Uuid::new_v4().to_string();
    info!(
        identity = %identity,
        connection_id = %connection_id,
        "WebSocket connection established"
    );

    let (outbound_sender, outbound_receiver) = mpsc::unbounded_channel::<String>();
    app_state
        .connection_manager
        .add_connection(identity.clone(), connection_id.clone(), outbound_sender)
        .await;

    let message_handler = Arc::new(WebsocketReceiveHandler::new(Arc::clone(
        &app_state.coordinator,
    )));
    let connection = Connection::new(
        identity.clone(),
        Box::new(socket),
        outbound_receiver,
        message_handler,
    );

    match connection.run().await {
        Ok(()) => info!(identity = %identity, "WebSocket connection closed cleanly"),
        Err(e) => warn!(identity = %identity, error = %e, "WebSocket connection error"),
    }

    // A newer connection for the same identity keeps its presence
    if let Err(e) = app_state
        .coordinator
        .release_connection(&identity, &connection_id)
        .await
    {
        warn!(identity = %identity, error = %e, "Failed to disconnect identity from rooms");
    }
}
