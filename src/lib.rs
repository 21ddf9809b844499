// Library crate for the room chat server
// This file exposes the public API for the binary and integration tests

pub mod assistant;
pub mod config;
pub mod room;
pub mod session;
pub mod shared;
pub mod websockets;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

use assistant::{Assistant, AssistantService, HttpAssistant};
use config::ChatConfig;
use room::{BroadcastCoordinator, InMemoryRoomCatalog};
use session::{repository::InMemorySessionRepository, SessionService, TokenConfig};
use websockets::{ConnectionManager, InMemoryConnectionManager};

// Re-export commonly used types for easier access in tests
pub use room::{models::ChatEvent, JoinOutcome, LeaveOutcome};
pub use shared::{AppError, AppState};
pub use websockets::{MessageHandler, MessageType, WebSocketMessage, WebsocketReceiveHandler};

/// Wires the in-memory services described by `config` into an AppState
pub fn build_state(config: &ChatConfig) -> AppState {
    let remote: Option<Arc<dyn Assistant>> = match &config.assistant_url {
        Some(url) => match HttpAssistant::new(url.clone(), config.assistant_timeout) {
            Ok(assistant) => Some(Arc::new(assistant)),
            Err(e) => {
                warn!(error = %e, "Remote assistant disabled, using canned replies");
                None
            }
        },
        None => None,
    };
    let assistant = Arc::new(AssistantService::new(remote, config.assistant_timeout));

    let connection_manager: Arc<dyn ConnectionManager> = Arc::new(InMemoryConnectionManager::new());
    let coordinator = Arc::new(BroadcastCoordinator::new(
        config.history_capacity,
        connection_manager.clone(),
        assistant,
    ));

    let session_service = Arc::new(SessionService::new(
        Arc::new(InMemorySessionRepository::new()),
        TokenConfig::from_config(config),
    ));
    let room_catalog = Arc::new(InMemoryRoomCatalog::seeded(&config.default_rooms));

    AppState::new(session_service, room_catalog, connection_manager, coordinator)
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "roomchat is running" }))
        .route(
            "/session",
            post(session::create_session).delete(session::revoke_session),
        )
        .route("/rooms", get(room::list_rooms).post(room::create_room))
        .route("/ws", get(websockets::websocket_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
