use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::room::{BroadcastCoordinator, RoomCatalog};
use crate::session::SessionService;
use crate::websockets::ConnectionManager;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub session_service: Arc<SessionService>,
    pub room_catalog: Arc<dyn RoomCatalog + Send + Sync>,
    pub connection_manager: Arc<dyn ConnectionManager>,
    pub coordinator: Arc<BroadcastCoordinator>,
}

impl AppState {
    pub fn new(
        session_service: Arc<SessionService>,
        room_catalog: Arc<dyn RoomCatalog + Send + Sync>,
        connection_manager: Arc<dyn ConnectionManager>,
        coordinator: Arc<BroadcastCoordinator>,
    ) -> Self {
        Self {
            session_service,
            room_catalog,
            connection_manager,
            coordinator,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("JWT error: {0}")]
    JwtError(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::JwtError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
