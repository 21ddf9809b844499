use axum::{extract::State, http::HeaderMap, http::StatusCode, Json};
use tracing::{info, instrument, warn};

use super::types::{CreateSessionRequest, SessionResponse};
use crate::shared::{AppError, AppState};

/// HTTP handler for creating a new session
///
/// POST /session
/// Body `{"username": "..."}` is optional; without it a pet name is generated.
/// Returns a JWT token as session_id and the username
#[instrument(name = "create_session", skip(state, request))]
pub async fn create_session(
    State(state): State<AppState>,
    request: Option<Json<CreateSessionRequest>>,
) -> Result<Json<SessionResponse>, AppError> {
    let requested = request.and_then(|Json(body)| body.username);
    info!(requested = ?requested, "Creating new session");

    let session = state.session_service.create_session(requested).await?;

    info!(
        username = %session.username,
        session_id_length = session.session_id.len(),
        "Session created successfully"
    );

    Ok(Json(session))
}

/// HTTP handler for logging out
///
/// DELETE /session with `Authorization: Bearer <token>`
/// Revokes the session and removes its identity from every room
#[instrument(name = "revoke_session", skip(state, headers))]
pub async fn revoke_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let token = bearer_token(&headers)?;

    let claims = state.session_service.revoke_session(token).await?;

    state.connection_manager.close_identity(&claims.username).await;
    if let Err(e) = state.coordinator.disconnect(&claims.username).await {
        warn!(username = %claims.username, error = %e, "Failed to remove identity from rooms");
    }

    info!(username = %claims.username, "Session revoked and identity disconnected");
    Ok(StatusCode::NO_CONTENT)
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let auth_header = headers
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| {
            warn!("Missing Authorization header in request");
            AppError::Unauthorized("Missing authorization header".to_string())
        })?;

    auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        warn!("Invalid Authorization header format (expected Bearer token)");
        AppError::Unauthorized("Invalid authorization header format".to_string())
    })
}
