use axum::{extract::State, Json};
use tracing::{info, instrument};

use super::types::{RoomCreateRequest, RoomResponse};
use crate::shared::{AppError, AppState};

/// HTTP handler for adding a room to the catalog
///
/// POST /rooms
/// Returns 409 if the room already exists, 400 for a blank name
#[instrument(name = "create_room", skip(state))]
pub async fn create_room(
    State(state): State<AppState>,
    Json(request): Json<RoomCreateRequest>,
) -> Result<Json<RoomResponse>, AppError> {
    state.room_catalog.create_room(&request.name).await?;

    let name = request.name.trim().to_string();
    let member_count = state.coordinator.member_count(&name).await;

    info!(room_id = %name, "Room created successfully");
    Ok(Json(RoomResponse { name, member_count }))
}

/// HTTP handler for listing catalog rooms with their member counts
///
/// GET /rooms
#[instrument(name = "list_rooms", skip(state))]
pub async fn list_rooms(
    State(state): State<AppState>,
) -> Result<Json<Vec<RoomResponse>>, AppError> {
    let names = state.room_catalog.list_rooms().await?;

    let mut rooms = Vec::with_capacity(names.len());
    for name in names {
        let member_count = state.coordinator.member_count(&name).await;
        rooms.push(RoomResponse { name, member_count });
    }

    info!(room_count = rooms.len(), "Rooms listed successfully");
    Ok(Json(rooms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::catalog::InMemoryRoomCatalog;
    use crate::shared::test_utils::AppStateBuilder;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::get,
        Router,
    };
    use std::sync::Arc;
    use tower::ServiceExt; // for `oneshot`

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/rooms", get(list_rooms).post(create_room))
            .with_state(state)
    }

    fn post_room(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/rooms")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn read_rooms(response: axum::response::Response) -> Vec<RoomResponse> {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_list_rooms_handler_with_presence() {
        let state = AppStateBuilder::new()
            .with_room_catalog(Arc::new(InMemoryRoomCatalog::seeded(["general", "random"])))
            .build();
        state.coordinator.join("alice", "general").await.unwrap();
        state.coordinator.join("bob", "general").await.unwrap();

        let request = Request::builder()
            .method("GET")
            .uri("/rooms")
            .body(Body::empty())
            .unwrap();

        let response = app(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let rooms = read_rooms(response).await;
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[0].name, "general");
        assert_eq!(rooms[0].member_count, 2);
        assert_eq!(rooms[1].name, "random");
        assert_eq!(rooms[1].member_count, 0);
    }

    #[tokio::test]
    async fn test_list_rooms_handler_empty() {
        let state = AppStateBuilder::new().build();

        let request = Request::builder()
            .method("GET")
            .uri("/rooms")
            .body(Body::empty())
            .unwrap();

        let response = app(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(read_rooms(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_create_room_handler() {
        let state = AppStateBuilder::new().build();

        let response = app(state.clone())
            .oneshot(post_room(r#"{"name": " dev "}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let room: RoomResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(room.name, "dev");
        assert_eq!(room.member_count, 0);
        assert!(state.room_catalog.contains("dev").await.unwrap());
    }

    #[tokio::test]
    async fn test_create_room_handler_duplicate() {
        let state = AppStateBuilder::new()
            .with_room_catalog(Arc::new(InMemoryRoomCatalog::seeded(["general"])))
            .build();

        let response = app(state)
            .oneshot(post_room(r#"{"name": "general"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_create_room_handler_blank_name() {
        let state = AppStateBuilder::new().build();

        let response = app(state)
            .oneshot(post_room(r#"{"name": "   "}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_room_handler_missing_field() {
        let state = AppStateBuilder::new().build();

        let response = app(state)
            .oneshot(post_room(r#"{"title": "dev"}"#))
            .await
            .unwrap();

        // Should return 422 Unprocessable Entity for invalid JSON structure
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
