use serde::{Deserialize, Serialize};

/// Request payload for creating a new room
#[derive(Debug, Deserialize)]
pub struct RoomCreateRequest {
    pub name: String,
}

/// A catalog room with its current presence
#[derive(Debug, Serialize, Deserialize)]
pub struct RoomResponse {
    pub name: String,
    pub member_count: usize,
}
