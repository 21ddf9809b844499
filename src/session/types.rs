use serde::{Deserialize, Serialize};

/// JWT claims structure containing session information
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    pub session_id: String,
    pub username: String,
    pub exp: usize, // Expiration timestamp (standard JWT claim)
    pub iat: usize, // Issued at timestamp (standard JWT claim)
}

/// Request body for session creation; omit `username` to get a generated one
#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    pub username: Option<String>,
}

/// Response structure for session creation endpoint
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SessionResponse {
    pub session_id: String, // The JWT token
    pub username: String,
}
