use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A live login; its id is carried inside the session JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionModel {
    pub id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionModel {
    /// Creates a new session model with generated ID and timestamps
    pub fn new(username: String, expiration_days: i64) -> Self {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(expiration_days);

        Self {
            id: Uuid::new_v4().to_string(),
            username,
            created_at: now,
            expires_at,
        }
    }

    /// Checks if the session has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}
