use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::SessionModel;
use crate::shared::AppError;

/// Trait for session repository operations
#[async_trait]
pub trait SessionRepository {
    /// Stores a session. Fails with `Conflict` when an unexpired session
    /// already holds the same username.
    async fn create_session(&self, session: &SessionModel) -> Result<(), AppError>;
    async fn get_session(&self, session_id: &str) -> Result<Option<SessionModel>, AppError>;
    async fn delete_session(&self, session_id: &str) -> Result<(), AppError>;
    async fn cleanup_expired_sessions(&self) -> Result<u64, AppError>;
}

/// In-memory implementation of SessionRepository
///
/// Sessions are lost when the process restarts.
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<String, SessionModel>>,
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySessionRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Creates an in-memory repository with pre-populated sessions
    pub fn with_sessions(sessions: Vec<SessionModel>) -> Self {
        let session_map = sessions
            .into_iter()
            .map(|session| (session.id.clone(), session))
            .collect();

        Self {
            sessions: RwLock::new(session_map),
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    #[instrument(skip(self, session))]
    async fn create_session(&self, session: &SessionModel) -> Result<(), AppError> {
        debug!(session_id = %session.id, username = %session.username, "Creating session in memory");

        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.id) {
            warn!(session_id = %session.id, "Session already exists in memory");
            return Err(AppError::Conflict("Session already exists".to_string()));
        }
        let username_taken = sessions
            .values()
            .any(|existing| existing.username == session.username && !existing.is_expired());
        if username_taken {
            warn!(username = %session.username, "Username already in use");
            return Err(AppError::Conflict(format!(
                "Username '{}' is already in use",
                session.username
            )));
        }
        sessions.insert(session.id.clone(), session.clone());

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_session(&self, session_id: &str) -> Result<Option<SessionModel>, AppError> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(session_id).cloned();

        match &session {
            Some(s) => {
                debug!(session_id = %session_id, username = %s.username, "Session found in memory")
            }
            None => debug!(session_id = %session_id, "Session not found in memory"),
        }

        Ok(session)
    }

    #[instrument(skip(self))]
    async fn delete_session(&self, session_id: &str) -> Result<(), AppError> {
        let mut sessions = self.sessions.write().await;
        if sessions.remove(session_id).is_none() {
            warn!(session_id = %session_id, "Session not found for deletion in memory");
            return Err(AppError::NotFound("Session not found".to_string()));
        }

        debug!(session_id = %session_id, "Session deleted from memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn cleanup_expired_sessions(&self) -> Result<u64, AppError> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired());
        let removed = (before - sessions.len()) as u64;

        debug!(removed_count = removed, "Cleaned up expired sessions from memory");
        Ok(removed)
    }
}
