use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    generators::{PetNameUsernameGenerator, UsernameGenerator},
    models::SessionModel,
    repository::SessionRepository,
    token::TokenConfig,
    types::{SessionClaims, SessionResponse},
};
use crate::room::models::{ASSISTANT_AUTHOR, SYSTEM_AUTHOR};
use crate::shared::AppError;

pub const MAX_USERNAME_CHARS: usize = 32;

const MAX_GENERATION_ATTEMPTS: usize = 5;

/// Service for handling session business logic
pub struct SessionService {
    token_config: TokenConfig,
    repository: Arc<dyn SessionRepository + Send + Sync>,
    username_generator: Arc<dyn UsernameGenerator>,
}

impl SessionService {
    pub fn new(
        repository: Arc<dyn SessionRepository + Send + Sync>,
        token_config: TokenConfig,
    ) -> Self {
        Self::with_generator(
            repository,
            token_config,
            Arc::new(PetNameUsernameGenerator::new()),
        )
    }

    pub fn with_generator(
        repository: Arc<dyn SessionRepository + Send + Sync>,
        token_config: TokenConfig,
        username_generator: Arc<dyn UsernameGenerator>,
    ) -> Self {
        Self {
            token_config,
            repository,
            username_generator,
        }
    }

    /// Creates a session for the requested username, or a generated one
    #[instrument(skip(self))]
    pub async fn create_session(
        &self,
        requested: Option<String>,
    ) -> Result<SessionResponse, AppError> {
        let session = match requested {
            Some(name) => {
                let session =
                    SessionModel::new(validate_username(&name)?, self.token_config.expiration_days);
                self.repository.create_session(&session).await?;
                session
            }
            None => self.create_with_generated_name().await?,
        };

        let token = self
            .token_config
            .create_token(session.id.clone(), session.username.clone())?;

        info!(username = %session.username, session_id = %session.id, "Session created");
        Ok(SessionResponse {
            session_id: token,
            username: session.username,
        })
    }

    /// Validates a session token and returns the claims if valid
    #[instrument(skip(self, token))]
    pub async fn validate_session(&self, token: &str) -> Result<SessionClaims, AppError> {
        let claims = self.token_config.validate_token(token)?;

        match self.repository.get_session(&claims.session_id).await? {
            Some(session_model) if session_model.is_expired() => {
                warn!(session_id = %claims.session_id, "Session has expired");
                Err(AppError::Unauthorized("Session has expired".to_string()))
            }
            Some(_) => Ok(claims),
            None => {
                warn!(
                    session_id = %claims.session_id,
                    "Session not found - may have been revoked"
                );
                Err(AppError::Unauthorized(
                    "Session not found or has been revoked".to_string(),
                ))
            }
        }
    }

    /// Revokes the session behind a token, returning its claims
    #[instrument(skip(self, token))]
    pub async fn revoke_session(&self, token: &str) -> Result<SessionClaims, AppError> {
        let claims = self.validate_session(token).await?;
        self.repository.delete_session(&claims.session_id).await?;

        info!(
            username = %claims.username,
            session_id = %claims.session_id,
            "Session revoked"
        );
        Ok(claims)
    }

    pub async fn cleanup_expired_sessions(&self) -> Result<u64, AppError> {
        self.repository.cleanup_expired_sessions().await
    }

    async fn create_with_generated_name(&self) -> Result<SessionModel, AppError> {
        for _ in 0..MAX_GENERATION_ATTEMPTS {
            let candidate = self.username_generator.generate().await;
            let session = SessionModel::new(candidate, self.token_config.expiration_days);
            match self.repository.create_session(&session).await {
                Ok(()) => return Ok(session),
                Err(AppError::Conflict(_)) => continue,
                Err(e) => return Err(e),
            }
        }

        warn!(
            attempts = MAX_GENERATION_ATTEMPTS,
            "Could not generate a free username"
        );
        Err(AppError::Internal)
    }
}

/// Trims a requested username and checks it can be used as an identity
pub fn validate_username(raw: &str) -> Result<String, AppError> {
    let username = raw.trim();

    if username.is_empty() {
        return Err(AppError::BadRequest("Username must not be empty".to_string()));
    }
    if username.chars().count() > MAX_USERNAME_CHARS {
        return Err(AppError::BadRequest(format!(
            "Username must be at most {} characters",
            MAX_USERNAME_CHARS
        )));
    }
    if username.eq_ignore_ascii_case(SYSTEM_AUTHOR) || username.eq_ignore_ascii_case(ASSISTANT_AUTHOR)
    {
        return Err(AppError::BadRequest(format!(
            "Username '{}' is reserved",
            username
        )));
    }

    Ok(username.to_string())
}
