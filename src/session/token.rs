use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, instrument};

use super::types::SessionClaims;
use crate::config::ChatConfig;
use crate::shared::AppError;

/// Configuration for JWT token operations
#[derive(Clone)]
pub struct TokenConfig {
    secret: String,
    pub expiration_days: i64,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>, expiration_days: i64) -> Self {
        Self {
            secret: secret.into(),
            expiration_days,
        }
    }

    pub fn from_config(config: &ChatConfig) -> Self {
        Self::new(config.jwt_secret.clone(), config.session_expiration_days)
    }

    /// Creates a new JWT token with the given session data
    #[instrument(skip(self, session_id, username))]
    pub fn create_token(&self, session_id: String, username: String) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = (now + Duration::days(self.expiration_days)).timestamp() as usize;

        debug!(
            expiration_days = self.expiration_days,
            exp_timestamp = exp,
            "Creating JWT token with expiration"
        );

        let claims = SessionClaims {
            session_id,
            username,
            exp,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )
        .map_err(|e| {
            debug!(error = %e, "Failed to encode JWT token");
            AppError::JwtError(e.to_string())
        })
    }

    /// Validates a JWT token and returns the claims if valid
    #[instrument(skip(self, token))]
    pub fn validate_token(&self, token: &str) -> Result<SessionClaims, AppError> {
        decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &Validation::default(),
        )
        .map(|data| {
            debug!(
                username = %data.claims.username,
                session_id = %data.claims.session_id,
                exp = data.claims.exp,
                "JWT token decoded successfully"
            );
            data.claims
        })
        .map_err(|e| {
            debug!(error = %e, "Failed to decode JWT token");
            AppError::JwtError(e.to_string())
        })
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self::from_config(&ChatConfig::default())
    }
}
