use async_trait::async_trait;
use std::{sync::Arc, time::Duration};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::room::CoordinatorError;

use super::fallback::CannedResponder;

/// Longest reply, in characters, that is posted to a room as-is
pub const MAX_REPLY_CHARS: usize = 500;

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("assistant request failed: {0}")]
    Request(String),

    #[error("assistant returned an empty reply")]
    EmptyReply,

    #[error("assistant did not reply within {0:?}")]
    Timeout(Duration),
}

/// Produces a reply for a prompt addressed to the assistant
#[async_trait]
pub trait Assistant: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AssistantError>;

    fn name(&self) -> &'static str;
}

/// Trims a reply, rejects empty ones and truncates long ones
pub fn normalize_reply(raw: &str) -> Result<String, AssistantError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(AssistantError::EmptyReply);
    }

    if text.chars().count() > MAX_REPLY_CHARS {
        let cut: String = text.chars().take(MAX_REPLY_CHARS - 3).collect();
        return Ok(format!("{}...", cut));
    }

    Ok(text.to_string())
}

/// Asks the remote assistant when one is configured, otherwise or on any
/// failure answers with a canned reply. Always produces a reply.
pub struct AssistantService {
    remote: Option<Arc<dyn Assistant>>,
    fallback: CannedResponder,
    timeout: Duration,
}

impl AssistantService {
    pub fn new(remote: Option<Arc<dyn Assistant>>, timeout: Duration) -> Self {
        Self {
            remote,
            fallback: CannedResponder::new(),
            timeout,
        }
    }

    /// Service with no remote assistant; every reply is canned
    pub fn canned() -> Self {
        Self::new(None, Duration::from_millis(0))
    }

    #[instrument(skip(self))]
    pub async fn reply(&self, prompt: &str) -> String {
        match self.ask_remote(prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "Using canned assistant reply");
                self.fallback.respond(prompt)
            }
        }
    }

    async fn ask_remote(&self, prompt: &str) -> Result<String, CoordinatorError> {
        let remote = self.remote.as_ref().ok_or_else(|| {
            CoordinatorError::AssistantUnavailable("no remote assistant configured".to_string())
        })?;

        let reply = tokio::time::timeout(self.timeout, remote.generate(prompt))
            .await
            .map_err(|_| AssistantError::Timeout(self.timeout))
            .and_then(|result| result)
            .and_then(|raw| normalize_reply(&raw))
            .map_err(|e| {
                CoordinatorError::AssistantUnavailable(format!("{}: {}", remote.name(), e))
            })?;

        debug!(assistant = remote.name(), "Remote assistant replied");
        Ok(reply)
    }
}
