use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

use super::service::{Assistant, AssistantError};

const USER_AGENT: &str = "roomchat-assistant/0.1";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    text: String,
}

/// Assistant backed by a remote text-generation endpoint
///
/// Sends `{"prompt": ...}` and expects `{"text": ...}` back.
pub struct HttpAssistant {
    client: Client,
    url: String,
}

impl HttpAssistant {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, AssistantError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AssistantError::Request(format!("failed to build client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl Assistant for HttpAssistant {
    #[instrument(skip(self, prompt), fields(url = %self.url))]
    async fn generate(&self, prompt: &str) -> Result<String, AssistantError> {
        let response = self
            .client
            .post(&self.url)
            .json(&GenerateRequest { prompt })
            .send()
            .await
            .map_err(|e| AssistantError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AssistantError::Request(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::Request(format!("invalid response body: {}", e)))?;

        debug!(reply_len = body.text.len(), "Assistant endpoint replied");
        Ok(body.text)
    }

    fn name(&self) -> &'static str {
        "HttpAssistant"
    }
}
