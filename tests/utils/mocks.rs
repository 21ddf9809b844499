#![allow(dead_code)] // Test utilities may not all be used in every test

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};

use roomchat::{
    assistant::{Assistant, AssistantError},
    websockets::ConnectionManager,
};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Records every frame sent to each identity instead of writing to sockets
#[derive(Clone)]
pub struct MockConnectionManager {
    sent_messages: Arc<RwLock<HashMap<String, VecDeque<String>>>>,
    connected: Arc<RwLock<HashMap<String, String>>>,
}

impl MockConnectionManager {
    pub fn new() -> Self {
        Self {
            sent_messages: Arc::new(RwLock::new(HashMap::new())),
            connected: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn get_messages_for(&self, identity: &str) -> Vec<String> {
        self.sent_messages
            .read()
            .await
            .get(identity)
            .map(|queue| queue.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Removes and returns the oldest unread frame for an identity
    pub async fn consume_message_for(&self, identity: &str) -> Option<String> {
        self.sent_messages
            .write()
            .await
            .get_mut(identity)
            .and_then(VecDeque::pop_front)
    }

    pub async fn clear_messages(&self) {
        self.sent_messages.write().await.clear();
    }

    pub async fn is_connected(&self, identity: &str) -> bool {
        self.connected.read().await.contains_key(identity)
    }
}

#[async_trait]
impl ConnectionManager for MockConnectionManager {
    async fn add_connection(
        &self,
        identity: String,
        connection_id: String,
        _sender: mpsc::UnboundedSender<String>,
    ) {
        self.connected.write().await.insert(identity, connection_id);
    }

    async fn remove_connection(&self, identity: &str, connection_id: &str) -> bool {
        let mut connected = self.connected.write().await;
        if connected.get(identity).map(String::as_str) == Some(connection_id) {
            connected.remove(identity);
            return true;
        }
        false
    }

    async fn close_identity(&self, identity: &str) -> bool {
        self.connected.write().await.remove(identity).is_some()
    }

    async fn send_to_identity(&self, identity: &str, message: &str) {
        self.sent_messages
            .write()
            .await
            .entry(identity.to_string())
            .or_default()
            .push_back(message.to_string());
    }

    async fn send_to_identities(&self, identities: &[String], message: &str) {
        for identity in identities {
            self.send_to_identity(identity, message).await;
        }
    }
}

/// Remote assistant that always answers with the same text
pub struct FixedAssistant(pub &'static str);

#[async_trait]
impl Assistant for FixedAssistant {
    async fn generate(&self, _prompt: &str) -> Result<String, AssistantError> {
        Ok(self.0.to_string())
    }

    fn name(&self) -> &'static str {
        "FixedAssistant"
    }
}

/// Remote assistant that answers only after `delay`
pub struct SlowAssistant {
    pub delay: Duration,
}

#[async_trait]
impl Assistant for SlowAssistant {
    async fn generate(&self, _prompt: &str) -> Result<String, AssistantError> {
        tokio::time::sleep(self.delay).await;
        Ok("sorry, that took a while".to_string())
    }

    fn name(&self) -> &'static str {
        "SlowAssistant"
    }
}
