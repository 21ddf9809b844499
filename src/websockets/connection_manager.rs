use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

#[async_trait]
pub trait ConnectionManager: Send + Sync {
    /// Registers the outbound queue for an identity, replacing any older one
    async fn add_connection(
        &self,
        identity: String,
        connection_id: String,
        sender: mpsc::UnboundedSender<String>,
    );

    /// Removes the identity's queue if it still belongs to `connection_id`.
    /// Returns false when a newer connection has taken over.
    async fn remove_connection(&self, identity: &str, connection_id: &str) -> bool;

    /// Drops the identity's queue, which ends its connection loop
    async fn close_identity(&self, identity: &str) -> bool;

    async fn send_to_identity(&self, identity: &str, message: &str);

    async fn send_to_identities(&self, identities: &[String], message: &str);
}

struct RegisteredConnection {
    connection_id: String,
    sender: mpsc::UnboundedSender<String>,
}

pub struct InMemoryConnectionManager {
    // identity -> newest connection
    connections: Arc<RwLock<HashMap<String, RegisteredConnection>>>,
}

impl InMemoryConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConnectionManager for InMemoryConnectionManager {
    async fn add_connection(
        &self,
        identity: String,
        connection_id: String,
        sender: mpsc::UnboundedSender<String>,
    ) {
        let mut connections = self.connections.write().await;
        connections.insert(
            identity,
            RegisteredConnection {
                connection_id,
                sender,
            },
        );
    }

    async fn remove_connection(&self, identity: &str, connection_id: &str) -> bool {
        let mut connections = self.connections.write().await;
        match connections.get(identity) {
            Some(current) if current.connection_id == connection_id => {
                connections.remove(identity);
                true
            }
            _ => false,
        }
    }

    async fn close_identity(&self, identity: &str) -> bool {
        self.connections.write().await.remove(identity).is_some()
    }

    async fn send_to_identity(&self, identity: &str, message: &str) {
        let connections = self.connections.read().await;
        if let Some(connection) = connections.get(identity) {
            let _ = connection.sender.send(message.to_string());
        }
    }

    async fn send_to_identities(&self, identities: &[String], message: &str) {
        let connections = self.connections.read().await;
        for identity in identities {
            if let Some(connection) = connections.get(identity) {
                let _ = connection.sender.send(message.to_string());
            }
        }
    }
}
