use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

use crate::relay::ConnectionId;

/// The transport side of the relay: live outbound channels per connection.
///
/// All sends are fire-and-forget; a message for a connection that no longer
/// exists is silently dropped.
#[async_trait]
pub trait ConnectionManager: Send + Sync {
    async fn add_connection(&self, connection_id: ConnectionId, sender: mpsc::UnboundedSender<String>);

    async fn remove_connection(&self, connection_id: ConnectionId);

    /// Unicast; no-op if the connection is gone.
    async fn send_to_connection(&self, connection_id: ConnectionId, message: &str);

    /// Fan-out to an explicit list of connections.
    async fn send_to_connections(&self, connection_ids: &[ConnectionId], message: &str);

    /// Every live connection on the server.
    async fn broadcast(&self, message: &str);

    /// Every live connection except one.
    async fn broadcast_except(&self, connection_id: ConnectionId, message: &str);
}

pub struct InMemoryConnectionManager {
    // connection id -> sender
    connections: Arc<RwLock<HashMap<ConnectionId, mpsc::UnboundedSender<String>>>>,
}

impl Default for InMemoryConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl ConnectionManager for InMemoryConnectionManager {
    async fn add_connection(&self, connection_id: ConnectionId, sender: mpsc::UnboundedSender<String>) {
        let mut connections = self.connections.write().await;
        connections.insert(connection_id, sender);
    }

    async fn remove_connection(&self, connection_id: ConnectionId) {
        let mut connections = self.connections.write().await;
        connections.remove(&connection_id);
    }

    async fn send_to_connection(&self, connection_id: ConnectionId, message: &str) {
        let connections = self.connections.read().await;
        if let Some(sender) = connections.get(&connection_id) {
            let _ = sender.send(message.to_string());
        }
    }

    async fn send_to_connections(&self, connection_ids: &[ConnectionId], message: &str) {
        let connections = self.connections.read().await;
        for connection_id in connection_ids {
            if let Some(sender) = connections.get(connection_id) {
                let _ = sender.send(message.to_string());
            }
        }
    }

    async fn broadcast(&self, message: &str) {
        let connections = self.connections.read().await;
        for sender in connections.values() {
            let _ = sender.send(message.to_string());
        }
    }

    async fn broadcast_except(&self, connection_id: ConnectionId, message: &str) {
        let connections = self.connections.read().await;
        for (id, sender) in connections.iter() {
            if *id != connection_id {
                let _ = sender.send(message.to_string());
            }
        }
    }
}
