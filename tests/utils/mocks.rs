use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

use rendezvous::{ConnectionId, ConnectionManager, ServerEvent};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Connection manager double that records every delivery per connection.
///
/// Only live (registered, not yet removed) connections record anything, so
/// sends to vanished targets are observably dropped, like the real manager.
#[derive(Clone, Default)]
pub struct MockConnectionManager {
    sent_messages: Arc<RwLock<HashMap<ConnectionId, Vec<String>>>>,
    connected: Arc<RwLock<Vec<ConnectionId>>>,
}

impl MockConnectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_messages_for(&self, connection_id: ConnectionId) -> Vec<String> {
        self.sent_messages
            .read()
            .await
            .get(&connection_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Delivered frames parsed back into server events.
    pub async fn events_for(&self, connection_id: ConnectionId) -> Vec<ServerEvent> {
        self.get_messages_for(connection_id)
            .await
            .iter()
            .map(|m| serde_json::from_str(m).expect("delivered frame should be a server event"))
            .collect()
    }

    pub async fn clear_messages(&self) {
        self.sent_messages.write().await.clear();
    }

    async fn is_connected(&self, connection_id: ConnectionId) -> bool {
        self.connected.read().await.contains(&connection_id)
    }

    async fn record(&self, connection_id: ConnectionId, message: &str) {
        self.sent_messages
            .write()
            .await
            .entry(connection_id)
            .or_default()
            .push(message.to_string());
    }
}

#[async_trait]
impl ConnectionManager for MockConnectionManager {
    async fn add_connection(
        &self,
        connection_id: ConnectionId,
        _sender: mpsc::UnboundedSender<String>,
    ) {
        self.connected.write().await.push(connection_id);
    }

    async fn remove_connection(&self, connection_id: ConnectionId) {
        self.connected.write().await.retain(|c| *c != connection_id);
    }

    async fn send_to_connection(&self, connection_id: ConnectionId, message: &str) {
        if self.is_connected(connection_id).await {
            self.record(connection_id, message).await;
        }
    }

    async fn send_to_connections(&self, connection_ids: &[ConnectionId], message: &str) {
        for connection_id in connection_ids {
            self.send_to_connection(*connection_id, message).await;
        }
    }

    async fn broadcast(&self, message: &str) {
        let connected = self.connected.read().await.clone();
        for connection_id in connected {
            self.record(connection_id, message).await;
        }
    }

    async fn broadcast_except(&self, connection_id: ConnectionId, message: &str) {
        let connected = self.connected.read().await.clone();
        for id in connected {
            if id != connection_id {
                self.record(id, message).await;
            }
        }
    }
}
