use std::sync::Arc;
use tokio::sync::mpsc;

use rendezvous::{
    relay::router, ClientEvent, ConnectionId, ConnectionManager, MessageHandler,
    RelayReceiveHandler, RelayState,
};

use super::mocks::MockConnectionManager;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

/// One relay instance wired to a recording connection manager, driven the
/// same way the real socket loop drives it: raw JSON frames through the
/// receive handler.
pub struct TestSetup {
    pub relay: Arc<RelayState>,
    pub connections: Arc<MockConnectionManager>,
    handler: RelayReceiveHandler,
}

impl TestSetup {
    pub fn new() -> Self {
        let relay = Arc::new(RelayState::new());
        let connections = Arc::new(MockConnectionManager::new());
        let handler = RelayReceiveHandler::new(
            relay.clone(),
            connections.clone() as Arc<dyn ConnectionManager>,
        );
        Self {
            relay,
            connections,
            handler,
        }
    }

    /// Simulates a socket accept: fresh id, registered with the manager.
    pub async fn connect(&self) -> ConnectionId {
        let connection_id = ConnectionId::new();
        let (sender, _receiver) = mpsc::unbounded_channel();
        self.connections.add_connection(connection_id, sender).await;
        connection_id
    }

    pub async fn send(&self, connection_id: ConnectionId, event: ClientEvent) {
        let frame = serde_json::to_string(&event).expect("client event should serialize");
        self.handler.handle_message(connection_id, frame).await;
    }

    /// Feeds an arbitrary frame through the handler, bypassing serialization.
    pub async fn send_raw(&self, connection_id: ConnectionId, frame: &str) {
        self.handler
            .handle_message(connection_id, frame.to_string())
            .await;
    }

    pub async fn join(&self, connection_id: ConnectionId, room_id: &str, name: &str) {
        self.send(
            connection_id,
            ClientEvent::JoinRoom {
                room_id: room_id.to_string(),
                user: serde_json::json!({ "name": name }),
            },
        )
        .await;
    }

    /// Simulates the socket closing: deregister, then run the disconnect
    /// fan-out, mirroring the real connection teardown order.
    pub async fn disconnect(&self, connection_id: ConnectionId) {
        self.connections.remove_connection(connection_id).await;
        let outbound = router::disconnect(&self.relay, connection_id);
        rendezvous::dispatch(self.connections.as_ref(), connection_id, outbound).await;
    }

    pub async fn clear_messages(&self) {
        self.connections.clear_messages().await;
    }
}

impl Default for TestSetup {
    fn default() -> Self {
        Self::new()
    }
}
