use async_trait::async_trait;
use axum::{
    extract::{State, WebSocketUpgrade},
    response::Response,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::relay::{router, ClientEvent, ConnectionId, Outbound, Recipient, RelayState};
use crate::shared::AppState;

use super::connection_manager::ConnectionManager;
use super::socket::{Connection, MessageHandler};

/// Parses inbound frames and runs them through the signaling router.
///
/// Malformed frames are logged and discarded; a stale or hostile client must
/// never be able to take the relay down.
pub struct RelayReceiveHandler {
    relay: Arc<RelayState>,
    connections: Arc<dyn ConnectionManager>,
}

impl RelayReceiveHandler {
    pub fn new(relay: Arc<RelayState>, connections: Arc<dyn ConnectionManager>) -> Self {
        Self { relay, connections }
    }
}

#[async_trait]
impl MessageHandler for RelayReceiveHandler {
    async fn handle_message(&self, connection_id: ConnectionId, message: String) {
        match serde_json::from_str::<ClientEvent>(&message) {
            Ok(event) => {
                let outbound = router::route(&self.relay, connection_id, event);
                dispatch(self.connections.as_ref(), connection_id, outbound).await;
            }
            Err(e) => {
                warn!(
                    connection_id = %connection_id,
                    error = %e,
                    "Discarding malformed frame"
                );
            }
        }
    }
}

/// Delivers routed events through the connection manager.
///
/// Serialization failures are logged and skipped; everything else is
/// fire-and-forget.
pub async fn dispatch(
    connections: &dyn ConnectionManager,
    sender: ConnectionId,
    outbound: Vec<Outbound>,
) {
    for Outbound { to, event } in outbound {
        let message = match serde_json::to_string(&event) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "Failed to serialize outbound event");
                continue;
            }
        };

        match to {
            Recipient::Sender => connections.send_to_connection(sender, &message).await,
            Recipient::One(id) => connections.send_to_connection(id, &message).await,
            Recipient::Many(ids) => connections.send_to_connections(&ids, &message).await,
            Recipient::All => connections.broadcast(&message).await,
            Recipient::AllExcept(id) => connections.broadcast_except(id, &message).await,
        }
    }
}

/// WebSocket endpoint: GET /ws
///
/// No authentication and no upfront room binding; everything after the
/// upgrade is driven by relay events on the socket.
pub async fn websocket_handler(ws: WebSocketUpgrade, State(app_state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_websocket_connection(socket, app_state))
}

/// Handle the upgraded WebSocket connection
async fn handle_websocket_connection(socket: axum::extract::ws::WebSocket, app_state: AppState) {
    let connection_id = ConnectionId::new();
    info!(connection_id = %connection_id, "WebSocket connection established");

    // Outbound channel (relay -> client)
    let (outbound_sender, outbound_receiver) = mpsc::unbounded_channel::<String>();

    app_state
        .connections
        .add_connection(connection_id, outbound_sender)
        .await;

    let message_handler = Arc::new(RelayReceiveHandler::new(
        app_state.relay.clone(),
        app_state.connections.clone(),
    ));

    let connection = Connection::new(
        connection_id,
        Box::new(socket),
        outbound_receiver,
        message_handler,
    );

    match connection.run().await {
        Ok(()) => {
            info!(connection_id = %connection_id, "WebSocket connection closed cleanly");
        }
        Err(e) => {
            warn!(
                connection_id = %connection_id,
                error = %e,
                "WebSocket connection error"
            );
        }
    }

    // Cleanup: drop the live channel first so the departing connection never
    // receives its own `user left`, then prune shared state and fan out.
    app_state.connections.remove_connection(connection_id).await;

    let outbound = router::disconnect(&app_state.relay, connection_id);
    dispatch(app_state.connections.as_ref(), connection_id, outbound).await;

    info!(connection_id = %connection_id, "WebSocket disconnect handled");
}
