// Library crate for the rendezvous signaling relay
// This file exposes the public API for integration tests

pub mod config;
pub mod relay;
pub mod shared;
pub mod websockets;

// Re-export commonly used types for easier access in tests
pub use config::Config;
pub use relay::{ClientEvent, ConnectionId, Member, Outbound, Recipient, RelayState, ServerEvent};
pub use shared::AppState;
pub use websockets::{
    dispatch, ConnectionManager, InMemoryConnectionManager, MessageHandler, RelayReceiveHandler,
};
