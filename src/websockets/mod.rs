pub mod connection_manager;
pub mod handler;
pub mod socket;

pub use connection_manager::{ConnectionManager, InMemoryConnectionManager};
pub use handler::{dispatch, websocket_handler, RelayReceiveHandler};
pub use socket::{Connection, MessageHandler, SocketError, SocketWrapper};
