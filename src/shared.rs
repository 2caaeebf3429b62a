use std::sync::Arc;

use crate::relay::RelayState;
use crate::websockets::ConnectionManager;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<RelayState>,
    pub connections: Arc<dyn ConnectionManager>,
}

impl AppState {
    pub fn new(relay: Arc<RelayState>, connections: Arc<dyn ConnectionManager>) -> Self {
        Self { relay, connections }
    }
}
