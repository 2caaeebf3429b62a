pub mod messages;
pub mod router;
pub mod state;

pub use messages::{ClientEvent, ServerEvent};
pub use router::{route, Outbound, Recipient};
pub use state::{ConnectionId, Member, RelayState};
