use tracing::debug;

use super::messages::{ClientEvent, ServerEvent};
use super::state::{ConnectionId, RelayState};

/// Who an outbound event is addressed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    /// The connection the inbound event came from.
    Sender,
    /// One specific connection; silently dropped if it no longer exists.
    One(ConnectionId),
    /// An explicit list of connections (room fan-out, sender already excluded).
    Many(Vec<ConnectionId>),
    /// Every live connection on the server, sender included.
    All,
    /// Every live connection except the given one.
    AllExcept(ConnectionId),
}

/// One event to deliver, produced by the routing table.
#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    pub to: Recipient,
    pub event: ServerEvent,
}

impl Outbound {
    fn to_sender(event: ServerEvent) -> Self {
        Self {
            to: Recipient::Sender,
            event,
        }
    }
}

/// The signaling dispatch table.
///
/// Each inbound event maps to one deterministic set of outbound events;
/// delivery is fire-and-forget and performed by the caller. The router never
/// inspects signal, chat, or whiteboard payloads. Unknown targets, unknown
/// rooms, and duplicate joins or leaves are absorbed as no-ops, never
/// surfaced to the sender.
pub fn route(state: &RelayState, sender: ConnectionId, event: ClientEvent) -> Vec<Outbound> {
    match event {
        ClientEvent::JoinRoom { room_id, user } => {
            let peers = state.join(&room_id, sender, user);
            let mut out = vec![Outbound::to_sender(ServerEvent::AllUsers(peers))];
            // Late joiners get the current canvas, if the room has one.
            if let Some(doc) = state.document(&room_id) {
                out.push(Outbound::to_sender(ServerEvent::UpdateWhiteboard(doc)));
            }
            out
        }

        ClientEvent::SendingSignal {
            user_to_signal,
            caller_id,
            signal,
            user,
        } => vec![Outbound {
            to: Recipient::One(user_to_signal),
            event: ServerEvent::UserJoined {
                signal,
                caller_id,
                user,
            },
        }],

        ClientEvent::ReturningSignal { caller_id, signal } => vec![Outbound {
            to: Recipient::One(caller_id),
            event: ServerEvent::ReceivingReturnedSignal { id: sender, signal },
        }],

        // Deliberately unscoped: every connection on the server gets the
        // chat payload, matching the deployed clients' expectations.
        ClientEvent::SendMessage(payload) => vec![Outbound {
            to: Recipient::All,
            event: ServerEvent::Message(payload),
        }],

        ClientEvent::UpdateWhiteboard { room_id, doc } => {
            state.set_document(&room_id, doc.clone());
            let others = state.members_excluding(&room_id, sender);
            if others.is_empty() {
                debug!(room_id = %room_id, "No other members to relay whiteboard update to");
                return Vec::new();
            }
            vec![Outbound {
                to: Recipient::Many(others),
                event: ServerEvent::UpdateWhiteboard(doc),
            }]
        }

        ClientEvent::LeaveRoom { room_id } => {
            state.leave(&room_id, sender);
            Vec::new()
        }
    }
}

/// Handles the implicit disconnect event: prunes the connection from shared
/// state and tells everyone else it is gone.
pub fn disconnect(state: &RelayState, sender: ConnectionId) -> Vec<Outbound> {
    match state.disconnect(sender) {
        Some(room_id) => debug!(connection_id = %sender, room_id = %room_id, "Routing disconnect"),
        None => debug!(connection_id = %sender, "Routing disconnect for roomless connection"),
    }
    vec![Outbound {
        to: Recipient::AllExcept(sender),
        event: ServerEvent::UserLeft(sender),
    }]
}
