use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::state::{ConnectionId, Member};

/// Events clients send to the relay.
///
/// Frames are JSON objects of the form `{"event": <name>, "data": <payload>}`.
/// The event names and payload field names are fixed by the deployed browser
/// clients and must not change. Signal, user, chat, and whiteboard payloads
/// are opaque blobs the server forwards verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    /// Join (or implicitly create) a room.
    #[serde(rename = "join room")]
    JoinRoom {
        #[serde(rename = "roomID")]
        room_id: String,
        user: Value,
    },

    /// Forward an offer to one peer in the room.
    #[serde(rename = "sending signal")]
    SendingSignal {
        #[serde(rename = "userToSignal")]
        user_to_signal: ConnectionId,
        #[serde(rename = "callerID")]
        caller_id: ConnectionId,
        signal: Value,
        user: Value,
    },

    /// Forward an answer back to the peer that sent the offer.
    #[serde(rename = "returning signal")]
    ReturningSignal {
        #[serde(rename = "callerID")]
        caller_id: ConnectionId,
        signal: Value,
    },

    /// Chat message; the payload is relayed untouched.
    #[serde(rename = "send message")]
    SendMessage(Value),

    /// Replace the room's whiteboard document.
    #[serde(rename = "update whiteboard")]
    UpdateWhiteboard {
        #[serde(rename = "roomID")]
        room_id: String,
        doc: Value,
    },

    /// Leave a room without closing the connection.
    #[serde(rename = "leave room")]
    LeaveRoom {
        #[serde(rename = "roomID")]
        room_id: String,
    },
}

/// Events the relay sends to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// Reply to `join room`: everyone already in the room, joiner excluded.
    #[serde(rename = "all users")]
    AllUsers(Vec<Member>),

    /// An offer relayed to its target.
    #[serde(rename = "user joined")]
    UserJoined {
        signal: Value,
        #[serde(rename = "callerID")]
        caller_id: ConnectionId,
        user: Value,
    },

    /// An answer relayed back to the original caller.
    #[serde(rename = "receiving returned signal")]
    ReceivingReturnedSignal { id: ConnectionId, signal: Value },

    /// Chat payload, relayed verbatim.
    #[serde(rename = "message")]
    Message(Value),

    /// Current whiteboard document.
    #[serde(rename = "update whiteboard")]
    UpdateWhiteboard(Value),

    /// A connection went away; carries the departing connection id.
    #[serde(rename = "user left")]
    UserLeft(ConnectionId),
}
