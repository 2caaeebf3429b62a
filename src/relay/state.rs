use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

/// Opaque identifier for one live client connection.
///
/// Allocated on socket accept and never reused for the lifetime of the
/// process. Serialized as a plain string on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One room member as it appears on the wire in `all users`.
///
/// The `user` blob is whatever display payload the client sent on join;
/// the server never looks inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    #[serde(rename = "userId")]
    pub user_id: ConnectionId,
    pub user: Value,
}

#[derive(Debug, Default)]
struct Room {
    /// Insertion-ordered, no duplicate connection ids.
    members: Vec<Member>,
    /// Last whiteboard payload, replaced wholesale on every update.
    document: Option<Value>,
}

#[derive(Debug, Default)]
struct Inner {
    /// Connection registry: which room a connection last joined.
    socket_to_room: HashMap<ConnectionId, String>,
    /// Room directory: members and whiteboard state per room.
    rooms: HashMap<String, Room>,
}

/// All mutable relay state, constructed once per process and injected into
/// every handler.
///
/// A single lock guards both maps: every operation is one small map/set
/// update, and a connection must never be observed in two rooms at once.
/// Rooms are created on first use and retained when they empty out, so a
/// whiteboard document survives until restart even if everyone leaves.
#[derive(Debug, Default)]
pub struct RelayState {
    inner: Mutex<Inner>,
}

impl RelayState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection to a room and returns the member snapshot as it
    /// existed before the join, excluding the joiner.
    ///
    /// Re-joining the same room replaces the stored user blob instead of
    /// duplicating the entry. Joining a different room drops the old member
    /// entry without notifying the old room.
    pub fn join(&self, room_id: &str, user_id: ConnectionId, user: Value) -> Vec<Member> {
        let mut inner = self.inner.lock().unwrap();

        if let Some(previous) = inner.socket_to_room.get(&user_id).cloned() {
            if previous != room_id {
                debug!(
                    connection_id = %user_id,
                    old_room = %previous,
                    new_room = %room_id,
                    "Connection switching rooms, removing old membership"
                );
                if let Some(room) = inner.rooms.get_mut(&previous) {
                    room.members.retain(|m| m.user_id != user_id);
                }
            }
        }
        inner.socket_to_room.insert(user_id, room_id.to_string());

        let room = inner.rooms.entry(room_id.to_string()).or_default();
        let snapshot: Vec<Member> = room
            .members
            .iter()
            .filter(|m| m.user_id != user_id)
            .cloned()
            .collect();

        match room.members.iter_mut().find(|m| m.user_id == user_id) {
            Some(existing) => existing.user = user,
            None => room.members.push(Member { user_id, user }),
        }

        info!(
            room_id = %room_id,
            connection_id = %user_id,
            member_count = room.members.len(),
            "Connection joined room"
        );

        snapshot
    }

    /// Removes a member entry; tolerates unknown rooms and late or duplicate
    /// leaves.
    pub fn leave(&self, room_id: &str, user_id: ConnectionId) {
        let mut inner = self.inner.lock().unwrap();

        if let Some(room) = inner.rooms.get_mut(room_id) {
            room.members.retain(|m| m.user_id != user_id);
        }
        if inner.socket_to_room.get(&user_id).map(String::as_str) == Some(room_id) {
            inner.socket_to_room.remove(&user_id);
        }

        info!(room_id = %room_id, connection_id = %user_id, "Connection left room");
    }

    /// Removes every trace of a connection from shared state.
    ///
    /// Returns the room the connection was in, or `None` if it had no room
    /// association (including on a repeated call, which is a no-op).
    pub fn disconnect(&self, user_id: ConnectionId) -> Option<String> {
        let mut inner = self.inner.lock().unwrap();

        let room_id = inner.socket_to_room.remove(&user_id)?;
        if let Some(room) = inner.rooms.get_mut(&room_id) {
            room.members.retain(|m| m.user_id != user_id);
        }

        info!(room_id = %room_id, connection_id = %user_id, "Connection disconnected");
        Some(room_id)
    }

    /// Replaces the room's whiteboard document, creating the room entry if
    /// needed. Last writer wins, no merging.
    pub fn set_document(&self, room_id: &str, doc: Value) {
        let mut inner = self.inner.lock().unwrap();
        let room = inner.rooms.entry(room_id.to_string()).or_default();
        room.document = Some(doc);

        debug!(room_id = %room_id, "Whiteboard document replaced");
    }

    /// Last-known whiteboard document for a room, if any was ever sent.
    pub fn document(&self, room_id: &str) -> Option<Value> {
        let inner = self.inner.lock().unwrap();
        inner.rooms.get(room_id).and_then(|r| r.document.clone())
    }

    /// Member ids of a room excluding the given connection, for
    /// sender-excluded fan-out.
    pub fn members_excluding(&self, room_id: &str, user_id: ConnectionId) -> Vec<ConnectionId> {
        let inner = self.inner.lock().unwrap();
        inner
            .rooms
            .get(room_id)
            .map(|room| {
                room.members
                    .iter()
                    .filter(|m| m.user_id != user_id)
                    .map(|m| m.user_id)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Current member snapshot of a room, in insertion order.
    pub fn members(&self, room_id: &str) -> Vec<Member> {
        let inner = self.inner.lock().unwrap();
        inner
            .rooms
            .get(room_id)
            .map(|room| room.members.clone())
            .unwrap_or_default()
    }

    /// The room a connection last joined, if any.
    pub fn room_of(&self, user_id: ConnectionId) -> Option<String> {
        let inner = self.inner.lock().unwrap();
        inner.socket_to_room.get(&user_id).cloned()
    }
}
