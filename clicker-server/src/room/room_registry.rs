use crate::room::Room;
use crate::transport::{CLOSE_REPLACED, Connection};
use clicker_core::{ConnectionId, Presence, Role, Token};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::info;

#[derive(Debug)]
pub struct JoinOutcome {
    /// Previous occupant of the slot, already closed with [`CLOSE_REPLACED`].
    pub replaced: Option<Arc<Connection>>,
    pub presence: Presence,
}

/// Token → room map. Every operation runs inside a single entry lock for its token;
/// the map itself is never handed out.
#[derive(Clone, Default)]
pub struct RoomRegistry {
    rooms: Arc<DashMap<Token, Room>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn join(&self, connection: Arc<Connection>) -> JoinOutcome {
        let token = connection.token().clone();
        let mut room = self.rooms.entry(token.clone()).or_insert_with(|| {
            info!("Creating new room: {}", token);
            Room::new()
        });

        let replaced = room.occupy(connection.clone());
        if let Some(previous) = &replaced {
            if previous.close(CLOSE_REPLACED, "replaced") {
                info!(
                    "Connection {} replaced by {} as {} in room {}",
                    previous.id(),
                    connection.id(),
                    connection.role(),
                    token
                );
            }
        }

        let presence = room.broadcast_status();
        JoinOutcome { replaced, presence }
    }

    /// Returns `false` when the slot no longer belongs to `id` (already left or replaced).
    pub fn leave(&self, token: &Token, role: Role, id: ConnectionId) -> bool {
        let Some(mut room) = self.rooms.get_mut(token) else {
            return false;
        };
        if !room.vacate(role, id) {
            return false;
        }
        room.broadcast_status();
        true
    }

    pub fn get(&self, token: &Token) -> Option<Presence> {
        self.rooms.get(token).map(|room| room.presence())
    }

    /// The open connection on the other side of `role`, if any.
    pub fn peer(&self, token: &Token, role: Role) -> Option<Arc<Connection>> {
        let room = self.rooms.get(token)?;
        room.slot(role.peer())
            .filter(|connection| connection.is_open())
            .cloned()
    }

    /// Drops rooms that have had both slots empty for at least `ttl`.
    pub fn sweep_idle(&self, ttl: Duration) -> usize {
        let now = Instant::now();
        let mut removed = 0;
        self.rooms.retain(|_, room| {
            let idle = room.is_idle(now, ttl);
            if idle {
                removed += 1;
            }
            !idle
        });
        removed
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
