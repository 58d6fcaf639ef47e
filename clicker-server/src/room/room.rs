use crate::transport::Connection;
use clicker_core::{ConnectionId, Envelope, Presence, Role};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Two-slot pairing state for one token.
#[derive(Debug)]
pub struct Room {
    desktop: Option<Arc<Connection>>,
    web: Option<Arc<Connection>>,
    emptied_at: Option<Instant>,
}

impl Room {
    pub(crate) fn new() -> Self {
        Self {
            desktop: None,
            web: None,
            emptied_at: Some(Instant::now()),
        }
    }

    fn slot_mut(&mut self, role: Role) -> &mut Option<Arc<Connection>> {
        match role {
            Role::Desktop => &mut self.desktop,
            Role::Web => &mut self.web,
        }
    }

    pub(crate) fn slot(&self, role: Role) -> Option<&Arc<Connection>> {
        match role {
            Role::Desktop => self.desktop.as_ref(),
            Role::Web => self.web.as_ref(),
        }
    }

    /// Installs `connection` in its role's slot and hands back whatever was there.
    pub(crate) fn occupy(&mut self, connection: Arc<Connection>) -> Option<Arc<Connection>> {
        self.emptied_at = None;
        self.slot_mut(connection.role()).replace(connection)
    }

    /// Clears the slot only if it still holds connection `id`.
    pub(crate) fn vacate(&mut self, role: Role, id: ConnectionId) -> bool {
        let slot = self.slot_mut(role);
        if slot.as_ref().map(|c| c.id()) != Some(id) {
            return false;
        }
        *slot = None;
        if self.desktop.is_none() && self.web.is_none() {
            self.emptied_at = Some(Instant::now());
        }
        true
    }

    pub fn presence(&self) -> Presence {
        let open = |slot: &Option<Arc<Connection>>| slot.as_ref().is_some_and(|c| c.is_open());
        Presence {
            desktop: open(&self.desktop),
            web: open(&self.web),
        }
    }

    /// Sends the current occupancy to every open occupant.
    pub(crate) fn broadcast_status(&self) -> Presence {
        let presence = self.presence();
        let status = Envelope::Status(presence);
        for connection in [&self.desktop, &self.web].into_iter().flatten() {
            if connection.is_open() {
                connection.send(&status);
            }
        }
        presence
    }

    pub(crate) fn is_idle(&self, now: Instant, ttl: Duration) -> bool {
        self.emptied_at
            .is_some_and(|since| now.saturating_duration_since(since) >= ttl)
    }
}
