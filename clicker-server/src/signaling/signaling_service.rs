use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::room::{JoinOutcome, RoomRegistry};
use crate::signaling::SignalRouter;
use crate::transport::{Connection, TransportEvent};
use clicker_core::Envelope;
use std::sync::Arc;
use tracing::{info, warn};

struct SignalingInner {
    registry: RoomRegistry,
    router: SignalRouter,
    config: RelayConfig,
}

/// Shared relay state handed to every WebSocket handler.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
}

impl SignalingService {
    pub fn new(config: RelayConfig) -> Self {
        let registry = RoomRegistry::new();
        let router = SignalRouter::new(registry.clone(), config.vocabulary.clone());
        Self {
            inner: Arc::new(SignalingInner {
                registry,
                router,
                config,
            }),
        }
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.inner.registry
    }

    pub fn config(&self) -> &RelayConfig {
        &self.inner.config
    }

    /// Acknowledges the handshake with `connected`, then takes the room slot,
    /// which broadcasts the new occupancy.
    pub fn attach(&self, connection: Arc<Connection>) -> JoinOutcome {
        info!(
            "Connection {} joined room {} as {}",
            connection.id(),
            connection.token(),
            connection.role()
        );
        connection.send(&Envelope::Connected {
            role: connection.role(),
            token: connection.token().clone(),
        });
        self.inner.registry.join(connection)
    }

    pub fn handle_event(&self, connection: &Connection, event: TransportEvent) {
        match event {
            TransportEvent::Text(text) => self.inner.router.route(connection, &text),
            TransportEvent::Binary => {
                let e = RelayError::BinaryFrame;
                warn!("Rejected frame from {}: {}", connection.id(), e);
                connection.reject(&e);
            }
            TransportEvent::Closed => {
                self.detach(connection);
            }
            TransportEvent::Failed(reason) => {
                warn!("Transport error on {}: {}", connection.id(), reason);
                self.detach(connection);
            }
        }
    }

    /// Single cleanup path for close and error. Safe to call more than once: only the
    /// first call that still owns the slot clears it and broadcasts.
    pub fn detach(&self, connection: &Connection) -> bool {
        connection.mark_closed();
        let left = self
            .inner
            .registry
            .leave(connection.token(), connection.role(), connection.id());
        if left {
            info!(
                "Connection {} left room {} ({})",
                connection.id(),
                connection.token(),
                connection.role()
            );
        }
        left
    }
}
