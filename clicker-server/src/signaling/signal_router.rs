use crate::error::RelayError;
use crate::room::RoomRegistry;
use crate::transport::Connection;
use clicker_core::{Envelope, Vocabulary};
use std::sync::Arc;
use tracing::{debug, warn};

/// Forwards signals from one slot of a room to the other.
#[derive(Clone)]
pub struct SignalRouter {
    registry: RoomRegistry,
    vocabulary: Arc<Vocabulary>,
}

impl SignalRouter {
    pub fn new(registry: RoomRegistry, vocabulary: Vocabulary) -> Self {
        Self {
            registry,
            vocabulary: Arc::new(vocabulary),
        }
    }

    /// Handles one inbound text frame. Failures go back to the sender according to
    /// their class and never reach the peer.
    pub fn route(&self, sender: &Connection, text: &str) {
        if !sender.is_open() {
            debug!("Ignoring message from closed connection {}", sender.id());
            return;
        }
        if let Err(e) = self.dispatch(sender, text) {
            warn!(
                "Rejected message from {} ({}) in room {}: {}",
                sender.id(),
                sender.role(),
                sender.token(),
                e
            );
            sender.reject(&e);
        }
    }

    pub fn dispatch(&self, sender: &Connection, text: &str) -> Result<(), RelayError> {
        match Envelope::parse(text)? {
            Envelope::Ping => {
                sender.send(&Envelope::Pong);
                Ok(())
            }
            Envelope::Signal { name } => self.forward(sender, name),
            other => Err(RelayError::UnexpectedKind(other.kind())),
        }
    }

    fn forward(&self, sender: &Connection, name: String) -> Result<(), RelayError> {
        if !self.vocabulary.accepts(&name) {
            return Err(RelayError::UnknownSignal(name));
        }

        let peer = self
            .registry
            .peer(sender.token(), sender.role())
            .ok_or(RelayError::PeerNotConnected)?;

        debug!(
            "Forwarding '{}' {} -> {} in room {}",
            name,
            sender.role(),
            peer.role(),
            sender.token()
        );
        peer.try_send(&Envelope::Signal { name })
            .map_err(|_| RelayError::PeerNotConnected)
    }
}
