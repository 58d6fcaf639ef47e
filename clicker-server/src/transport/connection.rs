use crate::error::RelayError;
use clicker_core::{ConnectionId, Envelope, Role, Token};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tracing::debug;

pub const CLOSE_NORMAL: u16 = 1000;
/// Handshake without a usable token or role.
pub const CLOSE_BAD_REQUEST: u16 = 4000;
/// Another connection took over the same role under the same token.
pub const CLOSE_REPLACED: u16 = 4001;

/// Frames queued for the connection's writer task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Text(String),
    Close { code: u16, reason: String },
}

/// One relay-side WebSocket connection, registered under a role and token.
///
/// Delivery is best effort: [`Connection::send`] never fails from the caller's point of
/// view. Writes go to an unbounded queue drained by a dedicated writer task, so nothing
/// here blocks, which lets the registry call it while holding a room entry.
#[derive(Debug)]
pub struct Connection {
    id: ConnectionId,
    role: Role,
    token: Token,
    open: AtomicBool,
    tx: mpsc::UnboundedSender<Outbound>,
}

impl Connection {
    pub fn new(role: Role, token: Token, tx: mpsc::UnboundedSender<Outbound>) -> Self {
        Self {
            id: ConnectionId::new(),
            role,
            token,
            open: AtomicBool::new(true),
            tx,
        }
    }

    /// Connection together with the receiving end of its outbound queue.
    pub fn channel(role: Role, token: Token) -> (Arc<Self>, mpsc::UnboundedReceiver<Outbound>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self::new(role, token, tx)), rx)
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    /// False once closed locally or once the writer task has gone away.
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire) && !self.tx.is_closed()
    }

    pub fn try_send(&self, envelope: &Envelope) -> Result<(), RelayError> {
        if !self.is_open() {
            return Err(RelayError::Transport("connection closed".to_string()));
        }
        let json = envelope
            .to_json()
            .map_err(|e| RelayError::Transport(e.to_string()))?;
        self.tx
            .send(Outbound::Text(json))
            .map_err(|_| RelayError::Transport("writer gone".to_string()))
    }

    /// Deliver, ignoring failure.
    pub fn send(&self, envelope: &Envelope) {
        if let Err(e) = self.try_send(envelope) {
            debug!(
                "Dropped '{}' for {} ({}): {}",
                envelope.kind(),
                self.id,
                self.role,
                e
            );
        }
    }

    /// Reacts to `error` as its class demands: an `error` envelope for anything the sender
    /// should see, then a close when the class ends the connection.
    pub fn reject(&self, error: &RelayError) {
        let class = error.class();
        if class.is_reported() {
            self.send(&Envelope::error(error.to_string()));
        } else {
            debug!("Swallowed error on {} ({}): {}", self.id, self.role, error);
        }
        if let Some(code) = class.close_code() {
            self.close(code, "bad request");
        }
    }

    /// Returns `true` only for the call that actually closed the connection.
    pub fn close(&self, code: u16, reason: &str) -> bool {
        if !self.open.swap(false, Ordering::AcqRel) {
            return false;
        }
        let _ = self.tx.send(Outbound::Close {
            code,
            reason: reason.to_string(),
        });
        true
    }

    /// Marks the connection closed without queueing a close frame; the remote side is gone.
    pub fn mark_closed(&self) -> bool {
        self.open.swap(false, Ordering::AcqRel)
    }
}
