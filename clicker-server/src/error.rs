use crate::transport::CLOSE_BAD_REQUEST;
use clicker_core::ParseRoleError;
use thiserror::Error;

/// Класс ошибки определяет реакцию релея.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Reply `error` to the sender, keep the connection open.
    Protocol,
    /// Reply `error`, then close with the bad-request code.
    Pairing,
    /// Reply `error` to the sender, drop the message.
    Routing,
    /// Never surfaced; logged and swallowed.
    Transport,
}

impl ErrorClass {
    /// Whether the sender gets an `error` envelope.
    pub fn is_reported(self) -> bool {
        !matches!(self, ErrorClass::Transport)
    }

    /// Close code that ends the connection after the report, if any.
    pub fn close_code(self) -> Option<u16> {
        match self {
            ErrorClass::Pairing => Some(CLOSE_BAD_REQUEST),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unexpected message type '{0}'")]
    UnexpectedKind(&'static str),

    #[error("unknown signal '{0}'")]
    UnknownSignal(String),

    #[error("binary frames are not supported")]
    BinaryFrame,

    #[error("invalid query: {0}")]
    BadQuery(String),

    #[error("missing or empty token")]
    MissingToken,

    #[error("missing role")]
    MissingRole,

    #[error(transparent)]
    InvalidRole(#[from] ParseRoleError),

    #[error("peer not connected")]
    PeerNotConnected,

    #[error("transport: {0}")]
    Transport(String),
}

impl RelayError {
    pub fn class(&self) -> ErrorClass {
        match self {
            RelayError::Malformed(_)
            | RelayError::UnexpectedKind(_)
            | RelayError::UnknownSignal(_)
            | RelayError::BinaryFrame => ErrorClass::Protocol,
            RelayError::BadQuery(_)
            | RelayError::MissingToken
            | RelayError::MissingRole
            | RelayError::InvalidRole(_) => ErrorClass::Pairing,
            RelayError::PeerNotConnected => ErrorClass::Routing,
            RelayError::Transport(_) => ErrorClass::Transport,
        }
    }
}
