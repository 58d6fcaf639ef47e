use crate::model::role::Role;
use crate::model::token::Token;
use serde::{Deserialize, Serialize};

/// Occupancy of a room as reported in `status` envelopes.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct Presence {
    pub desktop: bool,
    pub web: bool,
}

impl Presence {
    pub fn is_present(&self, role: Role) -> bool {
        match role {
            Role::Desktop => self.desktop,
            Role::Web => self.web,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.desktop && !self.web
    }
}

/// Сообщение протокола, передаваемое по WebSocket в виде JSON.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Envelope {
    /// Relay confirms that the connection occupies a room slot.
    Connected { role: Role, token: Token },

    /// Room occupancy, sent to every occupant after each join or leave.
    Status(Presence),

    /// A command travelling between the paired endpoints.
    Signal { name: String },

    /// Validation or routing failure, delivered to the offending sender only.
    Error { message: String },

    Ping,

    Pong,
}

impl Envelope {
    pub fn signal(name: impl Into<String>) -> Self {
        Envelope::Signal { name: name.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Envelope::Error {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Envelope::Connected { .. } => "connected",
            Envelope::Status(_) => "status",
            Envelope::Signal { .. } => "signal",
            Envelope::Error { .. } => "error",
            Envelope::Ping => "ping",
            Envelope::Pong => "pong",
        }
    }

    pub fn parse(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
