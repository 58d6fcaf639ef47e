mod command;
mod connection_id;
mod role;
mod signaling;
mod token;

pub use command::{Command, SIGNAL_NEXT, SIGNAL_PREVIOUS, Vocabulary};
pub use connection_id::ConnectionId;
pub use role::{ParseRoleError, Role};
pub use signaling::{Envelope, Presence};
pub use token::Token;
