mod connection;
mod transport_event;

pub use connection::*;
pub use transport_event::*;
