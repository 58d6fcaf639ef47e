mod signal_router;
mod signaling_service;
mod ws_handler;

pub use signal_router::*;
pub use signaling_service::*;
pub use ws_handler::*;
