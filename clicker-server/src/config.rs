use clicker_core::Vocabulary;
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_BIND: &str = "0.0.0.0:3000";
pub const DEFAULT_PATH: &str = "/ws";
pub const DEFAULT_ROOM_IDLE_TTL: Duration = Duration::from_secs(600);
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Address the HTTP listener binds to.
    pub bind: SocketAddr,
    /// Route serving the WebSocket upgrade.
    pub path: String,
    /// Signal names the router forwards.
    pub vocabulary: Vocabulary,
    /// How long a room with both slots empty survives. `None` keeps rooms forever.
    pub room_idle_ttl: Option<Duration>,
    pub sweep_interval: Duration,
    /// Permissive CORS, needed when the controller page is served from another origin.
    pub allow_any_origin: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 3000)),
            path: DEFAULT_PATH.to_string(),
            vocabulary: Vocabulary::default(),
            room_idle_ttl: Some(DEFAULT_ROOM_IDLE_TTL),
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            allow_any_origin: true,
        }
    }
}
