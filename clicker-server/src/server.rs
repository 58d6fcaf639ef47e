use crate::config::RelayConfig;
use crate::signaling::{SignalingService, ws_handler};
use axum::{Router, routing::get};
use std::future::Future;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info};

/// Floor for the sweep period; a zero interval would spin.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// HTTP front of the relay: the WebSocket route plus the idle-room sweeper.
pub struct RelayServer {
    service: SignalingService,
}

impl RelayServer {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            service: SignalingService::new(config),
        }
    }

    pub fn service(&self) -> &SignalingService {
        &self.service
    }

    pub fn router(&self) -> Router {
        let config = self.service.config();
        let mut app = Router::new().route(&config.path, get(ws_handler));

        if config.allow_any_origin {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            app = app.layer(cors);
        }

        app.with_state(self.service.clone())
    }

    /// Periodically drops rooms that stayed empty past the configured TTL.
    pub fn spawn_sweeper(&self) -> Option<JoinHandle<()>> {
        let ttl = self.service.config().room_idle_ttl?;
        let period = self.service.config().sweep_interval.max(MIN_SWEEP_INTERVAL);
        let registry = self.service.registry().clone();

        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = registry.sweep_idle(ttl);
                if removed > 0 {
                    info!("Reaped {} idle room(s), {} left", removed, registry.len());
                } else {
                    debug!("Idle sweep: nothing to reap");
                }
            }
        }))
    }

    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Ok(addr) = listener.local_addr() {
            info!(
                "Relay listening on ws://{}{}",
                addr,
                self.service.config().path
            );
        }

        let sweeper = self.spawn_sweeper();
        let result = axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await;

        if let Some(sweeper) = sweeper {
            sweeper.abort();
        }
        info!("Relay stopped");
        result
    }
}
