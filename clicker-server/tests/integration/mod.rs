pub mod connection_tests;
pub mod messaging_tests;
pub mod multi_peer_tests;

use std::net::SocketAddr;

use clicker_server::{RelayConfig, RelayServer, SignalingService};
use tokio::net::TcpListener;
use tracing::Level;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Starts a relay on an ephemeral local port. The service handle shares the
/// relay's registry, so tests can inspect room state directly.
pub async fn spawn_test_relay(config: RelayConfig) -> (SocketAddr, SignalingService) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("No local addr");

    let server = RelayServer::new(config);
    let service = server.service().clone();

    tokio::spawn(async move {
        let _ = server.serve(listener, std::future::pending()).await;
    });

    (addr, service)
}
