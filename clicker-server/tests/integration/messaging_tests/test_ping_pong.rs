use clicker_core::{Envelope, Role};
use clicker_server::RelayConfig;

use crate::integration::{init_tracing, spawn_test_relay};
use crate::utils::join_room;

#[tokio::test]
async fn test_ping_without_peer_gets_pong() {
    init_tracing();

    let (addr, _service) = spawn_test_relay(RelayConfig::default()).await;
    let (mut web, _) = join_room(addr, "alone", Role::Web)
        .await
        .expect("Failed to join");

    web.send(&Envelope::Ping).await.unwrap();

    assert_eq!(web.expect_envelope().await.unwrap(), Envelope::Pong);
}

#[tokio::test]
async fn test_signal_without_peer_reports_error() {
    init_tracing();

    let (addr, _service) = spawn_test_relay(RelayConfig::default()).await;
    let (mut web, _) = join_room(addr, "alone", Role::Web)
        .await
        .expect("Failed to join");

    web.send_signal("signal-1").await.unwrap();

    assert_eq!(
        web.expect_envelope().await.unwrap(),
        Envelope::error("peer not connected")
    );
}
