use clicker_core::{Envelope, Presence, Role};
use clicker_server::RelayConfig;

use crate::integration::{init_tracing, spawn_test_relay};
use crate::utils::{expect_status, join_room, pair};

#[tokio::test]
async fn test_peer_leaves_other_stays() {
    init_tracing();

    let (addr, _service) = spawn_test_relay(RelayConfig::default()).await;
    let (mut desktop, web) = pair(addr, "leave").await.expect("Pairing failed");

    web.close().await.expect("Failed to close web");

    assert_eq!(
        expect_status(&mut desktop).await.unwrap(),
        Presence {
            desktop: true,
            web: false
        }
    );

    desktop.send_signal("signal-1").await.unwrap();
    assert_eq!(
        desktop.expect_envelope().await.unwrap(),
        Envelope::error("peer not connected")
    );

    // Rejoining under the same token is a fresh join
    let (mut web, presence) = join_room(addr, "leave", Role::Web)
        .await
        .expect("Rejoin failed");
    assert_eq!(
        presence,
        Presence {
            desktop: true,
            web: true
        }
    );
    expect_status(&mut desktop).await.unwrap();

    desktop.send_signal("signal-2").await.unwrap();
    assert_eq!(
        web.expect_envelope().await.unwrap(),
        Envelope::signal("signal-2")
    );
}

#[tokio::test]
async fn test_dropped_socket_counts_as_leave() {
    init_tracing();

    let (addr, _service) = spawn_test_relay(RelayConfig::default()).await;
    let (desktop, mut web) = pair(addr, "drop").await.expect("Pairing failed");

    // No close handshake, the TCP stream just goes away
    drop(desktop);

    assert_eq!(
        expect_status(&mut web).await.unwrap(),
        Presence {
            desktop: false,
            web: true
        }
    );
}
