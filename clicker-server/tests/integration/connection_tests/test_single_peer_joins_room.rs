use clicker_core::{Presence, Role, Token};
use clicker_server::RelayConfig;

use crate::integration::{init_tracing, spawn_test_relay};
use crate::utils::join_room;

#[tokio::test]
async fn test_single_peer_joins_room() {
    init_tracing();

    let (addr, service) = spawn_test_relay(RelayConfig::default()).await;

    let (client, presence) = join_room(addr, "solo", Role::Desktop)
        .await
        .expect("Failed to join");

    // The joiner is told about itself even though nobody else is there
    assert_eq!(
        presence,
        Presence {
            desktop: true,
            web: false
        }
    );
    assert_eq!(
        service.registry().get(&Token::new("solo").unwrap()),
        Some(presence)
    );

    client.close().await.expect("Failed to close client");
}
