use clicker_core::{Presence, Role, Token};
use clicker_server::{CLOSE_NORMAL, RelayConfig};

use crate::integration::{init_tracing, spawn_test_relay};
use crate::utils::{expect_status, join_room, pair};

#[tokio::test]
async fn test_client_close_is_answered() {
    init_tracing();

    let (addr, service) = spawn_test_relay(RelayConfig::default()).await;
    let (client, _presence) = join_room(addr, "polite", Role::Web)
        .await
        .expect("Failed to join");

    let code = client.close_and_wait().await.expect("No close reply");
    assert_eq!(code, CLOSE_NORMAL);

    let presence = service.registry().get(&Token::new("polite").unwrap());
    assert_eq!(presence, Some(Presence::default()));
}

#[tokio::test]
async fn test_close_reply_with_peer_present() {
    init_tracing();

    let (addr, _service) = spawn_test_relay(RelayConfig::default()).await;
    let (mut desktop, web) = pair(addr, "polite-pair").await.expect("Failed to pair");

    assert_eq!(web.close_and_wait().await.expect("No close reply"), CLOSE_NORMAL);

    let presence = expect_status(&mut desktop).await.expect("No status after leave");
    assert_eq!(
        presence,
        Presence {
            desktop: true,
            web: false
        }
    );
}
