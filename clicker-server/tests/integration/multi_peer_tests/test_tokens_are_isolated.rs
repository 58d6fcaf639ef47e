use clicker_core::Envelope;
use clicker_server::RelayConfig;

use crate::integration::{init_tracing, spawn_test_relay};
use crate::utils::{SILENCE_MS, pair};

#[tokio::test]
async fn test_tokens_are_isolated() {
    init_tracing();

    let (addr, service) = spawn_test_relay(RelayConfig::default()).await;
    let (mut desktop_a, mut web_a) = pair(addr, "room-a").await.expect("Pairing A failed");
    let (mut desktop_b, _web_b) = pair(addr, "room-b").await.expect("Pairing B failed");

    web_a.send_signal("signal-1").await.unwrap();

    assert_eq!(
        desktop_a.expect_envelope().await.unwrap(),
        Envelope::signal("signal-1")
    );
    assert!(desktop_b.is_silent_for(SILENCE_MS).await);
    assert_eq!(service.registry().len(), 2);
}
