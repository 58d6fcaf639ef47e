use clicker_core::Envelope;
use clicker_server::RelayConfig;

use crate::integration::{init_tracing, spawn_test_relay};
use crate::utils::{SILENCE_MS, pair};

#[tokio::test]
async fn test_unknown_signal_rejected() {
    init_tracing();

    let (addr, _service) = spawn_test_relay(RelayConfig::default()).await;
    let (mut desktop, mut web) = pair(addr, "deck").await.expect("Pairing failed");

    web.send_signal("bogus").await.unwrap();

    assert_eq!(
        web.expect_envelope().await.unwrap(),
        Envelope::error("unknown signal 'bogus'")
    );
    assert!(desktop.is_silent_for(SILENCE_MS).await);

    // The connection survives a protocol error
    web.send_signal("signal-1").await.unwrap();
    assert_eq!(
        desktop.expect_envelope().await.unwrap(),
        Envelope::signal("signal-1")
    );
}

#[tokio::test]
async fn test_malformed_json_rejected() {
    init_tracing();

    let (addr, _service) = spawn_test_relay(RelayConfig::default()).await;
    let (mut desktop, mut web) = pair(addr, "deck").await.expect("Pairing failed");

    web.send_text("{\"type\":\"signal\"").await.unwrap();

    assert!(matches!(
        web.expect_envelope().await.unwrap(),
        Envelope::Error { .. }
    ));
    assert!(desktop.is_silent_for(SILENCE_MS).await);
}
