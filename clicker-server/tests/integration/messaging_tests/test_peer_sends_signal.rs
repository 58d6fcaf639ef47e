use clicker_core::Envelope;
use clicker_server::RelayConfig;

use crate::integration::{init_tracing, spawn_test_relay};
use crate::utils::{SILENCE_MS, pair};

#[tokio::test]
async fn test_controller_signal_reaches_receiver() {
    init_tracing();

    let (addr, _service) = spawn_test_relay(RelayConfig::default()).await;
    let (mut desktop, mut web) = pair(addr, "deck").await.expect("Pairing failed");

    web.send_signal("signal-1").await.unwrap();

    assert_eq!(
        desktop.expect_envelope().await.unwrap(),
        Envelope::signal("signal-1")
    );
    // No echo back to the sender
    assert!(web.is_silent_for(SILENCE_MS).await);
}

#[tokio::test]
async fn test_receiver_signal_reaches_controller() {
    init_tracing();

    let (addr, _service) = spawn_test_relay(RelayConfig::default()).await;
    let (mut desktop, mut web) = pair(addr, "deck").await.expect("Pairing failed");

    desktop.send_signal("signal-2").await.unwrap();

    assert_eq!(
        web.expect_envelope().await.unwrap(),
        Envelope::signal("signal-2")
    );
}
