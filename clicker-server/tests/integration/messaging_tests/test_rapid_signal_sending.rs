use clicker_core::Envelope;
use clicker_server::RelayConfig;

use crate::integration::{init_tracing, spawn_test_relay};
use crate::utils::pair;

const SIGNAL_COUNT: usize = 50;

#[tokio::test]
async fn test_rapid_signal_sending_preserves_order() {
    init_tracing();

    let (addr, _service) = spawn_test_relay(RelayConfig::default()).await;
    let (mut desktop, mut web) = pair(addr, "burst").await.expect("Pairing failed");

    let names: Vec<&str> = (0..SIGNAL_COUNT)
        .map(|i| if i % 3 == 0 { "signal-2" } else { "signal-1" })
        .collect();

    for name in &names {
        web.send_signal(name).await.unwrap();
    }

    for name in &names {
        assert_eq!(
            desktop.expect_envelope().await.unwrap(),
            Envelope::signal(*name)
        );
    }
}
