use clicker_core::Envelope;
use clicker_server::{CLOSE_BAD_REQUEST, RelayConfig};

use crate::integration::{init_tracing, spawn_test_relay};
use crate::utils::TestClient;

/// Returns the `error` message the relay sent before closing with 4000.
async fn rejection_message(query: &str) -> String {
    let (addr, service) = spawn_test_relay(RelayConfig::default()).await;

    let mut client = TestClient::connect_query(addr, query)
        .await
        .expect("Upgrade should succeed");

    let envelope = client.expect_envelope().await.expect("No error envelope");
    let Envelope::Error { message } = envelope else {
        panic!("Expected error envelope, got {:?}", envelope);
    };

    let (code, _reason) = client.expect_close().await.expect("No close frame");
    assert_eq!(code, CLOSE_BAD_REQUEST);

    assert!(service.registry().is_empty(), "No room may be touched");
    message
}

async fn assert_rejected(query: &str, message: &str) {
    assert_eq!(rejection_message(query).await, message);
}

#[tokio::test]
async fn test_missing_token_is_rejected() {
    init_tracing();
    assert_rejected("role=web", "missing or empty token").await;
}

#[tokio::test]
async fn test_empty_token_is_rejected() {
    init_tracing();
    assert_rejected("token=&role=web", "missing or empty token").await;
}

#[tokio::test]
async fn test_missing_role_is_rejected() {
    init_tracing();
    assert_rejected("token=abc", "missing role").await;
}

#[tokio::test]
async fn test_unknown_role_is_rejected() {
    init_tracing();
    assert_rejected(
        "token=abc&role=tv",
        "invalid role 'tv', expected 'desktop' or 'web'",
    )
    .await;
}

#[tokio::test]
async fn test_duplicate_token_is_rejected() {
    init_tracing();
    let message = rejection_message("token=a&token=b&role=web").await;
    assert!(message.starts_with("invalid query"), "{}", message);
}

#[tokio::test]
async fn test_duplicate_role_is_rejected() {
    init_tracing();
    let message = rejection_message("token=a&role=web&role=desktop").await;
    assert!(message.starts_with("invalid query"), "{}", message);
}
