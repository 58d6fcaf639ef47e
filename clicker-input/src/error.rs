use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to reach relay: {0}")]
    Connect(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("invalid relay url: {0}")]
    Url(#[from] url::ParseError),

    #[error("connection to relay is closed")]
    Closed,

    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
}
