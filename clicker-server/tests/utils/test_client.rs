use anyhow::{Context, Result, bail};
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use clicker_core::Envelope;

use super::signal_helpers::SIGNAL_TIMEOUT_MS;

/// What a test client observed on its socket.
#[derive(Debug, Clone, PartialEq)]
pub enum Received {
    Envelope(Envelope),
    Closed { code: u16, reason: String },
}

/// Plain WebSocket client speaking the relay's JSON protocol.
pub struct TestClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    /// Connect with raw query parameters, e.g. `token=abc&role=web`.
    pub async fn connect_query(addr: SocketAddr, query: &str) -> Result<Self> {
        let url = format!("ws://{}/ws?{}", addr, query);
        let (ws, _response) = connect_async(url.as_str())
            .await
            .with_context(|| format!("Failed to connect to {}", url))?;
        tracing::debug!("[TestClient] Connected to {}", url);
        Ok(Self { ws })
    }

    pub async fn connect(addr: SocketAddr, token: &str, role: &str) -> Result<Self> {
        Self::connect_query(addr, &format!("token={}&role={}", token, role)).await
    }

    pub async fn send_text(&mut self, text: &str) -> Result<()> {
        self.ws
            .send(Message::text(text))
            .await
            .context("Failed to send text frame")
    }

    pub async fn send(&mut self, envelope: &Envelope) -> Result<()> {
        let json = envelope.to_json()?;
        self.send_text(&json).await
    }

    pub async fn send_signal(&mut self, name: &str) -> Result<()> {
        self.send(&Envelope::signal(name)).await
    }

    /// Next envelope or close frame, skipping transport-level ping/pong.
    pub async fn recv(&mut self, timeout_ms: u64) -> Result<Received> {
        let deadline = Duration::from_millis(timeout_ms);
        loop {
            let next = tokio::time::timeout(deadline, self.ws.next())
                .await
                .context("Timeout waiting for relay message")?;

            match next {
                Some(Ok(Message::Text(text))) => {
                    let envelope = Envelope::parse(&text)
                        .with_context(|| format!("Relay sent invalid envelope: {}", text))?;
                    tracing::debug!("[TestClient] Received {:?}", envelope);
                    return Ok(Received::Envelope(envelope));
                }
                Some(Ok(Message::Close(frame))) => {
                    let (code, reason) = frame
                        .map(|f| (u16::from(f.code), f.reason.to_string()))
                        .unwrap_or((1005, String::new()));
                    return Ok(Received::Closed { code, reason });
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => bail!("WebSocket error: {}", e),
                None => bail!("WebSocket stream ended"),
            }
        }
    }

    pub async fn expect_envelope(&mut self) -> Result<Envelope> {
        match self.recv(SIGNAL_TIMEOUT_MS).await? {
            Received::Envelope(envelope) => Ok(envelope),
            Received::Closed { code, reason } => {
                bail!("Expected envelope, got close {} '{}'", code, reason)
            }
        }
    }

    /// Reads until a close frame arrives, ignoring envelopes on the way.
    pub async fn expect_close(&mut self) -> Result<(u16, String)> {
        loop {
            if let Received::Closed { code, reason } = self.recv(SIGNAL_TIMEOUT_MS).await? {
                return Ok((code, reason));
            }
        }
    }

    /// True if nothing arrives within `ms`.
    pub async fn is_silent_for(&mut self, ms: u64) -> bool {
        self.recv(ms).await.is_err()
    }

    /// Starts a normal close and returns the code of the relay's reply.
    pub async fn close_and_wait(mut self) -> Result<u16> {
        let frame = CloseFrame {
            code: CloseCode::Normal,
            reason: "".into(),
        };
        self.ws
            .close(Some(frame))
            .await
            .context("Failed to send close")?;

        match self.recv(SIGNAL_TIMEOUT_MS).await? {
            Received::Closed { code, .. } => Ok(code),
            Received::Envelope(envelope) => bail!("Expected close reply, got {:?}", envelope),
        }
    }

    pub async fn close(mut self) -> Result<()> {
        self.ws.close(None).await.context("Failed to close client")
    }
}
