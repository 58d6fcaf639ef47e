use crate::error::ClientError;
use clicker_core::{Command, Envelope, Presence, Role, Token};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tracing::{debug, info, warn};
use url::Url;

/// Состояние подключения клиента к relay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    /// Socket is open, waiting for the relay to confirm the room slot
    Connecting,
    /// Relay sent `connected`
    Connected,
}

/// Everything the relay tells a client, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    Connected { role: Role, token: Token },
    Status(Presence),
    Signal(String),
    RelayError(String),
    Pong,
    /// Last event on the stream. `code` is absent when the socket dropped without a close frame.
    Closed { code: Option<u16>, reason: String },
}

/// Join URL for `base`, e.g. `ws://host:3000/ws?token=abc&role=web`.
pub fn relay_url(base: &str, token: &Token, role: Role) -> Result<Url, ClientError> {
    let mut url = Url::parse(base)?;
    url.query_pairs_mut()
        .append_pair("token", token.as_str())
        .append_pair("role", role.as_str());
    Ok(url)
}

/// One relay connection for either endpoint. Outgoing frames go through a queue drained by a
/// writer task; incoming envelopes are surfaced as [`ClientEvent`]s.
pub struct RelayClient {
    role: Role,
    token: Token,
    outbound: mpsc::UnboundedSender<Message>,
    state: Arc<watch::Sender<ConnectionState>>,
    closing: Arc<AtomicBool>,
    reader: JoinHandle<()>,
}

impl RelayClient {
    pub async fn connect(
        base_url: &str,
        token: Token,
        role: Role,
    ) -> Result<(Self, mpsc::UnboundedReceiver<ClientEvent>), ClientError> {
        let url = relay_url(base_url, &token, role)?;
        info!("Connecting to relay {} as {}", url, role);

        let (ws, _response) = connect_async(url.as_str()).await.map_err(|e| {
            warn!("Failed to connect to {}: {}", url, e);
            ClientError::from(e)
        })?;
        let (mut sink, mut stream) = ws.split();

        let state = Arc::new(watch::Sender::new(ConnectionState::Connecting));
        let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<Message>();
        let (events, events_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Some(message) = outbound_rx.recv().await {
                let is_close = matches!(message, Message::Close(_));
                if let Err(e) = sink.send(message).await {
                    debug!("Relay write failed: {}", e);
                    break;
                }
                if is_close {
                    break;
                }
            }
        });

        let reader = tokio::spawn({
            let state = state.clone();
            async move {
                let (code, reason) = loop {
                    match stream.next().await {
                        Some(Ok(Message::Text(text))) => {
                            if let Some(event) = interpret(&text, &state) {
                                let _ = events.send(event);
                            }
                        }
                        Some(Ok(Message::Binary(_))) => warn!("Ignoring binary frame from relay"),
                        Some(Ok(Message::Close(frame))) => {
                            break frame
                                .map(|f| (Some(u16::from(f.code)), f.reason.to_string()))
                                .unwrap_or((None, String::new()));
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            warn!("Relay connection failed: {}", e);
                            break (None, e.to_string());
                        }
                        None => break (None, String::new()),
                    }
                };

                state.send_replace(ConnectionState::Disconnected);
                match code {
                    Some(code) => info!("Relay closed connection: {} '{}'", code, reason),
                    None => info!("Relay connection ended"),
                }
                let _ = events.send(ClientEvent::Closed { code, reason });
            }
        });

        let client = Self {
            role,
            token,
            outbound,
            state,
            closing: Arc::new(AtomicBool::new(false)),
            reader,
        };
        Ok((client, events_rx))
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    pub fn is_connected(&self) -> bool {
        !self.closing.load(Ordering::Acquire) && self.state() == ConnectionState::Connected
    }

    /// Resolves once the relay confirmed the slot, or fails if the connection ends first.
    pub async fn wait_connected(&self) -> Result<(), ClientError> {
        let mut state = self.state.subscribe();
        let reached = state
            .wait_for(|s| *s != ConnectionState::Connecting)
            .await
            .map(|s| *s)
            .unwrap_or(ConnectionState::Disconnected);

        match reached {
            ConnectionState::Connected => Ok(()),
            _ => Err(ClientError::Closed),
        }
    }

    pub fn send_signal(&self, name: &str) -> Result<(), ClientError> {
        self.send(&Envelope::signal(name))
    }

    pub fn send_command(&self, command: Command) -> Result<(), ClientError> {
        self.send_signal(command.signal_name())
    }

    pub fn ping(&self) -> Result<(), ClientError> {
        self.send(&Envelope::Ping)
    }

    fn send(&self, envelope: &Envelope) -> Result<(), ClientError> {
        if self.closing.load(Ordering::Acquire) {
            return Err(ClientError::Closed);
        }
        let json = envelope.to_json()?;
        self.outbound
            .send(Message::text(json))
            .map_err(|_| ClientError::Closed)
    }

    /// Sends every command from `commands` until the receiver or this connection is done.
    pub fn forward(&self, mut commands: mpsc::UnboundedReceiver<Command>) -> JoinHandle<()> {
        let outbound = self.outbound.clone();
        let closing = self.closing.clone();

        tokio::spawn(async move {
            while let Some(command) = commands.recv().await {
                if closing.load(Ordering::Acquire) {
                    break;
                }
                let json = match Envelope::signal(command.signal_name()).to_json() {
                    Ok(json) => json,
                    Err(e) => {
                        warn!("Failed to encode {}: {}", command, e);
                        continue;
                    }
                };
                info!("Sending {}", command);
                if outbound.send(Message::text(json)).is_err() {
                    break;
                }
            }
        })
    }

    /// Closes with 1000. Returns `true` only for the first call.
    pub fn disconnect(&self) -> bool {
        if self.closing.swap(true, Ordering::AcqRel) {
            return false;
        }
        info!("Disconnecting from relay");

        let frame = CloseFrame {
            code: CloseCode::Normal,
            reason: "".into(),
        };
        if self.outbound.send(Message::Close(Some(frame))).is_err() {
            debug!("Relay writer already gone");
        }
        self.state.send_replace(ConnectionState::Disconnected);
        true
    }
}

impl Drop for RelayClient {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

fn interpret(text: &str, state: &watch::Sender<ConnectionState>) -> Option<ClientEvent> {
    let envelope = match Envelope::parse(text) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!("Relay sent an unreadable message: {}", e);
            return None;
        }
    };

    match envelope {
        Envelope::Connected { role, token } => {
            info!("Joined room '{}' as {}", token, role);
            state.send_replace(ConnectionState::Connected);
            Some(ClientEvent::Connected { role, token })
        }
        Envelope::Status(presence) => {
            info!(
                "Room status: desktop={} web={}",
                presence.desktop, presence.web
            );
            Some(ClientEvent::Status(presence))
        }
        Envelope::Signal { name } => {
            info!("Received {}", name);
            Some(ClientEvent::Signal(name))
        }
        Envelope::Error { message } => {
            warn!("Relay error: {}", message);
            Some(ClientEvent::RelayError(message))
        }
        Envelope::Pong => Some(ClientEvent::Pong),
        Envelope::Ping => {
            debug!("Ignoring ping from relay");
            None
        }
    }
}
