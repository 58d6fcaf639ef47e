use crate::error::RelayError;
use crate::transport::{CLOSE_NORMAL, Connection, Outbound, TransportEvent};
use crate::SignalingService;
use axum::extract::rejection::QueryRejection;
use axum::extract::ws::{CloseFrame, Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use clicker_core::{Envelope, Role, Token};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// How long the writer gets to flush the close reply once the client went away.
const CLOSE_FLUSH: Duration = Duration::from_secs(1);

/// Параметры подключения из строки запроса: `?token=...&role=desktop|web`.
#[derive(Debug, Default, Deserialize)]
pub struct JoinParams {
    pub token: Option<String>,
    pub role: Option<String>,
}

impl JoinParams {
    pub fn validate(self) -> Result<(Token, Role), RelayError> {
        let token = self
            .token
            .and_then(Token::new)
            .ok_or(RelayError::MissingToken)?;
        let role = self.role.ok_or(RelayError::MissingRole)?.parse::<Role>()?;
        Ok((token, role))
    }
}

/// Upgrades even when the query string does not parse, so every handshake failure is
/// answered in-band with `error` and a 4000 close.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    query: Result<Query<JoinParams>, QueryRejection>,
    State(service): State<SignalingService>,
) -> impl IntoResponse {
    let join = query
        .map_err(|e| RelayError::BadQuery(e.body_text()))
        .and_then(|Query(params)| params.validate());
    ws.on_upgrade(move |socket| handle_socket(socket, join, service))
}

async fn handle_socket(
    mut socket: WebSocket,
    join: Result<(Token, Role), RelayError>,
    service: SignalingService,
) {
    let (token, role) = match join {
        Ok(pair) => pair,
        Err(e) => {
            warn!("Rejected WebSocket handshake: {}", e);
            reject(&mut socket, e).await;
            return;
        }
    };

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let connection = Arc::new(Connection::new(role, token, tx.clone()));

    info!("New WebSocket connection: {} ({})", connection.id(), role);
    service.attach(connection.clone());

    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            match frame {
                Outbound::Text(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Outbound::Close { code, reason } => {
                    let close = CloseFrame {
                        code,
                        reason: reason.into(),
                    };
                    let _ = sender.send(Message::Close(Some(close))).await;
                    break;
                }
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let service = service.clone();
        let connection = connection.clone();

        async move {
            while let Some(msg) = receiver.next().await {
                let event = match msg {
                    Ok(Message::Text(text)) => TransportEvent::Text(text.as_str().to_owned()),
                    Ok(Message::Binary(_)) => TransportEvent::Binary,
                    Ok(Message::Close(_)) => TransportEvent::Closed,
                    Ok(_) => continue,
                    Err(e) => TransportEvent::Failed(e.to_string()),
                };
                let terminal = event.is_terminal();
                service.handle_event(&connection, event);
                if terminal {
                    break;
                }
            }
        }
    });

    let client_left = tokio::select! {
        _ = (&mut send_task) => {
            recv_task.abort();
            false
        }
        _ = (&mut recv_task) => true,
    };

    if client_left {
        // Answer the client's close before the writer goes away.
        let _ = tx.send(Outbound::Close {
            code: CLOSE_NORMAL,
            reason: String::new(),
        });
        if tokio::time::timeout(CLOSE_FLUSH, &mut send_task).await.is_err() {
            debug!("Close reply to {} not flushed in time", connection.id());
            send_task.abort();
        }
    }

    service.detach(&connection);
    info!("WebSocket disconnected: {}", connection.id());
}

async fn reject(socket: &mut WebSocket, error: RelayError) {
    let class = error.class();
    if class.is_reported() {
        if let Ok(json) = Envelope::error(error.to_string()).to_json() {
            let _ = socket.send(Message::Text(json.into())).await;
        }
    }
    if let Some(code) = class.close_code() {
        let close = CloseFrame {
            code,
            reason: "bad request".into(),
        };
        let _ = socket.send(Message::Close(Some(close))).await;
    }
}
