// SPDX-FileCopyrightText: 2026 Hotline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WebSocket transport for live chat connections.
//!
//! Client -> Server (JSON):
//! ```json
//! {"content": "hello", "username": "visitor", "chat_id": 7}
//! ```
//! `chat_id` and `username` are optional; the chat defaults to the one the
//! connection was opened for, and a frame naming a different chat is dropped.
//!
//! Server -> Client (JSON): a full chat message record, or
//! `{"error": "..."}` when the sender's last message could not be stored.

use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use hotline_core::{ChatId, Claims, HotlineError, Role};

use crate::handlers::ApiError;
use crate::registry::Outbound;
use crate::relay::ChatEvent;
use crate::server::GatewayState;

/// Capacity of a connection's outbound queue. When it fills, relay
/// deliveries to this connection fall back to stored-only.
const OUTBOUND_QUEUE_CAPACITY: usize = 64;

/// Query parameters for the upgrade handshake. Browsers cannot set headers
/// on WebSocket requests, so the credential rides in the query string.
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub token: String,
    pub chat_id: ChatId,
}

/// A chat frame sent by the client.
#[derive(Debug, Deserialize)]
struct InboundFrame {
    #[serde(default)]
    chat_id: ChatId,
    content: String,
    #[serde(default)]
    username: String,
}

/// GET /ws?token=<jwt>&chat_id=<id>
///
/// Authorizes the caller and upgrades to a live duplex connection. The
/// connection's role comes from the verified claims; users may only attach
/// to chats they own.
pub async fn ws_handler(
    State(state): State<GatewayState>,
    Query(query): Query<WsQuery>,
    ws: WebSocketUpgrade,
) -> Response {
    let claims = match state.auth.authorize(Some(&query.token), None) {
        Ok(claims) => claims,
        Err(e) => {
            warn!(chat_id = query.chat_id, error = %e, "ws: rejected upgrade");
            return ApiError(e).into_response();
        }
    };

    let chat = match state.store.get_chat(query.chat_id).await {
        Ok(Some(chat)) => chat,
        Ok(None) => {
            return ApiError(HotlineError::NotFound(format!("chat {}", query.chat_id)))
                .into_response();
        }
        Err(e) => return ApiError(e).into_response(),
    };
    if claims.role == Role::User && chat.user_id != claims.user_id {
        // Foreign chats read as absent; do not confirm their existence.
        return ApiError(HotlineError::NotFound(format!("chat {}", query.chat_id)))
            .into_response();
    }

    info!(chat_id = chat.id, user_id = claims.user_id, role = %claims.role, "ws: connection authorized");
    ws.on_upgrade(move |socket| run_connection(socket, state, chat.id, claims))
}

/// Drive one live connection until it ends.
///
/// Splits the socket: a writer task forwards frames queued by the relay and
/// registry, while this task reads inbound frames into the relay's ingestion
/// queue. Every exit path deregisters the connection and releases the socket.
async fn run_connection(socket: WebSocket, state: GatewayState, chat_id: ChatId, claims: Claims) {
    let (ws_sender, mut ws_receiver) = socket.split();
    let (tx, rx) = mpsc::channel::<Outbound>(OUTBOUND_QUEUE_CAPACITY);

    let registration = state.registry.register(chat_id, claims.role, tx).await;
    let writer = tokio::spawn(writer_task(ws_sender, rx));
    metrics::counter!("hotline_ws_connections_total").increment(1);

    while let Some(received) = ws_receiver.next().await {
        match received {
            Ok(Message::Text(text)) => {
                let frame: InboundFrame = match serde_json::from_str(&text) {
                    Ok(frame) => frame,
                    Err(e) => {
                        warn!(chat_id, error = %e, "ws: ignoring unparseable frame");
                        continue;
                    }
                };
                if frame.chat_id != 0 && frame.chat_id != chat_id {
                    warn!(
                        chat_id,
                        frame_chat_id = frame.chat_id,
                        "ws: dropping frame addressed to another chat"
                    );
                    continue;
                }

                let event = ChatEvent {
                    chat_id,
                    sender: claims.role,
                    user_id: claims.user_id,
                    username: frame.username,
                    content: frame.content,
                };
                // Blocks when the ingestion queue is full, pushing
                // backpressure onto this socket only.
                if state.relay_tx.send(event).await.is_err() {
                    warn!(chat_id, "ws: relay queue closed, dropping connection");
                    break;
                }
            }
            Ok(Message::Close(frame)) => {
                info!(chat_id, user_id = claims.user_id, reason = ?frame, "ws: client closed");
                break;
            }
            // Ping/pong are answered by the protocol layer.
            Ok(_) => {}
            Err(e) => {
                warn!(chat_id, user_id = claims.user_id, error = %e, "ws: receive error");
                break;
            }
        }
    }

    writer.abort();
    state.registry.remove(chat_id, claims.role, registration).await;
    debug!(chat_id, user_id = claims.user_id, "ws: connection torn down");
}

/// Forward queued frames to the socket. A shutdown frame closes the socket
/// and ends the task, which in turn ends the reader loop above.
async fn writer_task(
    mut ws_sender: futures::stream::SplitSink<WebSocket, Message>,
    mut rx: mpsc::Receiver<Outbound>,
) {
    while let Some(frame) = rx.recv().await {
        let result = match frame {
            Outbound::Message(msg) => match serde_json::to_string(&msg) {
                Ok(json) => ws_sender.send(Message::Text(json.into())).await,
                Err(e) => {
                    warn!(error = %e, "ws: failed to encode outbound message");
                    continue;
                }
            },
            Outbound::Error { reason } => {
                let body = serde_json::json!({ "error": reason }).to_string();
                ws_sender.send(Message::Text(body.into())).await
            }
            Outbound::Shutdown { reason } => {
                let _ = ws_sender
                    .send(Message::Close(Some(CloseFrame {
                        code: 1000,
                        reason: reason.into(),
                    })))
                    .await;
                break;
            }
        };
        if result.is_err() {
            // Socket is gone; the reader loop will observe it too.
            break;
        }
    }
}
