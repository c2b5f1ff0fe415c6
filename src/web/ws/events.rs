//! Mail event WebSocket handler.
//!
//! Every connected client receives each `emailReceived` event published
//! after it connected, as a JSON text frame.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};

use crate::notify::MailEvent;
use crate::web::handlers::AppState;

/// GET /ws - Subscribe to mail events.
pub async fn events_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    let events = state.hub.subscribe();
    ws.on_upgrade(move |socket| handle_socket(socket, events))
}

/// Forward hub events to one WebSocket until either side closes.
async fn handle_socket(socket: WebSocket, mut events: broadcast::Receiver<MailEvent>) {
    let session_id = uuid::Uuid::new_v4();
    tracing::debug!("Event stream opened: {}", session_id);

    let (mut ws_sender, mut ws_receiver) = socket.split();

    loop {
        tokio::select! {
            incoming = ws_receiver.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::debug!("Event stream closed by client: {}", session_id);
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if ws_sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!("WebSocket error: {}", e);
                        break;
                    }
                }
            }

            event = events.recv() => {
                match event {
                    Ok(event) => {
                        let json = match serde_json::to_string(&event) {
                            Ok(json) => json,
                            Err(e) => {
                                tracing::error!("Failed to encode mail event: {}", e);
                                continue;
                            }
                        };
                        if ws_sender.send(Message::Text(json)).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!("Event stream {} lagged, skipped {} events", session_id, skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("Event stream ended: {}", session_id);
}
