//! Push-mode subscription over WebSocket.
//!
//! A client connects, sends `{"token": "..."}` to bind (a later message
//! rebinds the session), and receives status JSON immediately and on every
//! worker cycle boundary. Closing the socket unbinds the session and
//! cancels the token's pending job and cached result, but never an
//! in-flight generation.

use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::State,
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::metrics;
use crate::state::AppState;
use crate::types::SubscribeRequest;

/// Subscribe for push status updates
///
/// GET /ws
pub async fn subscribe(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let session = Uuid::new_v4();
    debug!(%session, "WebSocket session opened");

    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    // Forward hub updates to the socket. Fire-and-forget: a send failure
    // means the client is gone and the read loop below will end too.
    let forwarder = tokio::spawn(async move {
        while let Some(status) = rx.recv().await {
            let Ok(text) = serde_json::to_string(&status) else {
                continue;
            };
            if sink.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(message)) = stream.next().await {
        match message {
            Message::Text(text) => match serde_json::from_str::<SubscribeRequest>(&text) {
                Ok(request) => {
                    state.hub.subscribe(session, request.token, tx.clone()).await;
                    metrics::set_active_subscribers(state.hub.subscriber_count().await);
                }
                Err(e) => {
                    warn!(%session, error = %e, "Ignoring malformed subscribe message");
                }
            },
            Message::Close(_) => break,
            _ => {}
        }
    }

    if let Some(token) = state.hub.disconnect(session).await {
        debug!(%session, token = %token, "WebSocket session closed");
    }
    metrics::set_active_subscribers(state.hub.subscriber_count().await);
    forwarder.abort();
}
