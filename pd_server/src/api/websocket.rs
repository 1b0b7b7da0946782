//! WebSocket handler binding sockets to the lobby.
//!
//! # Connection Flow
//!
//! 1. Client connects via `GET /ws`
//! 2. Server assigns a connection id and registers an outbound channel with
//!    the lobby, which answers with `{"type":"welcome","playerId":...}`
//! 3. A send task forwards lobby events to the socket in order
//! 4. The receive loop parses frames and dispatches them to the lobby
//! 5. On close or error the lobby is told the connection is gone
//!
//! # Example
//!
//! ```javascript
//! const ws = new WebSocket('ws://localhost:3001/ws');
//! let me;
//!
//! ws.onmessage = (event) => {
//!   const msg = JSON.parse(event.data);
//!   if (msg.type === 'welcome') me = msg.playerId;
//!   if (msg.type === 'room-created') console.log('share code', msg.roomId);
//! };
//!
//! ws.send(JSON.stringify({ type: 'create-room' }));
//! ws.send(JSON.stringify({ type: 'player-choice', roomId: 'AB12CD', playerId: me, choice: 'C' }));
//! ```

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use log::{debug, error};
use prisoners_dilemma::{ClientEvent, ConnectionId, ServerEvent};
use tokio::sync::mpsc;

use super::{AppState, rate_limiter::RateLimiter};
use crate::{logging::log_connection_event, metrics};

/// Upgrade HTTP connection to WebSocket.
pub async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an established WebSocket connection until it closes.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let connection_id = ConnectionId::new();
    let (mut sender, mut receiver) = socket.split();

    let (event_tx, mut event_rx) =
        mpsc::channel::<ServerEvent>(state.websocket.client_channel_capacity);

    if let Err(e) = state.lobby.connect(connection_id, event_tx).await {
        error!("Failed to register connection {}: {}", connection_id, e);
        return;
    }

    metrics::websocket_connection_opened();
    log_connection_event("connected", &connection_id, "WebSocket opened");

    // Forward lobby events to the socket; ends when the lobby drops our sender
    let send_task = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            let json = match event.to_json() {
                Ok(j) => j,
                Err(e) => {
                    error!("Failed to serialize event: {}", e);
                    continue;
                }
            };

            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    let mut burst_limiter = RateLimiter::burst(&state.websocket);
    let mut sustained_limiter = RateLimiter::sustained(&state.websocket);

    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                if !burst_limiter.check() {
                    metrics::websocket_message_received("rate_limited");
                    log_connection_event(
                        "rate_limited",
                        &connection_id,
                        "Burst rate limit exceeded, dropping frame",
                    );
                    continue;
                }

                if !sustained_limiter.check() {
                    metrics::websocket_message_received("rate_limited");
                    log_connection_event(
                        "rate_limited",
                        &connection_id,
                        "Sustained rate limit exceeded, dropping frame",
                    );
                    continue;
                }

                debug!("Received frame from {}: {}", connection_id, text.as_str());

                let event = match ClientEvent::from_json(text.as_str()) {
                    Ok(event) => event,
                    Err(e) => {
                        metrics::websocket_message_received("invalid");
                        log_connection_event(
                            "invalid_frame",
                            &connection_id,
                            &format!("Ignoring malformed frame: {}", e),
                        );
                        continue;
                    }
                };

                metrics::websocket_message_received("accepted");
                if state.lobby.dispatch(connection_id, event).await.is_err() {
                    error!("Lobby closed while serving {}", connection_id);
                    break;
                }
            }
            Ok(Message::Close(_)) => break,
            Err(e) => {
                debug!("WebSocket error on {}: {}", connection_id, e);
                break;
            }
            _ => {}
        }
    }

    if let Err(e) = state.lobby.disconnect(connection_id).await {
        error!("Failed to unregister connection {}: {}", connection_id, e);
    }
    send_task.abort();

    metrics::websocket_connection_closed();
    log_connection_event("disconnected", &connection_id, "WebSocket closed");
}
