//! WebSocket connection handler

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tracing::{debug, warn};

use super::connection::WsConnection;
use super::state::AppState;
use crate::protocol::{ClientMessage, PongMessage};

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an individual subscriber for the lifetime of its socket
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let mut shutdown = state.shutdown_receiver();
    if *shutdown.borrow() {
        return;
    }

    let id = state.next_connection_id();
    let (connection, mut outbound) = WsConnection::channel(id, state.outbound_buffer);
    let (mut sink, mut stream) = socket.split();

    state.lifecycle.on_open(Arc::new(connection));

    loop {
        tokio::select! {
            // Snapshots queued by the producer
            Some(payload) = outbound.recv() => {
                if sink.send(Message::Text(payload.to_string())).await.is_err() {
                    break; // Client disconnected
                }
            }

            // Client messages
            result = stream.next() => {
                let reply = match result {
                    Some(Ok(msg)) => match client_reply(msg) {
                        Reply::None => continue,
                        Reply::Send(msg) => msg,
                        Reply::Close => break,
                    },
                    Some(Err(e)) => {
                        debug!(conn_id = %id, error = %e, "websocket error");
                        break;
                    }
                    None => break,
                };
                if sink.send(reply).await.is_err() {
                    break;
                }
            }

            // Server shutdown
            _ = shutdown.changed() => {
                let _ = sink.send(Message::Close(None)).await;
                break;
            }
        }
    }

    state.lifecycle.on_close(id);
}

/// What to do in response to a client frame
enum Reply {
    None,
    Send(Message),
    Close,
}

fn client_reply(msg: Message) -> Reply {
    match msg {
        Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
            Ok(ClientMessage::Ping) => match serde_json::to_string(&PongMessage::default()) {
                Ok(json) => Reply::Send(Message::Text(json)),
                Err(e) => {
                    warn!(error = %e, "failed to encode pong");
                    Reply::None
                }
            },
            Err(_) => Reply::None, // Subscribers have nothing else to say
        },
        Message::Binary(_) => Reply::None,
        Message::Ping(data) => Reply::Send(Message::Pong(data)),
        Message::Pong(_) => Reply::None,
        Message::Close(_) => Reply::Close,
    }
}
