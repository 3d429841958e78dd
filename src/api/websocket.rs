//! Live channel: notifications and announcements over WebSocket.
//!
//! One connection per client; the server pushes every [`LiveEvent`] to
//! every client (no per-topic filtering). The only inbound message that
//! does anything is `announce`, which is relayed to all clients as an
//! `announcement` event.

use crate::notify::Notifier;
use crate::state::AppState;
use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Messages clients may send.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WsInbound {
    /// Broadcast a message to every connected client.
    Announce {
        /// Announcement text.
        message: String,
    },
    /// Keep-alive.
    Ping,
}

/// `GET /ws` — upgrade to the live channel.
pub async fn upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    info!("websocket connection requested");
    ws.on_upgrade(move |socket| handle_socket(socket, state.notifier.clone()))
}

/// Connection lifecycle: one task streams broadcasts out, one task drains
/// inbound messages; whichever stops first tears the other down.
async fn handle_socket(socket: WebSocket, notifier: Notifier) {
    info!("websocket connection established");

    let (mut sender, mut receiver) = socket.split();
    let mut events = notifier.subscribe();

    let mut send_task = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            let message = match serde_json::to_string(&event) {
                Ok(json) => Message::Text(json),
                Err(err) => {
                    warn!(error = %err, "failed to serialize live event");
                    continue;
                }
            };
            if sender.send(message).await.is_err() {
                // Client disconnected.
                break;
            }
        }
        debug!("websocket send task terminated");
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(message)) = receiver.next().await {
            match message {
                Message::Text(text) => match serde_json::from_str::<WsInbound>(&text) {
                    Ok(WsInbound::Announce { message }) => {
                        debug!("relaying announcement");
                        notifier.announce(message);
                    }
                    Ok(WsInbound::Ping) => debug!("client ping"),
                    Err(err) => warn!(error = %err, "unparseable websocket message"),
                },
                Message::Close(_) => {
                    info!("client requested close");
                    break;
                }
                // Axum answers pings itself.
                _ => {}
            }
        }
        debug!("websocket receive task terminated");
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    }

    info!("websocket connection closed");
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn inbound_announce_parses() {
        let parsed: WsInbound =
            serde_json::from_str(r#"{"type":"announce","message":"Lunch is served"}"#).unwrap();
        assert!(matches!(parsed, WsInbound::Announce { message } if message == "Lunch is served"));
    }

    #[test]
    fn inbound_ping_parses() {
        let parsed: WsInbound = serde_json::from_str(r#"{"type":"ping"}"#).unwrap();
        assert!(matches!(parsed, WsInbound::Ping));
    }

    #[test]
    fn unknown_inbound_is_rejected() {
        assert!(serde_json::from_str::<WsInbound>(r#"{"type":"subscribe"}"#).is_err());
    }
}
