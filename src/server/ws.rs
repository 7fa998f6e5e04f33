//! WebSocket handler: one reader loop and one writer task per connection.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        ConnectInfo, State,
    },
    response::Response,
};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

use crate::dispatch::Dispatcher;
use crate::hub::{ConnectionId, Outbound, Registration};
use crate::server::state::AppState;

/// Why a connection's read loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
enum CloseReason {
    /// Close frame or end of stream.
    Remote,
    Error(String),
}

/// WebSocket upgrade handler.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, remote, state))
}

/// Handles an individual WebSocket connection from accept to close.
///
/// The connection is registered before the first read and unregistered
/// on every exit path.
async fn handle_socket(socket: WebSocket, remote: SocketAddr, state: Arc<AppState>) {
    let (sender, receiver) = socket.split();
    let (tx, rx) = mpsc::channel::<Outbound>(state.outbound_buffer);

    let registry = Arc::clone(state.registry());
    let Registration { id, name } = registry.register(remote.to_string(), tx).await;

    let mut writer = tokio::spawn(write_loop(sender, rx, state.send_timeout, id));

    // The writer ends on its own if the peer is evicted or a send fails.
    let writer_done = tokio::select! {
        reason = read_loop(receiver, &state.dispatcher, &name) => {
            match reason {
                CloseReason::Remote => tracing::debug!(conn_id = %id, "WebSocket closed by client"),
                CloseReason::Error(error) => tracing::warn!(conn_id = %id, %error, "WebSocket read failed"),
            }
            false
        }
        _ = &mut writer => {
            tracing::debug!(conn_id = %id, "WebSocket writer finished");
            true
        }
    };

    // Unregistering drops the outbox sender, so the writer flushes what is
    // queued, completes the close handshake and exits.
    registry.unregister(id).await;
    if !writer_done && timeout(state.send_timeout, &mut writer).await.is_err() {
        tracing::debug!(conn_id = %id, "WebSocket writer did not finish closing");
        writer.abort();
    }
}

/// Reads and dispatches messages in arrival order until the client goes away.
async fn read_loop(
    mut receiver: SplitStream<WebSocket>,
    dispatcher: &Dispatcher,
    name: &str,
) -> CloseReason {
    while let Some(frame) = receiver.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                let _ = dispatcher.dispatch(name, &text).await;
            }
            Ok(Message::Close(_)) => return CloseReason::Remote,
            // Pong is handled automatically by axum
            Ok(Message::Ping(_) | Message::Pong(_) | Message::Binary(_)) => {}
            Err(e) => return CloseReason::Error(e.to_string()),
        }
    }
    CloseReason::Remote
}

/// Drains the connection's outbox into the socket.
///
/// Each send is bounded by `send_timeout`; a failed or stalled send ends
/// the connection.
async fn write_loop(
    mut sink: SplitSink<WebSocket, Message>,
    mut outbox: mpsc::Receiver<Outbound>,
    send_timeout: Duration,
    id: ConnectionId,
) {
    while let Some(message) = outbox.recv().await {
        match timeout(send_timeout, sink.send(Message::Text(message.to_string()))).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::warn!(conn_id = %id, error = %e, "Failed to send to client");
                return;
            }
            Err(_) => {
                tracing::warn!(conn_id = %id, timeout_ms = send_timeout.as_millis() as u64, "Send to client timed out");
                return;
            }
        }
    }

    // Outbox closed: the peer was unregistered or evicted.
    let _ = timeout(send_timeout, sink.close()).await;
}
