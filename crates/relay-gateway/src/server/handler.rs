//! WebSocket handler
//!
//! Accepts WebSocket connections and pumps frames between the socket and
//! the relay.

use crate::connection::ConnectionHandle;
use crate::handlers::MessageDispatcher;
use crate::protocol::{CloseCode, RelayFrame};
use crate::server::GatewayState;
use axum::{
    extract::{
        ws::{CloseFrame, Message},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, oneshot};

/// WebSocket relay handler
pub async fn socket_handler(
    State(state): State<GatewayState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(state, socket))
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(state: GatewayState, socket: axum::extract::ws::WebSocket) {
    // Create message channel for outgoing frames
    let (tx, mut rx) = mpsc::channel::<RelayFrame>(state.config().relay.outbound_buffer);

    // Register connection and bind its session id
    let connection = state.connection_manager().add_connection(tx);
    let handle = connection.handle();
    let session_id = state.sessions().on_connect(handle);

    tracing::info!(
        handle = %handle,
        session_id = %session_id,
        "WebSocket connection established"
    );

    // Split the WebSocket
    let (mut ws_sink, mut ws_stream) = socket.split();

    // Send the handshake before anything queued for this connection
    match RelayFrame::connect(&session_id).to_json() {
        Ok(json) => {
            if ws_sink.send(Message::Text(json.into())).await.is_err() {
                tracing::warn!(session_id = %session_id, "Failed to send handshake");
                cleanup_connection(&state, handle);
                return;
            }
        }
        Err(e) => {
            tracing::error!(session_id = %session_id, error = %e, "Failed to encode handshake");
        }
    }

    // Clone state for the receive task
    let state_recv = state.clone();
    let session_id_recv = session_id.clone();

    // Spawn task to receive frames from the WebSocket
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = ws_stream.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    if let Err(e) =
                        MessageDispatcher::handle_text(state_recv.relay(), handle, &text).await
                    {
                        tracing::debug!(
                            session_id = %session_id_recv,
                            error = %e,
                            "Closing connection due to error"
                        );
                        return Some(e.to_close_code());
                    }
                }
                Ok(Message::Binary(_)) => {
                    tracing::debug!(
                        session_id = %session_id_recv,
                        "Binary frames not supported"
                    );
                    return Some(CloseCode::UnsupportedData);
                }
                Ok(Message::Ping(_)) => {
                    tracing::trace!(session_id = %session_id_recv, "Ping received");
                    // Pong is handled automatically by axum
                }
                Ok(Message::Pong(_)) => {
                    tracing::trace!(session_id = %session_id_recv, "Pong received");
                }
                Ok(Message::Close(_)) => {
                    tracing::info!(session_id = %session_id_recv, "Client closed connection");
                    return None;
                }
                Err(e) => {
                    tracing::warn!(
                        session_id = %session_id_recv,
                        error = %e,
                        "WebSocket error"
                    );
                    return Some(CloseCode::UnknownError);
                }
            }
        }
        None
    });

    // Close code to put on the Close frame, set when the receive side fails
    let (close_tx, mut close_rx) = oneshot::channel::<CloseCode>();

    // Clone for send task
    let session_id_send = session_id.clone();

    // Spawn task to send frames to the WebSocket
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            match frame.to_json() {
                Ok(json) => {
                    if ws_sink.send(Message::Text(json.into())).await.is_err() {
                        tracing::warn!(
                            session_id = %session_id_send,
                            "Failed to send frame to WebSocket"
                        );
                        return;
                    }
                }
                Err(e) => {
                    tracing::error!(
                        session_id = %session_id_send,
                        error = %e,
                        "Failed to encode frame"
                    );
                }
            }
        }

        // Close the WebSocket when channel is closed
        if let Ok(close_code) = close_rx.try_recv() {
            let _ = ws_sink.send(close_message(close_code)).await;
        }
        let _ = ws_sink.close().await;
    });

    // Wait for either side to finish
    let send_finished = tokio::select! {
        result = &mut recv_task => {
            if let Ok(Some(close_code)) = result {
                tracing::debug!(
                    session_id = %session_id,
                    close_code = close_code.as_u16(),
                    reason = close_code.description(),
                    "Receive task ended with close code"
                );
                let _ = close_tx.send(close_code);
            }
            false
        }
        _ = &mut send_task => {
            tracing::debug!(session_id = %session_id, "Send task ended");
            recv_task.abort();
            true
        }
    };

    // Clean up
    cleanup_connection(&state, handle);

    // Let frames already queued drain, then the send task closes the socket
    drop(connection);
    if !send_finished {
        let _ = send_task.await;
    }
}

/// Clean up a connection on disconnect
///
/// Safe to call more than once for the same handle.
fn cleanup_connection(state: &GatewayState, handle: ConnectionHandle) {
    tracing::debug!(handle = %handle, "Cleaning up connection");

    state.sessions().on_disconnect(handle);
    state.connection_manager().remove_connection(handle);
}

/// Build the Close frame announcing why the relay ended a connection
fn close_message(close_code: CloseCode) -> Message {
    Message::Close(Some(CloseFrame {
        code: close_code.as_u16(),
        reason: close_code.description().into(),
    }))
}
