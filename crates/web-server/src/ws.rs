use crate::AppState;
use crate::error::AppError;
use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use events::{ClientCommand, LogLevel, LogMessage, WsMessage};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

/// # GET /ws
/// Pushes every frame change to the client and accepts `ClientCommand`s.
pub async fn websocket_handler(
    State(state): State<Arc<AppState>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    tracing::info!("[WS] New client connected.");
    // Subscribe before taking the snapshots so no change falls in between.
    let mut updates = state.tx.subscribe();
    let (mut sender, mut receiver) = socket.split();

    let greeting = [
        WsMessage::Connected,
        WsMessage::HeatmapFrame((*state.heatmap_frame().await).clone()),
        WsMessage::ComparisonFrame((*state.comparison_frame().await).clone()),
    ];
    for message in &greeting {
        if send(&mut sender, message).await.is_err() {
            return;
        }
    }

    loop {
        tokio::select! {
            update = updates.recv() => {
                match update {
                    Ok(message) => {
                        if send(&mut sender, &message).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "[WS] Client lagging, frames skipped.");
                        if send(&mut sender, &lag_notice(skipped)).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(reply) = respond(&state, &text).await {
                            if send(&mut sender, &reply).await.is_err() {
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::info!("[WS] Client disconnected.");
                        break;
                    }
                    Some(Err(e)) => {
                        tracing::error!(error = %e, "[WS] Error.");
                        break;
                    }
                    Some(Ok(_)) => {}
                }
            }
        }
    }
    tracing::info!("[WS] Connection closed.");
}

/// Runs one client command. Failures are reported back to the sender as a
/// log message rather than closing the socket.
async fn respond(state: &AppState, text: &str) -> Option<WsMessage> {
    let result = match ClientCommand::from_json(text) {
        Ok(command) => {
            tracing::debug!(?command, "[WS] Command received.");
            state.handle_command(command).await
        }
        Err(e) => Err(e.into()),
    };
    match result {
        Ok(reply) => reply,
        Err(e) => Some(WsMessage::Log(rejection(&e))),
    }
}

/// Rejected commands come back as `Warn`. Server faults come back as `Error`
/// without their details, as over HTTP.
fn rejection(error: &AppError) -> LogMessage {
    if error.status().is_server_error() {
        tracing::error!(error = ?error, "[WS] Command failed.");
        LogMessage::new(LogLevel::Error, "An internal server error occurred")
    } else {
        tracing::warn!(error = %error, "[WS] Command rejected.");
        LogMessage::new(LogLevel::Warn, error.to_string())
    }
}

/// Tells a lagging client how many updates it missed.
fn lag_notice(skipped: u64) -> WsMessage {
    WsMessage::Log(LogMessage::new(
        LogLevel::Info,
        format!("{skipped} updates skipped, resuming with the latest frame"),
    ))
}

async fn send(
    sender: &mut SplitSink<WebSocket, Message>,
    message: &WsMessage,
) -> Result<(), axum::Error> {
    let text = match message.to_json() {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(error = %e, "[WS] Failed to encode message.");
            return Ok(());
        }
    };
    sender.send(Message::Text(text)).await
}
