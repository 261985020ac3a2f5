//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, StatusCode, header::ORIGIN},
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, SessionEvent, SessionState},
    infrastructure::dto::websocket::ClientMessage,
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, StatusCode> {
    let origin = headers.get(ORIGIN);
    if !state.cors_origin.allows(origin) {
        tracing::warn!("Rejected WebSocket upgrade from origin {:?}", origin);
        return Err(StatusCode::FORBIDDEN);
    }

    let connection = ConnectionId::generate();
    tracing::info!("Connection '{}' upgrading", connection);

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, connection)))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// Everything addressed to this connection (join results, room state, relayed
/// actions) goes through the pusher and arrives here.
///
/// # Arguments
///
/// * `rx` - Channel receiver registered with the MessagePusher
/// * `sender` - WebSocket sink to send messages to this client
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, connection: ConnectionId) {
    let (sender, mut receiver) = socket.split();

    // Create a channel for this connection to receive messages
    let (tx, rx) = mpsc::unbounded_channel();
    let mut session = state
        .connect_session_usecase
        .execute(connection, tx)
        .await;
    tracing::info!("Connection '{}' registered", connection);

    // Spawn a task to push outbound messages to this client
    let mut send_task = pusher_loop(rx, sender);

    // Inbound events are processed here, one at a time, so the session state
    // stays owned by this task and is available for the disconnect cleanup.
    loop {
        let msg = tokio::select! {
            msg = receiver.next() => msg,
            _ = &mut send_task => {
                tracing::info!("Outbound channel of '{}' closed", connection);
                break;
            }
        };

        let msg = match msg {
            Some(Ok(msg)) => msg,
            Some(Err(e)) => {
                tracing::error!("WebSocket error on '{}': {}", connection, e);
                break;
            }
            None => break,
        };

        match msg {
            Message::Text(text) => {
                tracing::debug!("Received text from '{}': {}", connection, text);
                handle_text(&state, connection, &mut session, text.as_str()).await;
            }
            Message::Binary(_) => {
                tracing::warn!("Ignoring binary frame from '{}'", connection);
            }
            Message::Ping(_) => {
                // Ping/pong is handled automatically by the WebSocket protocol
                tracing::debug!("Received ping");
            }
            Message::Close(_) => {
                tracing::info!("Connection '{}' requested close", connection);
                break;
            }
            Message::Pong(_) => {}
        }
    }

    send_task.abort();

    let released = state
        .disconnect_session_usecase
        .execute(connection, &mut session)
        .await;
    match released {
        Some(participation) => tracing::info!(
            "Connection '{}' disconnected, released {:?} seat of room '{}'",
            connection,
            participation.role,
            participation.room_code
        ),
        None => tracing::info!("Connection '{}' disconnected", connection),
    }
}

/// Parses one inbound frame and feeds it to the session state machine.
async fn handle_text(
    state: &AppState,
    connection: ConnectionId,
    session: &mut SessionState,
    text: &str,
) {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!("Failed to parse message from '{}': {}", connection, e);
            return;
        }
    };

    let name = message.event_name();
    let event = SessionEvent::from(message);

    if let Err(e) = state
        .handle_session_event_usecase
        .execute(connection, session, event)
        .await
    {
        tracing::warn!("Ignored '{}' from '{}': {}", name, connection, e);
    }
}
