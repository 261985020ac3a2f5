//! Two-party game room relay server.
//!
//! A host opens a room with `createGame`, one guest joins it with `joinGame`,
//! and `broadcastAction` payloads are relayed to the other member of the room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin taikyoku-server
//! cargo run --bin taikyoku-server -- --host 127.0.0.1 --port 3000
//! PORT=3000 CORS_ORIGIN=https://game.example cargo run --bin taikyoku-server
//! ```

use std::sync::Arc;

use clap::Parser;
use taikyoku_server::{
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository},
    ui::{CorsOrigin, Server, ServerConfig},
    usecase::{
        ConnectSessionUseCase, DisconnectSessionUseCase, GetRoomDetailUseCase, GetRoomsUseCase,
        HandleSessionEventUseCase,
    },
};
use taikyoku_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "taikyoku-server")]
#[command(about = "Two-party game room relay server over WebSocket", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "8080")]
    port: u16,

    /// Allowed cross-origin ("*" for any origin)
    #[arg(long, env = "CORS_ORIGIN", default_value = "*")]
    cors_origin: CorsOrigin,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_PKG_NAME"), env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. UseCases
    // 4. Server

    // 1. Create Repository (in-memory room registry)
    let repository = Arc::new(InMemoryRoomRepository::new());

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. Create UseCases
    let connect_session_usecase = Arc::new(ConnectSessionUseCase::new(message_pusher.clone()));
    let handle_session_event_usecase = Arc::new(HandleSessionEventUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        Arc::new(SystemClock),
    ));
    let disconnect_session_usecase = Arc::new(DisconnectSessionUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let get_rooms_usecase = Arc::new(GetRoomsUseCase::new(repository.clone()));
    let get_room_detail_usecase = Arc::new(GetRoomDetailUseCase::new(repository));

    // 4. Create and run the server
    let server = Server::new(
        connect_session_usecase,
        handle_session_event_usecase,
        disconnect_session_usecase,
        get_rooms_usecase,
        get_room_detail_usecase,
    );
    let config = ServerConfig {
        host: args.host,
        port: args.port,
        cors_origin: args.cors_origin,
    };
    if let Err(e) = server.run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
