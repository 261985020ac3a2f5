//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    http::{Method, header},
    routing::get,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::usecase::{
    ConnectSessionUseCase, DisconnectSessionUseCase, GetRoomDetailUseCase, GetRoomsUseCase,
    HandleSessionEventUseCase,
};

use super::{
    config::{CorsOrigin, ServerConfig},
    handler::{get_room_detail, get_rooms, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket game relay server
///
/// This struct encapsulates the use cases and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     connect_session_usecase,
///     handle_session_event_usecase,
///     disconnect_session_usecase,
///     get_rooms_usecase,
///     get_room_detail_usecase,
/// );
/// server.run(config).await?;
/// ```
pub struct Server {
    /// ConnectSessionUseCase（接続開始のユースケース）
    connect_session_usecase: Arc<ConnectSessionUseCase>,
    /// HandleSessionEventUseCase（セッションイベント処理のユースケース）
    handle_session_event_usecase: Arc<HandleSessionEventUseCase>,
    /// DisconnectSessionUseCase（切断のユースケース）
    disconnect_session_usecase: Arc<DisconnectSessionUseCase>,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（ルーム詳細取得のユースケース）
    get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
}

impl Server {
    /// Create a new Server instance
    pub fn new(
        connect_session_usecase: Arc<ConnectSessionUseCase>,
        handle_session_event_usecase: Arc<HandleSessionEventUseCase>,
        disconnect_session_usecase: Arc<DisconnectSessionUseCase>,
        get_rooms_usecase: Arc<GetRoomsUseCase>,
        get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    ) -> Self {
        Self {
            connect_session_usecase,
            handle_session_event_usecase,
            disconnect_session_usecase,
            get_rooms_usecase,
            get_room_detail_usecase,
        }
    }

    /// Build the router with all endpoints, request tracing and CORS applied
    pub fn router(self, cors_origin: CorsOrigin) -> Router {
        let cors = cors_layer(&cors_origin);

        let app_state = Arc::new(AppState {
            connect_session_usecase: self.connect_session_usecase,
            handle_session_event_usecase: self.handle_session_event_usecase,
            disconnect_session_usecase: self.disconnect_session_usecase,
            get_rooms_usecase: self.get_rooms_usecase,
            get_room_detail_usecase: self.get_room_detail_usecase,
            cors_origin,
        });

        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{code}", get(get_room_detail))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .with_state(app_state)
    }

    /// Run the WebSocket game relay server
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the configured address or
    /// if there's an error during server execution.
    pub async fn run(self, config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = config.bind_addr();
        let app = self.router(config.cors_origin);

        // Bind the server to the host and port
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!(
            "WebSocket game relay server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

fn cors_layer(cors_origin: &CorsOrigin) -> CorsLayer {
    let allow_origin = match cors_origin {
        CorsOrigin::Any => AllowOrigin::any(),
        CorsOrigin::Exact(origin) => AllowOrigin::exact(origin.clone()),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE])
}
