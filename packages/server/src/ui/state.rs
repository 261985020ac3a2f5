//! Server state shared by the handlers.

use std::sync::Arc;

use crate::usecase::{
    ConnectSessionUseCase, DisconnectSessionUseCase, GetRoomDetailUseCase, GetRoomsUseCase,
    HandleSessionEventUseCase,
};

use super::config::CorsOrigin;

/// Shared application state
pub struct AppState {
    /// ConnectSessionUseCase（接続開始のユースケース）
    pub connect_session_usecase: Arc<ConnectSessionUseCase>,
    /// HandleSessionEventUseCase（セッションイベント処理のユースケース）
    pub handle_session_event_usecase: Arc<HandleSessionEventUseCase>,
    /// DisconnectSessionUseCase（切断のユースケース）
    pub disconnect_session_usecase: Arc<DisconnectSessionUseCase>,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（ルーム詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    /// WebSocket 接続時の Origin チェックに使う
    pub cors_origin: CorsOrigin,
}
