//! UseCase 層
//!
//! - セッション系: 接続開始・イベント処理・切断（状態機械の実行）
//! - 参照系: HTTP API 向けのルーム一覧・詳細

mod connect_session;
mod disconnect_session;
mod error;
mod get_room_detail;
mod get_rooms;
mod handle_session_event;
mod session_effects;

pub use connect_session::ConnectSessionUseCase;
pub use disconnect_session::DisconnectSessionUseCase;
pub use error::{GetRoomDetailError, SessionError};
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use handle_session_event::HandleSessionEventUseCase;
