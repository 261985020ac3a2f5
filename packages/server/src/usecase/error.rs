//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::ProtocolMisuse;

/// セッションイベント処理のエラー
///
/// 接続を閉じるほどのものではなく、UI 層でログに残すだけ。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Ignored(#[from] ProtocolMisuse),
}

/// ルーム詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("Room not found")]
    RoomNotFound,
}
