//! ドメイン層のエラー型

use thiserror::Error;

/// Repository 操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Room '{0}' not found")]
    RoomNotFound(String),
}

/// ルーム参加の拒否理由
///
/// `Display` の文言はそのまま `notifyJoinResult` の `message` としてクライアントに返る。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum JoinRejection {
    #[error("room not found")]
    NotFound,

    #[error("room full")]
    Full,
}

/// メッセージ通知のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("Connection '{0}' not found")]
    ClientNotFound(String),

    #[error("Failed to push message: {0}")]
    PushFailed(String),

    #[error("Failed to encode notification: {0}")]
    EncodeFailed(String),
}
