//! MessagePusher trait 定義
//!
//! クライアントへの通知（直接送信・ルーム単位のブロードキャスト）の抽象化。
//! 接続のグループ購読もここで扱います。グループ名はルームコードです。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, Notification, RoomCode};

/// 各接続の送信チャンネル（エンコード済みのテキストフレームを流す）
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// MessagePusher trait
///
/// UseCase 層はこの trait に依存し、WebSocket などの具体的な実装には依存しない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続の送信チャンネルを登録
    async fn register_client(&self, connection: ConnectionId, sender: PusherChannel);

    /// 接続を登録解除する（購読中のグループからも外れる）
    async fn unregister_client(&self, connection: ConnectionId);

    /// 接続をルームのグループに参加させる
    async fn subscribe(&self, room: &RoomCode, connection: ConnectionId);

    /// 接続をルームのグループから外す
    async fn unsubscribe(&self, room: &RoomCode, connection: ConnectionId);

    /// 特定の接続へ通知する
    async fn push_to(
        &self,
        connection: ConnectionId,
        notification: &Notification,
    ) -> Result<(), MessagePushError>;

    /// ルームのグループ内で `exclude` 以外の全接続へ通知する
    ///
    /// 一部の送信失敗は許容し、実際に送信できた接続数を返す。
    async fn broadcast_to_room(
        &self,
        room: &RoomCode,
        exclude: ConnectionId,
        notification: &Notification,
    ) -> Result<usize, MessagePushError>;
}
