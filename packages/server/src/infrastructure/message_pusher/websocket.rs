//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を管理
//! - ルームコードをグループ名とした購読管理（subscribe / unsubscribe）
//! - 通知の JSON エンコードと送信（push_to, broadcast_to_room）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。
//! 接続の登録とグループ購読は同じロックで管理し、両者が食い違わないようにしています。

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{
        ConnectionId, MessagePushError, MessagePusher, Notification, PusherChannel, RoomCode,
    },
    infrastructure::dto::websocket::ServerMessage,
};

#[derive(Default)]
struct Connections {
    /// 接続 ID → 送信チャンネル
    clients: HashMap<ConnectionId, PusherChannel>,
    /// ルームコード → 購読中の接続
    groups: HashMap<RoomCode, HashSet<ConnectionId>>,
}

impl Connections {
    fn leave_group(&mut self, room: &RoomCode, connection: ConnectionId) {
        if let Some(members) = self.groups.get_mut(room) {
            members.remove(&connection);
            if members.is_empty() {
                self.groups.remove(room);
            }
        }
    }
}

/// WebSocket を使った MessagePusher 実装
#[derive(Default)]
pub struct WebSocketMessagePusher {
    connections: Mutex<Connections>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// ルームを購読中の接続数
    pub async fn subscriber_count(&self, room: &RoomCode) -> usize {
        let connections = self.connections.lock().await;
        connections.groups.get(room).map_or(0, HashSet::len)
    }
}

/// 通知をワイヤ形式（JSON テキスト）にエンコード
pub fn encode_notification(notification: &Notification) -> Result<String, MessagePushError> {
    let message = ServerMessage::from(notification.clone());
    serde_json::to_string(&message).map_err(|e| MessagePushError::EncodeFailed(e.to_string()))
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection: ConnectionId, sender: PusherChannel) {
        let mut connections = self.connections.lock().await;
        connections.clients.insert(connection, sender);
        tracing::debug!("Connection '{}' registered to MessagePusher", connection);
    }

    async fn unregister_client(&self, connection: ConnectionId) {
        let mut connections = self.connections.lock().await;
        connections.clients.remove(&connection);
        let rooms: Vec<RoomCode> = connections
            .groups
            .iter()
            .filter(|(_, members)| members.contains(&connection))
            .map(|(room, _)| room.clone())
            .collect();
        for room in rooms {
            connections.leave_group(&room, connection);
        }
        tracing::debug!("Connection '{}' unregistered from MessagePusher", connection);
    }

    async fn subscribe(&self, room: &RoomCode, connection: ConnectionId) {
        let mut connections = self.connections.lock().await;
        connections
            .groups
            .entry(room.clone())
            .or_default()
            .insert(connection);
        tracing::debug!("Connection '{}' subscribed to room '{}'", connection, room);
    }

    async fn unsubscribe(&self, room: &RoomCode, connection: ConnectionId) {
        let mut connections = self.connections.lock().await;
        connections.leave_group(room, connection);
        tracing::debug!("Connection '{}' unsubscribed from room '{}'", connection, room);
    }

    async fn push_to(
        &self,
        connection: ConnectionId,
        notification: &Notification,
    ) -> Result<(), MessagePushError> {
        let content = encode_notification(notification)?;
        let connections = self.connections.lock().await;

        let sender = connections
            .clients
            .get(&connection)
            .ok_or_else(|| MessagePushError::ClientNotFound(connection.to_string()))?;
        sender
            .send(content)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed message to connection '{}'", connection);
        Ok(())
    }

    async fn broadcast_to_room(
        &self,
        room: &RoomCode,
        exclude: ConnectionId,
        notification: &Notification,
    ) -> Result<usize, MessagePushError> {
        let content = encode_notification(notification)?;
        let connections = self.connections.lock().await;

        let Some(members) = connections.groups.get(room) else {
            return Ok(0);
        };

        let mut delivered = 0;
        for member in members.iter().filter(|member| **member != exclude) {
            match connections.clients.get(member) {
                // ブロードキャストでは一部の送信失敗を許容
                Some(sender) => match sender.send(content.clone()) {
                    Ok(()) => delivered += 1,
                    Err(e) => tracing::warn!(
                        "Failed to push message to connection '{}': {}",
                        member,
                        e
                    ),
                },
                None => tracing::warn!(
                    "Connection '{}' not found during broadcast to room '{}', skipping",
                    member,
                    room
                ),
            }
        }
        tracing::debug!("Broadcasted message to {} member(s) of room '{}'", delivered, room);

        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ActionPayload, JoinRejection, PlayerId};
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - push_to: 特定の接続への送信
    // - broadcast_to_room: 購読中の他の接続への送信（送信者・他ルームは除外）
    // - unregister_client: 登録解除で購読も外れること
    //
    // 【なぜこのテストが必要か】
    // - 中継がルーム単位に閉じていることを保証する必要がある
    // ========================================

    fn code(id: &str) -> RoomCode {
        RoomCode::new(id.to_string())
    }

    fn relay(value: serde_json::Value) -> Notification {
        Notification::Relay(ActionPayload::new(value))
    }

    async fn connect(
        pusher: &WebSocketMessagePusher,
    ) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let connection = ConnectionId::generate();
        pusher.register_client(connection, tx).await;
        (connection, rx)
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定の接続に JSON エンコードされた通知を送信できる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (connection, mut rx) = connect(&pusher).await;

        // when (操作):
        let result = pusher
            .push_to(connection, &Notification::JoinResult(Err(JoinRejection::Full)))
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(
            rx.recv().await.unwrap(),
            r#"{"event":"notifyJoinResult","data":{"result":false,"message":"room full"}}"#
        );
    }

    #[tokio::test]
    async fn test_push_to_client_not_found() {
        // テスト項目: 登録されていない接続への送信はエラーを返す
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();

        // when (操作):
        let result = pusher
            .push_to(ConnectionId::generate(), &Notification::JoinResult(Ok(())))
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::ClientNotFound(_))));
    }

    #[tokio::test]
    async fn test_broadcast_excludes_sender_and_other_rooms() {
        // テスト項目: ブロードキャストは同じルームの他の接続にだけ届く
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (host, mut host_rx) = connect(&pusher).await;
        let (guest, mut guest_rx) = connect(&pusher).await;
        let (outsider, mut outsider_rx) = connect(&pusher).await;
        pusher.subscribe(&code("H1"), host).await;
        pusher.subscribe(&code("H1"), guest).await;
        pusher.subscribe(&code("H2"), outsider).await;

        // when (操作):
        let delivered = pusher
            .broadcast_to_room(&code("H1"), guest, &relay(serde_json::json!({"x": 1})))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(delivered, 1);
        assert_eq!(
            host_rx.recv().await.unwrap(),
            r#"{"event":"notifyRoomState","data":{"x":1}}"#
        );
        assert!(guest_rx.try_recv().is_err());
        assert!(outsider_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_broadcast_to_unknown_room() {
        // テスト項目: 購読者のいないルームへのブロードキャストはエラーにならない
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (connection, _rx) = connect(&pusher).await;

        // when (操作):
        let result = pusher
            .broadcast_to_room(&code("NOPE"), connection, &relay(serde_json::json!(null)))
            .await;

        // then (期待する結果):
        assert_eq!(result, Ok(0));
    }

    #[tokio::test]
    async fn test_broadcast_skips_closed_channel() {
        // テスト項目: 受信側が閉じた接続があってもブロードキャストは成功する
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (host, rx) = connect(&pusher).await;
        let (guest, _guest_rx) = connect(&pusher).await;
        pusher.subscribe(&code("H1"), host).await;
        pusher.subscribe(&code("H1"), guest).await;
        drop(rx);

        // when (操作):
        let result = pusher
            .broadcast_to_room(&code("H1"), guest, &relay(serde_json::json!({})))
            .await;

        // then (期待する結果):
        assert_eq!(result, Ok(0));
    }

    #[tokio::test]
    async fn test_unsubscribe_and_unregister_remove_membership() {
        // テスト項目: 購読解除・登録解除するとグループから外れ、空のグループは削除される
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (host, _host_rx) = connect(&pusher).await;
        let (guest, _guest_rx) = connect(&pusher).await;
        pusher.subscribe(&code("H1"), host).await;
        pusher.subscribe(&code("H1"), guest).await;

        // when (操作):
        pusher.unsubscribe(&code("H1"), guest).await;
        let after_unsubscribe = pusher.subscriber_count(&code("H1")).await;
        pusher.unregister_client(host).await;
        let after_unregister = pusher.subscriber_count(&code("H1")).await;

        // then (期待する結果):
        assert_eq!(after_unsubscribe, 1);
        assert_eq!(after_unregister, 0);
        let entered = Notification::RoomEntered {
            from: PlayerId::new("G1".to_string()),
            entered: true,
        };
        assert!(matches!(
            pusher.push_to(host, &entered).await,
            Err(MessagePushError::ClientNotFound(_))
        ));
    }
}
