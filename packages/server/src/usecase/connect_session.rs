//! UseCase: 接続開始処理
//!
//! 新しい WebSocket 接続の送信チャンネルを MessagePusher に登録し、
//! 待機中（Idle）のセッション状態を返します。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PusherChannel, SessionState};

/// 接続開始のユースケース
pub struct ConnectSessionUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectSessionUseCase {
    /// 新しい ConnectSessionUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 接続開始を実行
    ///
    /// # Returns
    ///
    /// 接続の初期状態（常に `SessionState::Idle`）
    pub async fn execute(&self, connection: ConnectionId, sender: PusherChannel) -> SessionState {
        self.message_pusher.register_client(connection, sender).await;
        SessionState::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MockMessagePusher;

    #[tokio::test]
    async fn test_connect_registers_sender_and_starts_idle() {
        // テスト項目: 接続時に送信チャンネルが登録され、待機中の状態から始まる
        // given (前提条件):
        let connection = ConnectionId::generate();
        let mut message_pusher = MockMessagePusher::new();
        message_pusher
            .expect_register_client()
            .withf(move |id, _| *id == connection)
            .times(1)
            .return_const(());
        let usecase = ConnectSessionUseCase::new(Arc::new(message_pusher));

        // when (操作):
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        let state = usecase.execute(connection, tx).await;

        // then (期待する結果):
        assert_eq!(state, SessionState::Idle);
    }
}
