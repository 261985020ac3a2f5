//! UseCase: 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectSessionUseCase::execute() メソッド
//! - 切断時の後始末（ホストならルーム削除、ゲストなら退出）
//!
//! ### なぜこのテストが必要か
//! - 明示的な removeGame / leaveGame と同じ結果になることを保証
//! - 切断が複数回通知されても後始末が 1 回だけ行われることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：ホストの切断、ゲストの切断
//! - エッジケース：待機中の切断、二重の切断

use std::sync::Arc;

use crate::domain::{
    ConnectionId, MessagePusher, Participation, RoomRepository, SessionEvent, SessionState,
};

use super::session_effects::SessionEffects;

/// 切断のユースケース
pub struct DisconnectSessionUseCase {
    effects: SessionEffects,
}

impl DisconnectSessionUseCase {
    /// 新しい DisconnectSessionUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            effects: SessionEffects::new(repository, message_pusher),
        }
    }

    /// 切断を実行
    ///
    /// `state` は必ず `Idle` になるため、同じ接続で再度呼ばれても何もしない。
    ///
    /// # Returns
    ///
    /// 切断時に解消した参加記録（待機中だった場合は `None`）
    pub async fn execute(
        &self,
        connection: ConnectionId,
        state: &mut SessionState,
    ) -> Option<Participation> {
        let participation = state.participation().cloned();

        if let Err(e) = self
            .effects
            .run(connection, state, SessionEvent::Disconnect)
            .await
        {
            // Disconnect はどの状態からも受理されるため通常は到達しない
            tracing::warn!("Disconnect of '{}' was not processed: {}", connection, e);
        }

        self.effects
            .message_pusher()
            .unregister_client(connection)
            .await;

        participation
    }
}
