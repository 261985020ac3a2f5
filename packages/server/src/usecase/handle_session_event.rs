//! UseCase: セッションイベント処理（createGame / removeGame / joinGame / leaveGame / broadcastAction）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - HandleSessionEventUseCase::execute() メソッド
//! - 状態遷移とレジストリ・通知への副作用
//!
//! ### なぜこのテストが必要か
//! - ルームの同一性（ルームコード = ホスト ID）を保証
//! - 定員（ホスト + ゲスト 1 人）を超えないことを保証
//! - 中継がルーム内に閉じていること、ペイロードが加工されないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：作成 → 参加 → 中継 → 退出 → 削除
//! - 異常系：存在しないルーム・満室のルームへの参加
//! - エッジケース：待機中の broadcastAction / leaveGame

use std::sync::Arc;

use taikyoku_shared::time::Clock;

use crate::domain::{ConnectionId, MessagePusher, RoomRepository, SessionEvent, SessionState};

use super::{error::SessionError, session_effects::SessionEffects};

/// セッションイベント処理のユースケース
pub struct HandleSessionEventUseCase {
    effects: SessionEffects,
}

impl HandleSessionEventUseCase {
    /// 新しい HandleSessionEventUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            effects: SessionEffects::new(repository, message_pusher).with_clock(clock),
        }
    }

    /// イベント処理を実行
    ///
    /// # Arguments
    ///
    /// * `connection` - イベントを送ってきた接続
    /// * `state` - その接続のセッション状態（処理後の状態に更新される）
    /// * `event` - 処理するイベント
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 処理完了（参加拒否も呼び出し元への通知として正常に処理される）
    /// * `Err(SessionError::Ignored)` - 前提条件を満たさず無視された
    pub async fn execute(
        &self,
        connection: ConnectionId,
        state: &mut SessionState,
        event: SessionEvent,
    ) -> Result<(), SessionError> {
        self.effects.run(connection, state, event).await
    }
}
