//! セッション状態機械の実行器
//!
//! `domain::session::transition` が返す `Effect` を Repository / MessagePusher に
//! 適用します。`ClaimGuestSeat` の結果は `JoinResolved` として状態機械に戻します。

use std::{collections::VecDeque, sync::Arc};

use taikyoku_shared::time::{Clock, SystemClock};

use crate::domain::{
    ConnectionId, Effect, MessagePusher, Room, RoomRepository, SessionEvent, SessionState,
    Timestamp, Transition, transition,
};

use super::error::SessionError;

/// 状態機械の実行器（各セッション UseCase が共有する）
pub(crate) struct SessionEffects {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl SessionEffects {
    /// ルーム作成時刻にはシステム時刻を使う
    pub(crate) fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock: Arc::new(SystemClock),
        }
    }

    /// ルーム作成時刻の取得に使う Clock を差し替える
    pub(crate) fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub(crate) fn message_pusher(&self) -> &Arc<dyn MessagePusher> {
        &self.message_pusher
    }

    /// イベントを処理し、`state` を次の状態に更新する
    ///
    /// 1 つの接続のイベントは逐次処理される前提。途中の送信失敗はログに残して続行する。
    pub(crate) async fn run(
        &self,
        connection: ConnectionId,
        state: &mut SessionState,
        event: SessionEvent,
    ) -> Result<(), SessionError> {
        let mut pending = VecDeque::from([event]);

        while let Some(event) = pending.pop_front() {
            let event_name = event.name();
            let Transition {
                next,
                effects,
                misuse,
            } = transition(state, event);

            if let Some(misuse) = misuse {
                return Err(misuse.into());
            }

            tracing::debug!(
                "Connection '{}' handled {} ({} effect(s))",
                connection,
                event_name,
                effects.len()
            );
            *state = next;

            for effect in effects {
                if let Some(follow_up) = self.apply(connection, effect).await {
                    pending.push_back(follow_up);
                }
            }
        }

        Ok(())
    }

    async fn apply(&self, connection: ConnectionId, effect: Effect) -> Option<SessionEvent> {
        match effect {
            Effect::CreateRoom { host } => {
                let room = Room::new(host, Timestamp::new(self.clock.now_millis()));
                let code = room.code.clone();
                match self.repository.create_room(room).await {
                    Some(previous) => tracing::warn!(
                        "Room '{}' already existed (guest: {:?}) and was overwritten",
                        code,
                        previous.guest.as_ref().map(|guest| guest.as_str())
                    ),
                    None => tracing::info!("Room '{}' created", code),
                }
                None
            }
            Effect::RemoveRoom { room } => {
                if self.repository.remove_room(&room).await.is_some() {
                    tracing::info!("Room '{}' removed", room);
                } else {
                    tracing::debug!("Room '{}' was already removed", room);
                }
                None
            }
            Effect::ClaimGuestSeat { room, guest } => {
                let outcome = self
                    .repository
                    .claim_guest_seat(&room, guest.clone())
                    .await
                    .map(|_| ());
                match &outcome {
                    Ok(()) => tracing::info!("Player '{}' joined room '{}'", guest, room),
                    Err(rejection) => tracing::info!(
                        "Player '{}' could not join room '{}': {}",
                        guest,
                        room,
                        rejection
                    ),
                }
                Some(SessionEvent::JoinResolved {
                    invitation_code: room,
                    player_id: guest,
                    outcome,
                })
            }
            Effect::ClearGuest { room } => {
                self.repository.clear_guest(&room).await;
                tracing::info!("Guest seat of room '{}' cleared", room);
                None
            }
            Effect::Subscribe { room } => {
                self.message_pusher.subscribe(&room, connection).await;
                None
            }
            Effect::Unsubscribe { room } => {
                self.message_pusher.unsubscribe(&room, connection).await;
                None
            }
            Effect::NotifyRoom { room, notification } => {
                if let Err(e) = self
                    .message_pusher
                    .broadcast_to_room(&room, connection, &notification)
                    .await
                {
                    tracing::warn!("Failed to notify room '{}': {}", room, e);
                }
                None
            }
            Effect::Reply(notification) => {
                if let Err(e) = self.message_pusher.push_to(connection, &notification).await {
                    tracing::warn!("Failed to reply to connection '{}': {}", connection, e);
                }
                None
            }
        }
    }
}
