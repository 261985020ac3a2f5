//! セッション状態機械
//!
//! 1 つの接続が取りうる状態（待機中 / ホスト中 / ゲスト参加中）と、
//! イベントによる状態遷移を純粋関数 `transition` として定義します。
//!
//! 副作用（レジストリ更新・グループ購読・通知）は `Effect` としてデータで返し、
//! 実行は UseCase 層が行います。
//!
//! ## 参加処理の 2 段階化
//!
//! `joinGame` のガード（ルームの存在・空席）はレジストリの状態に依存し、かつ
//! チェックと更新をアトミックに行う必要がある。そのため `JoinGame` は
//! `Effect::ClaimGuestSeat` だけを返し、その結果を内部イベント `JoinResolved`
//! として再度 `transition` に渡す。

use thiserror::Error;

use super::{
    ActionPayload, JoinRejection, Notification, Participation, PlayerId, RoomCode,
};

/// 接続ごとのセッション状態
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// ルームに参加していない（初期状態）
    #[default]
    Idle,
    /// ルームのホスト
    Hosting(Participation),
    /// ルームのゲスト
    Guesting(Participation),
}

impl SessionState {
    /// 参加記録（待機中なら `None`）
    pub fn participation(&self) -> Option<&Participation> {
        match self {
            Self::Idle => None,
            Self::Hosting(participation) | Self::Guesting(participation) => Some(participation),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// 状態機械への入力イベント
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    CreateGame {
        player_id: PlayerId,
    },
    RemoveGame {
        player_id: PlayerId,
    },
    JoinGame {
        invitation_code: RoomCode,
        player_id: PlayerId,
    },
    /// `Effect::ClaimGuestSeat` の実行結果（内部イベント）
    JoinResolved {
        invitation_code: RoomCode,
        player_id: PlayerId,
        outcome: Result<(), JoinRejection>,
    },
    LeaveGame {
        player_id: PlayerId,
        invitation_code: RoomCode,
    },
    BroadcastAction {
        payload: ActionPayload,
    },
    Disconnect,
}

impl SessionEvent {
    /// ログ用のイベント名（ワイヤ上のイベント名と同じ）
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateGame { .. } => "createGame",
            Self::RemoveGame { .. } => "removeGame",
            Self::JoinGame { .. } => "joinGame",
            Self::JoinResolved { .. } => "joinResolved",
            Self::LeaveGame { .. } => "leaveGame",
            Self::BroadcastAction { .. } => "broadcastAction",
            Self::Disconnect => "disconnect",
        }
    }
}

/// 状態遷移に伴う副作用
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// `host` をホストとするルームを作成（ルームコード = `host`）
    CreateRoom { host: PlayerId },
    RemoveRoom { room: RoomCode },
    /// 存在・空席チェック付きでゲスト席を確保し、結果を `JoinResolved` で返す
    ClaimGuestSeat { room: RoomCode, guest: PlayerId },
    ClearGuest { room: RoomCode },
    Subscribe { room: RoomCode },
    Unsubscribe { room: RoomCode },
    /// ルーム内の自分以外の接続へ通知
    NotifyRoom {
        room: RoomCode,
        notification: Notification,
    },
    /// 呼び出し元の接続だけに通知
    Reply(Notification),
}

/// 前提条件を満たさず無視されたイベント
///
/// クライアントの誤用であり、状態も変えず通知も行わない。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolMisuse {
    #[error("{event} ignored: connection is not hosting a room")]
    NotHosting { event: &'static str },

    #[error("{event} ignored: connection is not a guest of any room")]
    NotGuesting { event: &'static str },

    #[error("{event} ignored: connection has no active room")]
    NoActiveRoom { event: &'static str },
}

/// 状態遷移の結果
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub next: SessionState,
    pub effects: Vec<Effect>,
    /// イベントが無視された場合の理由
    pub misuse: Option<ProtocolMisuse>,
}

impl Transition {
    fn to(next: SessionState, effects: Vec<Effect>) -> Self {
        Self {
            next,
            effects,
            misuse: None,
        }
    }

    fn ignored(state: &SessionState, misuse: Option<ProtocolMisuse>) -> Self {
        Self {
            next: state.clone(),
            effects: Vec::new(),
            misuse,
        }
    }
}

/// 状態遷移関数
///
/// 現在の状態とイベントから、次の状態と実行すべき副作用を返す。
pub fn transition(state: &SessionState, event: SessionEvent) -> Transition {
    let event_name = event.name();

    match (state, event) {
        (_, SessionEvent::CreateGame { player_id }) => {
            let participation = Participation::host(player_id.clone());
            let room = participation.room_code.clone();
            let mut effects: Vec<Effect> = leave_previous_group(state, &room).into_iter().collect();
            effects.push(Effect::CreateRoom { host: player_id });
            effects.push(Effect::Subscribe { room });
            Transition::to(SessionState::Hosting(participation), effects)
        }

        (SessionState::Hosting(participation), SessionEvent::RemoveGame { .. })
        | (SessionState::Hosting(participation), SessionEvent::Disconnect) => {
            close_room(participation)
        }

        (_, SessionEvent::JoinGame {
            invitation_code,
            player_id,
        }) => Transition::to(
            state.clone(),
            vec![Effect::ClaimGuestSeat {
                room: invitation_code,
                guest: player_id,
            }],
        ),

        (_, SessionEvent::JoinResolved {
            invitation_code,
            player_id,
            outcome: Ok(()),
        }) => {
            let participation = Participation::guest(player_id.clone(), invitation_code.clone());
            let mut effects: Vec<Effect> = leave_previous_group(state, &invitation_code)
                .into_iter()
                .collect();
            effects.extend([
                Effect::Subscribe {
                    room: invitation_code.clone(),
                },
                Effect::NotifyRoom {
                    room: invitation_code,
                    notification: Notification::RoomEntered {
                        from: player_id,
                        entered: true,
                    },
                },
                Effect::Reply(Notification::JoinResult(Ok(()))),
            ]);
            Transition::to(SessionState::Guesting(participation), effects)
        }

        (_, SessionEvent::JoinResolved {
            outcome: Err(rejection),
            ..
        }) => Transition::to(
            state.clone(),
            vec![Effect::Reply(Notification::JoinResult(Err(rejection)))],
        ),

        (SessionState::Guesting(participation), SessionEvent::LeaveGame { .. })
        | (SessionState::Guesting(participation), SessionEvent::Disconnect) => {
            leave_room(participation)
        }

        (
            SessionState::Hosting(participation) | SessionState::Guesting(participation),
            SessionEvent::BroadcastAction { payload },
        ) => Transition::to(
            state.clone(),
            vec![Effect::NotifyRoom {
                room: participation.room_code.clone(),
                notification: Notification::Relay(payload),
            }],
        ),

        (SessionState::Idle, SessionEvent::Disconnect) => Transition::ignored(state, None),

        (SessionState::Idle, SessionEvent::BroadcastAction { .. }) => Transition::ignored(
            state,
            Some(ProtocolMisuse::NoActiveRoom { event: event_name }),
        ),

        (_, SessionEvent::RemoveGame { .. }) => Transition::ignored(
            state,
            Some(ProtocolMisuse::NotHosting { event: event_name }),
        ),

        (_, SessionEvent::LeaveGame { .. }) => Transition::ignored(
            state,
            Some(ProtocolMisuse::NotGuesting { event: event_name }),
        ),
    }
}

/// 別のルームへ移る場合、以前のルームのグループ購読を解除する
///
/// レジストリ上の以前のルームには触れない（作成・参加は参加記録を上書きするだけ）。
fn leave_previous_group(state: &SessionState, next_room: &RoomCode) -> Option<Effect> {
    state
        .participation()
        .filter(|participation| participation.room_code != *next_room)
        .map(|participation| Effect::Unsubscribe {
            room: participation.room_code.clone(),
        })
}

/// ホストの退出（`removeGame` / 切断）: ルームを削除し、残ったゲストに退室を通知
fn close_room(participation: &Participation) -> Transition {
    let room = participation.room_code.clone();
    Transition::to(
        SessionState::Idle,
        vec![
            Effect::RemoveRoom { room: room.clone() },
            Effect::Unsubscribe { room: room.clone() },
            Effect::NotifyRoom {
                room,
                notification: Notification::RoomEntered {
                    from: participation.player_id.clone(),
                    entered: false,
                },
            },
        ],
    )
}

/// ゲストの退出（`leaveGame` / 切断）: ゲスト席を空け、ホストに退室を通知
fn leave_room(participation: &Participation) -> Transition {
    let room = participation.room_code.clone();
    Transition::to(
        SessionState::Idle,
        vec![
            Effect::ClearGuest { room: room.clone() },
            Effect::NotifyRoom {
                room: room.clone(),
                notification: Notification::RoomEntered {
                    from: participation.player_id.clone(),
                    entered: false,
                },
            },
            Effect::Unsubscribe { room },
        ],
    )
}
