//! エンティティ
//!
//! - `Room`: ホスト 1 人 + ゲスト最大 1 人のゲームルーム
//! - `Participation`: 接続ごとの参加記録（どのルームに、どの役割で参加しているか）
//! - `Notification`: クライアントへ通知する内容

use serde::Serialize;

use super::{ActionPayload, JoinRejection, PlayerId, RoomCode, Timestamp};

/// ゲームルーム
///
/// ## 不変条件
///
/// - `code` は常に `host` と等しい（`Room::new` でのみ生成されるため）
/// - ゲストは最大 1 人
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Room {
    pub code: RoomCode,
    pub host: PlayerId,
    pub guest: Option<PlayerId>,
    pub created_at: Timestamp,
}

impl Room {
    /// ホストのプレイヤー ID をルームコードとしてルームを作成
    pub fn new(host: PlayerId, created_at: Timestamp) -> Self {
        Self {
            code: RoomCode::from(&host),
            host,
            guest: None,
            created_at,
        }
    }

    /// ゲストが参加済みか（= 満室か）
    pub fn is_full(&self) -> bool {
        self.guest.is_some()
    }

    /// ゲスト席にゲストを設定する（空席かどうかは呼び出し側で確認する）
    pub fn set_guest(&mut self, guest: PlayerId) {
        self.guest = Some(guest);
    }

    /// ゲスト席を空ける（空席でもエラーにしない）
    pub fn clear_guest(&mut self) {
        self.guest = None;
    }
}

/// ルーム内での役割
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Host,
    Guest,
}

/// 接続ごとの参加記録
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participation {
    pub player_id: PlayerId,
    pub room_code: RoomCode,
    pub role: Role,
}

impl Participation {
    /// ホストとしての参加記録（ルームコード = 自分の ID）
    pub fn host(player_id: PlayerId) -> Self {
        Self {
            room_code: RoomCode::from(&player_id),
            player_id,
            role: Role::Host,
        }
    }

    /// ゲストとしての参加記録（ルームコード = ホストの ID）
    pub fn guest(player_id: PlayerId, room_code: RoomCode) -> Self {
        Self {
            player_id,
            room_code,
            role: Role::Guest,
        }
    }

    pub fn is_host(&self) -> bool {
        self.role == Role::Host
    }
}

/// クライアントへの通知内容
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// `joinGame` の結果（呼び出し元のみに返す）
    JoinResult(Result<(), JoinRejection>),
    /// 入室 (`entered = true`) / 退室 (`entered = false`) の通知
    RoomEntered { from: PlayerId, entered: bool },
    /// `broadcastAction` のペイロードをそのまま中継
    Relay(ActionPayload),
}
