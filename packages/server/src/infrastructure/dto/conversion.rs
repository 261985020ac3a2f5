//! Conversion logic between DTOs and domain types.

use taikyoku_shared::time::timestamp_to_jst_rfc3339;

use crate::domain::{ActionPayload, Notification, PlayerId, Room, RoomCode, SessionEvent};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// DTO → Domain
// ========================================

impl From<dto::ClientMessage> for SessionEvent {
    fn from(message: dto::ClientMessage) -> Self {
        match message {
            dto::ClientMessage::CreateGame(data) => SessionEvent::CreateGame {
                player_id: PlayerId::new(data.player_id),
            },
            dto::ClientMessage::RemoveGame(data) => SessionEvent::RemoveGame {
                player_id: PlayerId::new(data.player_id),
            },
            dto::ClientMessage::JoinGame(data) => SessionEvent::JoinGame {
                invitation_code: RoomCode::new(data.invitation_code),
                player_id: PlayerId::new(data.player_id),
            },
            dto::ClientMessage::LeaveGame(data) => SessionEvent::LeaveGame {
                player_id: PlayerId::new(data.player_id),
                invitation_code: RoomCode::new(data.invitation_code),
            },
            dto::ClientMessage::BroadcastAction(data) => SessionEvent::BroadcastAction {
                payload: ActionPayload::new(data.unwrap_or_default()),
            },
        }
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<Notification> for dto::ServerMessage {
    fn from(notification: Notification) -> Self {
        match notification {
            Notification::JoinResult(outcome) => {
                dto::ServerMessage::NotifyJoinResult(dto::JoinResultMessage {
                    result: outcome.is_ok(),
                    message: outcome.err().map(|rejection| rejection.to_string()),
                })
            }
            Notification::RoomEntered { from, entered } => dto::ServerMessage::NotifyRoomState(
                dto::RoomStateMessage::Entered(dto::RoomEnteredMessage {
                    action: dto::RoomAction::Enter,
                    payload: entered,
                    from: from.into_string(),
                }),
            ),
            Notification::Relay(payload) => dto::ServerMessage::NotifyRoomState(
                dto::RoomStateMessage::Relay(payload.into_value()),
            ),
        }
    }
}

impl From<Room> for http::RoomDto {
    fn from(room: Room) -> Self {
        Self {
            code: room.code.into_string(),
            host: room.host.into_string(),
            guest: room.guest.map(PlayerId::into_string),
            created_at: timestamp_to_jst_rfc3339(room.created_at.value()),
        }
    }
}
