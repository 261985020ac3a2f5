//! WebSocket message DTOs.
//!
//! Every text frame carries one envelope: `{"event": <name>, "data": <payload>}`.

use serde::{Deserialize, Deserializer, Serialize};

/// Inbound messages (client → server)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientMessage {
    CreateGame(PlayerPayload),
    RemoveGame(PlayerPayload),
    JoinGame(InvitationPayload),
    LeaveGame(InvitationPayload),
    /// Opaque game action, relayed verbatim to the other room member.
    /// A frame without `data` relays `null`.
    BroadcastAction(Option<serde_json::Value>),
}

impl ClientMessage {
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::CreateGame(_) => "createGame",
            Self::RemoveGame(_) => "removeGame",
            Self::JoinGame(_) => "joinGame",
            Self::LeaveGame(_) => "leaveGame",
            Self::BroadcastAction(_) => "broadcastAction",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPayload {
    #[serde(deserialize_with = "scalar_id")]
    pub player_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationPayload {
    #[serde(deserialize_with = "scalar_id")]
    pub invitation_code: String,
    #[serde(deserialize_with = "scalar_id")]
    pub player_id: String,
}

/// Player ids and invitation codes may arrive as JSON strings or numbers.
/// Numbers keep their JSON text form (`7` → `"7"`).
fn scalar_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ScalarId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match ScalarId::deserialize(deserializer)? {
        ScalarId::Text(text) => text,
        ScalarId::Number(number) => number.to_string(),
    })
}

/// Outbound messages (server → client)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    NotifyJoinResult(JoinResultMessage),
    NotifyRoomState(RoomStateMessage),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinResultMessage {
    pub result: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `notifyRoomState` payload: either the enter/leave envelope or a relayed action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoomStateMessage {
    Entered(RoomEnteredMessage),
    Relay(serde_json::Value),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomAction {
    #[serde(rename = "ENTER")]
    Enter,
}

/// `payload` is `true` when `from` entered the room and `false` when it left
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomEnteredMessage {
    pub action: RoomAction,
    pub payload: bool,
    pub from: String,
}
