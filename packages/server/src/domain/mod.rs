//! ドメイン層
//!
//! - `value_object`: PlayerId, RoomCode, ConnectionId など
//! - `entity`: Room, Participation, Notification
//! - `session`: 接続ごとのセッション状態機械
//! - `repository` / `message_pusher`: Infrastructure 層が実装するインターフェース

pub mod entity;
pub mod error;
pub mod message_pusher;
pub mod repository;
pub mod session;
pub mod value_object;

pub use entity::{Notification, Participation, Role, Room};
pub use error::{JoinRejection, MessagePushError, RepositoryError};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::RoomRepository;
pub use session::{Effect, ProtocolMisuse, SessionEvent, SessionState, Transition, transition};
pub use value_object::{ActionPayload, ConnectionId, PlayerId, RoomCode, Timestamp};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
