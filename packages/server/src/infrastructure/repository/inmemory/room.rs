//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! `Mutex<HashMap>` をインメモリのルームレジストリとして使用します。
//! プロセス再起動をまたいだ永続化は行いません。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{JoinRejection, PlayerId, RepositoryError, Room, RoomCode, RoomRepository};

/// インメモリ Room Repository 実装
///
/// 全ての操作は 1 回のロック取得内で完結するため、`claim_guest_seat` の
/// 「存在・空席チェック → ゲスト設定」に他の接続が割り込むことはない。
#[derive(Default)]
pub struct InMemoryRoomRepository {
    /// ルームコード → ルーム
    rooms: Mutex<HashMap<RoomCode, Room>>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new() -> Self {
        Self::default()
    }
}

/// ロック取得済みのマップ上でゲストを設定する（`set_guest` と `claim_guest_seat` 共通）
fn assign_guest(
    rooms: &mut HashMap<RoomCode, Room>,
    code: &RoomCode,
    guest: PlayerId,
) -> Result<Room, RepositoryError> {
    let room = rooms
        .get_mut(code)
        .ok_or_else(|| RepositoryError::RoomNotFound(code.as_str().to_string()))?;
    room.set_guest(guest);
    Ok(room.clone())
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn create_room(&self, room: Room) -> Option<Room> {
        let mut rooms = self.rooms.lock().await;
        rooms.insert(room.code.clone(), room)
    }

    async fn remove_room(&self, code: &RoomCode) -> Option<Room> {
        let mut rooms = self.rooms.lock().await;
        rooms.remove(code)
    }

    async fn get_room(&self, code: &RoomCode) -> Option<Room> {
        let rooms = self.rooms.lock().await;
        rooms.get(code).cloned()
    }

    async fn set_guest(&self, code: &RoomCode, guest: PlayerId) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        assign_guest(&mut rooms, code, guest).map(|_| ())
    }

    async fn clear_guest(&self, code: &RoomCode) {
        let mut rooms = self.rooms.lock().await;
        if let Some(room) = rooms.get_mut(code) {
            room.clear_guest();
        }
    }

    async fn claim_guest_seat(
        &self,
        code: &RoomCode,
        guest: PlayerId,
    ) -> Result<Room, JoinRejection> {
        let mut rooms = self.rooms.lock().await;
        match rooms.get(code) {
            None => return Err(JoinRejection::NotFound),
            Some(room) if room.is_full() => return Err(JoinRejection::Full),
            Some(_) => {}
        }
        assign_guest(&mut rooms, code, guest).map_err(|_| JoinRejection::NotFound)
    }

    async fn list_rooms(&self) -> Vec<Room> {
        let rooms = self.rooms.lock().await;
        let mut list: Vec<Room> = rooms.values().cloned().collect();
        list.sort_by(|a, b| a.code.cmp(&b.code));
        list
    }
}
