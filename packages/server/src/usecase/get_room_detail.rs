//! UseCase: ルーム詳細取得

use std::sync::Arc;

use crate::domain::{Room, RoomCode, RoomRepository};

use super::error::GetRoomDetailError;

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomDetailUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// ルームコード（文字列）からルームを取得
    pub async fn execute(&self, code: String) -> Result<Room, GetRoomDetailError> {
        let code = RoomCode::new(code);
        self.repository
            .get_room(&code)
            .await
            .ok_or(GetRoomDetailError::RoomNotFound)
    }
}
