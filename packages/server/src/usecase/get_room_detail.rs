//! UseCase: Room 詳細取得（HTTP サマリ用）

use std::sync::Arc;

use crate::domain::{Room, RoomId, RoomRegistry};

use super::error::GetRoomDetailError;

/// Room 詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    /// Registry（Room 管理の抽象化）
    registry: Arc<dyn RoomRegistry>,
}

impl GetRoomDetailUseCase {
    /// 新しい GetRoomDetailUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// 指定された Room のスナップショットを取得
    ///
    /// # Arguments
    ///
    /// * `room_id` - HTTP パスから渡される生の Room ID 文字列
    pub async fn execute(&self, room_id: String) -> Result<Room, GetRoomDetailError> {
        let room_id = RoomId::new(room_id).map_err(|_| GetRoomDetailError::RoomNotFound)?;
        self.registry
            .snapshot(&room_id)
            .await
            .ok_or(GetRoomDetailError::RoomNotFound)
    }
}
