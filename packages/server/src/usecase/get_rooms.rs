//! UseCase: Room 一覧・Room 数取得（HTTP サマリ用）

use std::sync::Arc;

use crate::domain::{Room, RoomRegistry};

/// Room 一覧取得のユースケース
pub struct GetRoomsUseCase {
    /// Registry（Room 管理の抽象化）
    registry: Arc<dyn RoomRegistry>,
}

impl GetRoomsUseCase {
    /// 新しい GetRoomsUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// 全 Room のスナップショットを取得
    pub async fn execute(&self) -> Vec<Room> {
        self.registry.snapshots().await
    }

    /// アクティブな Room 数を取得（ヘルスチェック用）
    pub async fn room_count(&self) -> usize {
        self.registry.room_count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RoomId;
    use crate::infrastructure::registry::InMemoryRoomRegistry;

    #[tokio::test]
    async fn test_execute_returns_all_rooms() {
        // テスト項目: 全 Room のスナップショットが返される
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        registry
            .get_or_create(&RoomId::new("room-a".to_string()).unwrap())
            .await;
        registry
            .get_or_create(&RoomId::new("room-b".to_string()).unwrap())
            .await;
        let usecase = GetRoomsUseCase::new(registry);

        // when (操作):
        let rooms = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(rooms.len(), 2);
        assert_eq!(usecase.room_count().await, 2);
    }
}
