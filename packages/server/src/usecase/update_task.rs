//! UseCase: タスク説明更新処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - UpdateTaskUseCase::execute() メソッド
//! - タスク説明の置き換えと、送信者を除くブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 送信者除外はこのイベント特有の仕様（送信者は入力中のテキストを
//!   正として持っており、エコーが入力と競合するのを避ける）
//!
//! ### どのような状況を想定しているか
//! - 正常系：タスク更新と送信者を除いたブロードキャスト

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, RoomId, RoomRegistry};

/// タスク説明更新のユースケース
pub struct UpdateTaskUseCase {
    /// Registry（Room 管理の抽象化）
    registry: Arc<dyn RoomRegistry>,
    /// MessagePusher（イベント配送の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl UpdateTaskUseCase {
    /// 新しい UpdateTaskUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// タスク説明更新を実行
    ///
    /// taskUpdated は送信者を除く全購読者にブロードキャストされる。
    ///
    /// # Arguments
    ///
    /// * `sender_connection` - 送信元の接続（ブロードキャストから除外）
    pub async fn execute(
        &self,
        room_id: &RoomId,
        task: String,
        message: &str,
        sender_connection: ConnectionId,
    ) {
        self.registry.update_task(room_id, task).await;

        if let Err(e) = self
            .message_pusher
            .broadcast(room_id, message, Some(sender_connection))
            .await
        {
            tracing::warn!("Failed to broadcast taskUpdated: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::message_pusher::MockMessagePusher;
    use crate::infrastructure::{
        message_pusher::WebSocketMessagePusher, registry::InMemoryRoomRegistry,
    };

    fn room_id(value: &str) -> RoomId {
        RoomId::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_update_task_excludes_sender_from_broadcast() {
        // テスト項目: taskUpdated が送信者以外の購読者にのみ届く
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = UpdateTaskUseCase::new(registry.clone(), pusher.clone());
        let id = room_id("sprint-42");
        registry.get_or_create(&id).await;

        let sender_conn = ConnectionId::generate();
        let other_conn = ConnectionId::generate();
        let (tx_sender, mut rx_sender) = tokio::sync::mpsc::unbounded_channel();
        let (tx_other, mut rx_other) = tokio::sync::mpsc::unbounded_channel();
        pusher.register(id.clone(), sender_conn.clone(), tx_sender).await;
        pusher.register(id.clone(), other_conn, tx_other).await;

        // when (操作):
        usecase
            .execute(&id, "estimate the API".to_string(), "task", sender_conn)
            .await;

        // then (期待する結果):
        assert_eq!(rx_other.recv().await, Some("task".to_string()));
        assert!(rx_sender.try_recv().is_err());
        assert_eq!(
            registry.snapshot(&id).await.unwrap().task,
            "estimate the API"
        );
    }

    #[tokio::test]
    async fn test_update_task_passes_exclusion_to_pusher() {
        // テスト項目: ブロードキャスト呼び出しに送信者の除外指定が渡される
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let id = room_id("sprint-42");
        registry.get_or_create(&id).await;

        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_broadcast()
            .withf(|_, _, exclude| exclude.is_some())
            .times(1)
            .returning(|_, _, _| Ok(()));
        let usecase = UpdateTaskUseCase::new(registry, Arc::new(pusher));

        // when (操作):
        usecase
            .execute(
                &id,
                "new task".to_string(),
                "task",
                ConnectionId::generate(),
            )
            .await;

        // then (期待する結果): expectation は drop 時に検証される
    }
}
