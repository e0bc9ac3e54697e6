//! UseCase: Room への join 処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - Room の遅延生成と接続の購読登録
//!
//! ### なぜこのテストが必要か
//! - 「未知の Room ID への join で空の Room が作られる」ことはプロトコルの
//!   ライフサイクル不変条件
//! - roomState スナップショットが join した接続にのみ送られることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規 Room への join、既存 Room への join
//! - エッジケース：破棄済み Room への再 join（空の Room が再生成される）

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PusherChannel, Room, RoomId, RoomRegistry};

/// Room join のユースケース
pub struct JoinRoomUseCase {
    /// Registry（Room 管理の抽象化）
    registry: Arc<dyn RoomRegistry>,
    /// MessagePusher（イベント配送の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// join を実行
    ///
    /// Room を取得（なければ作成）し、接続を購読者として登録して、
    /// Room のスナップショットを返す。失敗しない。
    ///
    /// # Arguments
    ///
    /// * `room_id` - join 先の Room ID（Domain Model）
    /// * `connection_id` - この接続のハンドル
    /// * `sender` - この接続へのメッセージ送信用チャンネル
    pub async fn execute(
        &self,
        room_id: RoomId,
        connection_id: ConnectionId,
        sender: PusherChannel,
    ) -> Room {
        let room = self.registry.get_or_create(&room_id).await;
        self.message_pusher
            .register(room_id, connection_id, sender)
            .await;
        room
    }

    /// roomState スナップショットを join した接続にのみ送信
    ///
    /// # Arguments
    ///
    /// * `message` - 送信する JSON メッセージ（DTO 層で生成されたもの）
    pub async fn push_room_state(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
        message: &str,
    ) -> Result<(), String> {
        self.message_pusher
            .push_to(room_id, connection_id, message)
            .await
            .map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{
        message_pusher::WebSocketMessagePusher, registry::InMemoryRoomRegistry,
    };

    fn room_id(value: &str) -> RoomId {
        RoomId::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_join_creates_room_lazily() {
        // テスト項目: 未知の Room ID への join で空の Room が作成される
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = JoinRoomUseCase::new(registry.clone(), pusher.clone());

        // when (操作):
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        let room = usecase
            .execute(room_id("sprint-42"), ConnectionId::generate(), tx)
            .await;

        // then (期待する結果):
        assert_eq!(room.id.as_str(), "sprint-42");
        assert!(room.participants.is_empty());
        assert_eq!(registry.room_count().await, 1);
        assert_eq!(pusher.subscriber_count(&room_id("sprint-42")).await, 1);
    }

    #[tokio::test]
    async fn test_join_existing_room_returns_current_state() {
        // テスト項目: 既存 Room への join で現在の状態が返される
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = JoinRoomUseCase::new(registry.clone(), pusher.clone());
        let id = room_id("sprint-42");
        registry.get_or_create(&id).await;
        registry.update_task(&id, "estimate the API".to_string()).await;

        // when (操作):
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        let room = usecase.execute(id.clone(), ConnectionId::generate(), tx).await;

        // then (期待する結果):
        assert_eq!(room.task, "estimate the API");
    }

    #[tokio::test]
    async fn test_push_room_state_reaches_only_joining_connection() {
        // テスト項目: roomState スナップショットが join した接続にのみ届く
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = JoinRoomUseCase::new(registry, pusher.clone());
        let id = room_id("sprint-42");

        let (tx_a, mut rx_a) = tokio::sync::mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = tokio::sync::mpsc::unbounded_channel();
        let conn_a = ConnectionId::generate();
        let conn_b = ConnectionId::generate();
        usecase.execute(id.clone(), conn_a.clone(), tx_a).await;
        usecase.execute(id.clone(), conn_b.clone(), tx_b).await;

        // when (操作):
        let result = usecase
            .push_room_state(&id, &conn_b, r#"{"type":"roomState"}"#)
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx_b.recv().await, Some(r#"{"type":"roomState"}"#.to_string()));
        assert!(rx_a.try_recv().is_err());
    }
}
