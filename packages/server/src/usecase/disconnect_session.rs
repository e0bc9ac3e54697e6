//! UseCase: 接続切断クリーンアップ処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectSessionUseCase::execute() メソッド
//! - 購読解除、所有参加者の一括削除、空になった Room の破棄
//!
//! ### なぜこのテストが必要か
//! - 切断クリーンアップはプロトコルのライフサイクル不変条件そのもの：
//!   所有参加者だけが削除され、削除ごとに participantRemoved が流れ、
//!   最後の購読者が抜けた Room は破棄される
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数の所有参加者を持つ接続の切断
//! - エッジケース：最後の購読者の切断（Room 破棄）
//! - エッジケース：参加者を持たない接続の切断

use std::sync::Arc;

use crate::domain::{ClientId, ConnectionId, MessagePusher, ParticipantId, RoomId, RoomRegistry};

/// 接続切断クリーンアップのユースケース
pub struct DisconnectSessionUseCase {
    /// Registry（Room 管理の抽象化）
    registry: Arc<dyn RoomRegistry>,
    /// MessagePusher（イベント配送の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectSessionUseCase {
    /// 新しい DisconnectSessionUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// 切断クリーンアップを実行
    ///
    /// 1. 接続の購読を解除
    /// 2. このクライアントが所有する参加者をすべて削除
    ///
    /// # Returns
    ///
    /// 削除された参加者 ID のリスト。呼び出し側は ID ごとに
    /// participantRemoved をブロードキャストする。
    pub async fn execute(
        &self,
        room_id: &RoomId,
        client_id: &ClientId,
        connection_id: &ConnectionId,
    ) -> Vec<ParticipantId> {
        self.message_pusher.unregister(room_id, connection_id).await;

        self.registry
            .remove_participants_owned_by(room_id, client_id)
            .await
    }

    /// participantRemoved を残りの購読者にブロードキャスト
    pub async fn broadcast_participant_removed(
        &self,
        room_id: &RoomId,
        message: &str,
    ) -> Result<(), String> {
        self.message_pusher
            .broadcast(room_id, message, None)
            .await
            .map_err(|e| e.to_string())
    }

    /// 購読者がいなくなった Room を破棄
    ///
    /// # Returns
    ///
    /// Room を破棄したら `true`
    pub async fn remove_room_if_empty(&self, room_id: &RoomId) -> bool {
        if self.message_pusher.subscriber_count(room_id).await == 0 {
            self.registry.remove(room_id).await
        } else {
            false
        }
    }
}
