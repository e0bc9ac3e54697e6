//! UseCase: 参加者削除処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RemoveParticipantUseCase::execute() メソッド
//! - 参加者の削除と participantRemoved の全員へのブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 存在しない ID の削除が no-op であり、幽霊イベントを流さないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の削除とブロードキャスト
//! - エッジケース：存在しない参加者 ID の削除（no-op、ブロードキャストなし）

use std::sync::Arc;

use crate::domain::{MessagePusher, ParticipantId, RoomId, RoomRegistry};

/// 参加者削除のユースケース
pub struct RemoveParticipantUseCase {
    /// Registry（Room 管理の抽象化）
    registry: Arc<dyn RoomRegistry>,
    /// MessagePusher（イベント配送の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl RemoveParticipantUseCase {
    /// 新しい RemoveParticipantUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// 参加者削除を実行
    ///
    /// 実際に削除された場合のみ participantRemoved を全購読者に
    /// ブロードキャストする。存在しない ID は no-op。
    ///
    /// # Returns
    ///
    /// 削除されたら `true`、対象がいなければ `false`
    pub async fn execute(
        &self,
        room_id: &RoomId,
        participant_id: &ParticipantId,
        message: &str,
    ) -> bool {
        let removed = self
            .registry
            .remove_participant(room_id, participant_id)
            .await;

        if removed {
            if let Err(e) = self.message_pusher.broadcast(room_id, message, None).await {
                tracing::warn!("Failed to broadcast participantRemoved: {}", e);
            }
        }

        removed
    }
}
