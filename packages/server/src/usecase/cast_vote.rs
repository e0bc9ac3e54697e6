//! UseCase: 投票処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CastVoteUseCase::execute() メソッド
//! - 投票の記録と voteUpdated の全員へのブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 投票が対象の参加者のみを更新することは集計の正しさの前提
//! - 存在しない参加者への投票が no-op になり、ブロードキャストという
//!   副作用も発生しないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：投票の記録とブロードキャスト（送信者もエコーを受ける）
//! - エッジケース：存在しない参加者 ID への投票（完全な no-op）

use std::sync::Arc;

use crate::domain::{MessagePusher, ParticipantId, RoomId, RoomRegistry, VoteValue};

/// 投票のユースケース
pub struct CastVoteUseCase {
    /// Registry（Room 管理の抽象化）
    registry: Arc<dyn RoomRegistry>,
    /// MessagePusher（イベント配送の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl CastVoteUseCase {
    /// 新しい CastVoteUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// 投票を実行
    ///
    /// 参加者が存在して投票が記録された場合のみ voteUpdated を全購読者に
    /// ブロードキャストする。送信者も除外しない。
    ///
    /// # Returns
    ///
    /// 投票が記録されたら `true`、参加者がいなければ `false`
    pub async fn execute(
        &self,
        room_id: &RoomId,
        participant_id: &ParticipantId,
        vote: VoteValue,
        message: &str,
    ) -> bool {
        let updated = self
            .registry
            .record_vote(room_id, participant_id, vote)
            .await;

        if updated {
            if let Err(e) = self.message_pusher.broadcast(room_id, message, None).await {
                tracing::warn!("Failed to broadcast voteUpdated: {}", e);
            }
        }

        updated
    }
}
