//! UseCase: 参加者追加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - AddParticipantUseCase::execute() メソッド
//! - 参加者の追加と participantAdded の全員へのブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 送信者自身にもエコーが届くこと（送信者はローカルに参加者を挿入して
//!   いないため、エコーを受けて初めて反映する）はプロトコルの仕様
//! - 重複 ID の追加が拒否され、ブロードキャストが発生しないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の追加とエコーを含むブロードキャスト
//! - 異常系：重複した参加者 ID での追加試行
//! - 異常系：join していない（存在しない）Room への追加試行

use std::sync::Arc;

use crate::domain::{MessagePusher, Participant, RegistryError, RoomId, RoomRegistry};

use super::error::AddParticipantError;

/// 参加者追加のユースケース
pub struct AddParticipantUseCase {
    /// Registry（Room 管理の抽象化）
    registry: Arc<dyn RoomRegistry>,
    /// MessagePusher（イベント配送の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl AddParticipantUseCase {
    /// 新しい AddParticipantUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// 参加者追加を実行
    ///
    /// 追加に成功した場合のみ participantAdded を Room の全購読者に
    /// ブロードキャストする。送信者も除外しない。
    ///
    /// # Arguments
    ///
    /// * `room_id` - 対象の Room ID（Domain Model）
    /// * `participant` - 追加する参加者（Domain Model、未投票状態）
    /// * `message` - ブロードキャストする JSON メッセージ
    pub async fn execute(
        &self,
        room_id: &RoomId,
        participant: Participant,
        message: &str,
    ) -> Result<(), AddParticipantError> {
        // 1. Registry 経由で参加者を追加
        self.registry
            .add_participant(room_id, participant)
            .await
            .map_err(|e| match e {
                RegistryError::DuplicateParticipant(id) => {
                    AddParticipantError::DuplicateParticipant(id)
                }
                RegistryError::RoomNotFound(id) => AddParticipantError::RoomNotFound(id),
            })?;

        // 2. 全購読者にブロードキャスト（送信者のエコーを含む）
        if let Err(e) = self.message_pusher.broadcast(room_id, message, None).await {
            tracing::warn!("Failed to broadcast participantAdded: {}", e);
        }

        Ok(())
    }
}
