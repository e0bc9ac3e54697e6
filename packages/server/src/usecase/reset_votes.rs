//! UseCase: 投票リセット処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ResetVotesUseCase::execute() メソッド
//! - 全参加者の投票クリアと votesReset の全員へのブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - リセットは全員が同一に適用すべき破壊的操作であり、送信者も
//!   エコーを受け取る（除外しない）ことはプロトコルの仕様
//!
//! ### どのような状況を想定しているか
//! - 正常系：事前状態（投票・公開フラグ）に関係なく全てクリアされる

use std::sync::Arc;

use crate::domain::{MessagePusher, RoomId, RoomRegistry};

/// 投票リセットのユースケース
pub struct ResetVotesUseCase {
    /// Registry（Room 管理の抽象化）
    registry: Arc<dyn RoomRegistry>,
    /// MessagePusher（イベント配送の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ResetVotesUseCase {
    /// 新しい ResetVotesUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// 投票リセットを実行
    ///
    /// votesReset は送信者を含む全購読者にブロードキャストされる。
    pub async fn execute(&self, room_id: &RoomId, message: &str) {
        self.registry.reset_votes(room_id).await;

        if let Err(e) = self.message_pusher.broadcast(room_id, message, None).await {
            tracing::warn!("Failed to broadcast votesReset: {}", e);
        }
    }
}
