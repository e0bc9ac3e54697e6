//! UseCase: 投票公開・非公開処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RevealVotesUseCase::execute() メソッド
//! - 公開フラグの設定と、送信者を除くブロードキャスト
//!
//! ### どのような状況を想定しているか
//! - 正常系：公開（revealed=true）と再非公開（revealed=false）
//! - 送信者除外の確認（送信者は自分でフラグを切り替えた本人）

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, RoomId, RoomRegistry};

/// 投票公開のユースケース
pub struct RevealVotesUseCase {
    /// Registry（Room 管理の抽象化）
    registry: Arc<dyn RoomRegistry>,
    /// MessagePusher（イベント配送の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl RevealVotesUseCase {
    /// 新しい RevealVotesUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// 投票公開フラグの設定を実行
    ///
    /// votesRevealed は送信者を除く全購読者にブロードキャストされる。
    pub async fn execute(
        &self,
        room_id: &RoomId,
        revealed: bool,
        message: &str,
        sender_connection: ConnectionId,
    ) {
        self.registry.set_votes_revealed(room_id, revealed).await;

        if let Err(e) = self
            .message_pusher
            .broadcast(room_id, message, Some(sender_connection))
            .await
        {
            tracing::warn!("Failed to broadcast votesRevealed: {}", e);
        }
    }
}
