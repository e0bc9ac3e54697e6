//! MessagePusher trait 定義
//!
//! Room の購読者（接続）へのイベント配送インターフェース。
//! (Room, 接続) の購読関係もこの trait の実装が管理します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{
    error::MessagePushError,
    value_object::{ConnectionId, RoomId},
};

/// クライアントへのメッセージ送信用チャンネル
///
/// unbounded チャンネルなので送信はブロックしません。遅い接続は自分の
/// writer タスクのキューに溜まるだけで、他の購読者への配送を妨げません。
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Message Pusher trait
///
/// UseCase 層はこの trait 経由で Room 単位のブロードキャストと個別送信を
/// 行う。接続が閉じられている購読者への送信失敗はエラーにせず、ログを
/// 残してスキップする。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続を Room の購読者として登録
    async fn register(&self, room_id: RoomId, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続の購読を解除
    async fn unregister(&self, room_id: &RoomId, connection_id: &ConnectionId);

    /// 特定の接続にのみメッセージを送信（roomState スナップショット用）
    async fn push_to(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError>;

    /// Room の全購読者にメッセージをブロードキャスト
    ///
    /// `exclude` に指定された接続には送信しない。閉じられた接続は
    /// 黙ってスキップする。
    async fn broadcast(
        &self,
        room_id: &RoomId,
        content: &str,
        exclude: Option<ConnectionId>,
    ) -> Result<(), MessagePushError>;

    /// Room の現在の購読者数を取得
    async fn subscriber_count(&self, room_id: &RoomId) -> usize;
}
