//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - Room ごとの購読者（接続）と `UnboundedSender` の管理
//! - 購読者へのメッセージ配送（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`src/ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ配送に
//! 使用します。チャンネルへの送信はブロックしないため、遅い接続が他の
//! 購読者への配送を止めることはありません。受信側が落ちている（接続が
//! 閉じられた）チャンネルへの送信失敗は警告ログを残してスキップします。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel, RoomId};

/// WebSocket を使った MessagePusher 実装
///
/// ## フィールド
///
/// - `subscribers`: Room ID → (接続 ID → sender チャンネル) の二段マップ
pub struct WebSocketMessagePusher {
    /// Room ごとの購読者
    subscribers: Arc<Mutex<HashMap<String, HashMap<String, PusherChannel>>>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register(&self, room_id: RoomId, connection_id: ConnectionId, sender: PusherChannel) {
        let mut subscribers = self.subscribers.lock().await;
        subscribers
            .entry(room_id.as_str().to_string())
            .or_default()
            .insert(connection_id.as_str().to_string(), sender);
        tracing::debug!(
            "Connection '{}' subscribed to room '{}'",
            connection_id.as_str(),
            room_id.as_str()
        );
    }

    async fn unregister(&self, room_id: &RoomId, connection_id: &ConnectionId) {
        let mut subscribers = self.subscribers.lock().await;
        if let Some(room_subscribers) = subscribers.get_mut(room_id.as_str()) {
            room_subscribers.remove(connection_id.as_str());
            if room_subscribers.is_empty() {
                subscribers.remove(room_id.as_str());
            }
        }
        tracing::debug!(
            "Connection '{}' unsubscribed from room '{}'",
            connection_id.as_str(),
            room_id.as_str()
        );
    }

    async fn push_to(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let subscribers = self.subscribers.lock().await;

        let sender = subscribers
            .get(room_id.as_str())
            .and_then(|room_subscribers| room_subscribers.get(connection_id.as_str()))
            .ok_or_else(|| {
                MessagePushError::ConnectionNotFound(connection_id.as_str().to_string())
            })?;

        sender
            .send(content.to_string())
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed message to connection '{}'", connection_id.as_str());
        Ok(())
    }

    async fn broadcast(
        &self,
        room_id: &RoomId,
        content: &str,
        exclude: Option<ConnectionId>,
    ) -> Result<(), MessagePushError> {
        let subscribers = self.subscribers.lock().await;

        let Some(room_subscribers) = subscribers.get(room_id.as_str()) else {
            // 購読者のいない Room へのブロードキャストは no-op
            return Ok(());
        };

        let exclude_id = exclude.as_ref().map(|id| id.as_str());
        for (connection_id, sender) in room_subscribers.iter() {
            if Some(connection_id.as_str()) == exclude_id {
                continue;
            }
            // ブロードキャストでは一部の送信失敗を許容
            if let Err(e) = sender.send(content.to_string()) {
                tracing::warn!(
                    "Failed to push message to connection '{}': {}",
                    connection_id,
                    e
                );
            } else {
                tracing::debug!("Broadcasted message to connection '{}'", connection_id);
            }
        }

        Ok(())
    }

    async fn subscriber_count(&self, room_id: &RoomId) -> usize {
        let subscribers = self.subscribers.lock().await;
        subscribers
            .get(room_id.as_str())
            .map(|room_subscribers| room_subscribers.len())
            .unwrap_or(0)
    }
}
