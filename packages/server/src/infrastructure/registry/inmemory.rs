//! InMemory Room Registry 実装
//!
//! ドメイン層が定義する RoomRegistry trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! ## ロック規約
//!
//! - 外側の Mutex は HashMap（Room の生成・取得・破棄）を守る
//! - Room ごとの `Arc<Mutex<Room>>` が個々の Room への変更を直列化する
//!
//! 外側のロックは Arc の clone を取り出すまでの短時間しか保持しないため、
//! ある Room への変更が他の Room の操作をブロックすることはありません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ClientId, Participant, ParticipantId, RegistryError, Room, RoomId, RoomRegistry, VoteValue,
};

/// インメモリ Room Registry 実装
///
/// プロセス全体で共有されるグローバル変数ではなく、明示的に生成して
/// ハンドラに注入するオブジェクトです。テストでは独立したレジストリを
/// いくつでも作れます。
#[derive(Default)]
pub struct InMemoryRoomRegistry {
    /// Room ID から Room への対応
    rooms: Mutex<HashMap<String, Arc<Mutex<Room>>>>,
}

impl InMemoryRoomRegistry {
    /// 新しい InMemoryRoomRegistry を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 既存 Room のハンドルを取得（存在しなければ None）
    async fn room_handle(&self, room_id: &RoomId) -> Option<Arc<Mutex<Room>>> {
        let rooms = self.rooms.lock().await;
        rooms.get(room_id.as_str()).cloned()
    }
}

#[async_trait]
impl RoomRegistry for InMemoryRoomRegistry {
    async fn get_or_create(&self, room_id: &RoomId) -> Room {
        let handle = {
            let mut rooms = self.rooms.lock().await;
            rooms
                .entry(room_id.as_str().to_string())
                .or_insert_with(|| {
                    tracing::info!("Room '{}' created", room_id.as_str());
                    Arc::new(Mutex::new(Room::new(room_id.clone())))
                })
                .clone()
        };
        let room = handle.lock().await;
        room.clone()
    }

    async fn remove(&self, room_id: &RoomId) -> bool {
        let mut rooms = self.rooms.lock().await;
        let removed = rooms.remove(room_id.as_str()).is_some();
        if removed {
            tracing::info!("Room '{}' deleted (empty)", room_id.as_str());
        }
        removed
    }

    async fn snapshot(&self, room_id: &RoomId) -> Option<Room> {
        let handle = self.room_handle(room_id).await?;
        let room = handle.lock().await;
        Some(room.clone())
    }

    async fn snapshots(&self) -> Vec<Room> {
        let handles: Vec<Arc<Mutex<Room>>> = {
            let rooms = self.rooms.lock().await;
            rooms.values().cloned().collect()
        };
        let mut result = Vec::with_capacity(handles.len());
        for handle in handles {
            let room = handle.lock().await;
            result.push(room.clone());
        }
        result
    }

    async fn room_count(&self) -> usize {
        let rooms = self.rooms.lock().await;
        rooms.len()
    }

    async fn add_participant(
        &self,
        room_id: &RoomId,
        participant: Participant,
    ) -> Result<(), RegistryError> {
        let handle = self
            .room_handle(room_id)
            .await
            .ok_or_else(|| RegistryError::RoomNotFound(room_id.as_str().to_string()))?;
        let mut room = handle.lock().await;
        room.add_participant(participant)
    }

    async fn remove_participant(&self, room_id: &RoomId, participant_id: &ParticipantId) -> bool {
        let Some(handle) = self.room_handle(room_id).await else {
            return false;
        };
        let mut room = handle.lock().await;
        room.remove_participant(participant_id)
    }

    async fn record_vote(
        &self,
        room_id: &RoomId,
        participant_id: &ParticipantId,
        vote: VoteValue,
    ) -> bool {
        let Some(handle) = self.room_handle(room_id).await else {
            return false;
        };
        let mut room = handle.lock().await;
        room.record_vote(participant_id, vote)
    }

    async fn update_task(&self, room_id: &RoomId, task: String) {
        let Some(handle) = self.room_handle(room_id).await else {
            return;
        };
        let mut room = handle.lock().await;
        room.update_task(task);
    }

    async fn set_votes_revealed(&self, room_id: &RoomId, revealed: bool) {
        let Some(handle) = self.room_handle(room_id).await else {
            return;
        };
        let mut room = handle.lock().await;
        room.set_votes_revealed(revealed);
    }

    async fn reset_votes(&self, room_id: &RoomId) {
        let Some(handle) = self.room_handle(room_id).await else {
            return;
        };
        let mut room = handle.lock().await;
        room.reset_votes();
    }

    async fn remove_participants_owned_by(
        &self,
        room_id: &RoomId,
        owner: &ClientId,
    ) -> Vec<ParticipantId> {
        let Some(handle) = self.room_handle(room_id).await else {
            return Vec::new();
        };
        let mut room = handle.lock().await;
        let owned = room.participants_owned_by(owner);
        for participant_id in &owned {
            room.remove_participant(participant_id);
        }
        owned
    }
}
