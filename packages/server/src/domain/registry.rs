//! RoomRegistry trait 定義
//!
//! ドメイン層が必要とする Room の管理インターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{
    entity::{Participant, Room},
    error::RegistryError,
    value_object::{ClientId, ParticipantId, RoomId, VoteValue},
};

/// Room Registry trait
///
/// Room の生成・取得・破棄と、Room 状態への直列化された変更操作を提供する
/// インターフェース。UseCase 層はこの trait に依存し、Infrastructure 層の
/// 具体的な実装には依存しない。
///
/// ## 直列化の規約
///
/// 同一 Room に対する変更操作は実装側で直列化されること。並行する 2 つの
/// vote 操作が互いの更新を壊したり、broadcast 用のスナップショット取得と
/// 参加者の追加・削除が競合したりしてはならない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomRegistry: Send + Sync {
    /// Room を取得（存在しなければ空の Room を作成）して、その
    /// スナップショットを返す。失敗しない。
    async fn get_or_create(&self, room_id: &RoomId) -> Room;

    /// Room を破棄。購読者がいなくなったときのみ呼ばれる想定。
    /// 存在しない場合は `false` を返す。
    async fn remove(&self, room_id: &RoomId) -> bool;

    /// Room のスナップショットを取得
    async fn snapshot(&self, room_id: &RoomId) -> Option<Room>;

    /// 全 Room のスナップショットを取得（HTTP サマリ用）
    async fn snapshots(&self) -> Vec<Room>;

    /// 現在の Room 数を取得
    async fn room_count(&self) -> usize;

    /// 参加者を追加（同一 ID が既に存在する場合はエラー）
    async fn add_participant(
        &self,
        room_id: &RoomId,
        participant: Participant,
    ) -> Result<(), RegistryError>;

    /// 参加者を削除。削除されたら `true`、対象がいなければ `false`
    async fn remove_participant(&self, room_id: &RoomId, participant_id: &ParticipantId) -> bool;

    /// 投票を記録。参加者が存在すれば `true`、いなければ no-op で `false`
    async fn record_vote(
        &self,
        room_id: &RoomId,
        participant_id: &ParticipantId,
        vote: VoteValue,
    ) -> bool;

    /// タスク説明を置き換え
    async fn update_task(&self, room_id: &RoomId, task: String);

    /// 投票公開フラグを設定
    async fn set_votes_revealed(&self, room_id: &RoomId, revealed: bool);

    /// 全参加者の投票をクリアし、公開フラグを下ろす
    async fn reset_votes(&self, room_id: &RoomId);

    /// 指定クライアントが所有する参加者をすべて削除し、削除した
    /// 参加者 ID のリストを返す（切断クリーンアップ用）
    async fn remove_participants_owned_by(
        &self,
        room_id: &RoomId,
        owner: &ClientId,
    ) -> Vec<ParticipantId>;
}
