//! エンティティ定義
//!
//! Room（投票セッション）と Participant（投票者）のエンティティ。
//! Room の状態変更はすべてこのモジュールのメソッド経由で行い、
//! 「同じ ID の参加者は共存しない」「投票は明示的な vote 操作でのみ
//! 設定される」という不変条件をここで守ります。

use super::{
    error::RegistryError,
    value_object::{ClientId, ParticipantId, RoomId, VoteValue},
};

/// 投票セッションの参加者
///
/// 接続と 1 対 1 とは限らず、所有者（`owner`）の ClientId で紐付きます。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// 参加者 ID（Room 内で一意）
    pub id: ParticipantId,
    /// 表示名
    pub name: String,
    /// 投票値（未投票なら None）
    pub vote: Option<VoteValue>,
    /// 投票済みフラグ
    pub has_voted: bool,
    /// この参加者を所有するクライアントの ID
    pub owner: ClientId,
}

impl Participant {
    /// 新しい参加者を作成
    ///
    /// 投票値は常に未投票状態で始まります。作成時に投票値を受け付けない
    /// のは仕様であり、投票は必ず vote 操作経由で行われます。
    pub fn new(id: ParticipantId, name: String, owner: ClientId) -> Self {
        Self {
            id,
            name,
            vote: None,
            has_voted: false,
            owner,
        }
    }
}

/// 投票セッション（Room）エンティティ
///
/// 1 つのセッションの正とする状態を保持します。参加者の順序は追加順です。
/// 購読中の接続ハンドルはドメイン層では保持せず、Infrastructure 層の
/// MessagePusher が (Room, 接続) の関係を管理します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    /// Room の識別子
    pub id: RoomId,
    /// 見積もり対象のタスク説明（自由テキスト）
    pub task: String,
    /// 投票公開フラグ
    pub votes_revealed: bool,
    /// 参加者リスト（追加順）
    pub participants: Vec<Participant>,
}

impl Room {
    /// 空の Room を作成
    pub fn new(id: RoomId) -> Self {
        Self {
            id,
            task: String::new(),
            votes_revealed: false,
            participants: Vec::new(),
        }
    }

    /// 参加者を追加
    ///
    /// 同じ ID の参加者が既に存在する場合はエラーを返し、状態は変更
    /// されません。
    pub fn add_participant(&mut self, participant: Participant) -> Result<(), RegistryError> {
        if self.participants.iter().any(|p| p.id == participant.id) {
            return Err(RegistryError::DuplicateParticipant(
                participant.id.as_str().to_string(),
            ));
        }
        self.participants.push(participant);
        Ok(())
    }

    /// 参加者を削除
    ///
    /// 存在しない ID の場合は何もせず `false` を返します。
    pub fn remove_participant(&mut self, participant_id: &ParticipantId) -> bool {
        let before = self.participants.len();
        self.participants.retain(|p| &p.id != participant_id);
        self.participants.len() < before
    }

    /// 投票を記録
    ///
    /// 対象の参加者が存在すれば vote / has_voted を更新して `true` を、
    /// 存在しなければ何もせず `false` を返します。
    pub fn record_vote(&mut self, participant_id: &ParticipantId, vote: VoteValue) -> bool {
        match self.participants.iter_mut().find(|p| &p.id == participant_id) {
            Some(participant) => {
                participant.vote = Some(vote);
                participant.has_voted = true;
                true
            }
            None => false,
        }
    }

    /// タスク説明を置き換え
    pub fn update_task(&mut self, task: String) {
        self.task = task;
    }

    /// 投票公開フラグを設定
    pub fn set_votes_revealed(&mut self, revealed: bool) {
        self.votes_revealed = revealed;
    }

    /// 全参加者の投票をクリアし、公開フラグを下ろす
    pub fn reset_votes(&mut self) {
        for participant in &mut self.participants {
            participant.vote = None;
            participant.has_voted = false;
        }
        self.votes_revealed = false;
    }

    /// 指定クライアントが所有する参加者 ID の一覧を取得
    ///
    /// 切断クリーンアップで使用します。参加者リストの全走査ですが、
    /// 想定規模（1 Room あたり十数人）では十分です。
    pub fn participants_owned_by(&self, owner: &ClientId) -> Vec<ParticipantId> {
        self.participants
            .iter()
            .filter(|p| &p.owner == owner)
            .map(|p| p.id.clone())
            .collect()
    }
}
