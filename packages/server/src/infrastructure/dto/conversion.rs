//! Conversion logic between DTOs and domain entities.

use crate::domain::{
    entity::{Participant, Room},
    error::ValueObjectError,
    value_object::{ClientId, ParticipantId},
};
use crate::infrastructure::dto::{http::RoomSummaryDto, websocket as dto};

// ========================================
// DTO → Domain Entity
// ========================================

impl TryFrom<dto::ParticipantDto> for Participant {
    type Error = ValueObjectError;

    /// 参加者 DTO をドメインエンティティに変換
    ///
    /// DTO が持つ vote / hasVoted は捨てられ、参加者は常に未投票状態で
    /// 作成される。投票は明示的な vote イベント経由でのみ記録される。
    fn try_from(dto: dto::ParticipantDto) -> Result<Self, Self::Error> {
        let id = ParticipantId::new(dto.id)?;
        let owner = ClientId::new(dto.client_id)?;
        Ok(Participant::new(id, dto.name, owner))
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<Participant> for dto::ParticipantDto {
    fn from(model: Participant) -> Self {
        Self {
            id: model.id.as_str().to_string(),
            name: model.name,
            vote: model.vote.map(|v| v.into_string()),
            has_voted: model.has_voted,
            client_id: model.owner.into_string(),
        }
    }
}

impl From<Room> for dto::RoomStateDto {
    fn from(model: Room) -> Self {
        Self {
            participants: model.participants.into_iter().map(Into::into).collect(),
            task: model.task,
            votes_revealed: model.votes_revealed,
        }
    }
}

impl From<&Room> for RoomSummaryDto {
    fn from(model: &Room) -> Self {
        Self {
            id: model.id.as_str().to_string(),
            participant_count: model.participants.len(),
            task: model.task.clone(),
            votes_revealed: model.votes_revealed,
        }
    }
}
