//! UseCase 層
//!
//! プロトコル操作ごとに 1 つのユースケースを定義します。各ユースケースは
//! `Arc<dyn RoomRegistry>` と `Arc<dyn MessagePusher>` に依存し、
//! 「Room 状態の変更 → 対応するイベントのブロードキャスト」という流れを
//! カプセル化します。メッセージの JSON 化は UI 層（DTO 境界）の責務です。

pub mod add_participant;
pub mod cast_vote;
pub mod disconnect_session;
pub mod error;
pub mod get_room_detail;
pub mod get_rooms;
pub mod join_room;
pub mod remove_participant;
pub mod reset_votes;
pub mod reveal_votes;
pub mod update_task;

pub use add_participant::AddParticipantUseCase;
pub use cast_vote::CastVoteUseCase;
pub use disconnect_session::DisconnectSessionUseCase;
pub use error::{AddParticipantError, GetRoomDetailError};
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use join_room::JoinRoomUseCase;
pub use remove_participant::RemoveParticipantUseCase;
pub use reset_votes::ResetVotesUseCase;
pub use reveal_votes::RevealVotesUseCase;
pub use update_task::UpdateTaskUseCase;
