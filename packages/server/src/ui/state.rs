//! Server state and connection management.

use std::sync::Arc;

use crate::usecase::{
    AddParticipantUseCase, CastVoteUseCase, DisconnectSessionUseCase, GetRoomDetailUseCase,
    GetRoomsUseCase, JoinRoomUseCase, RemoveParticipantUseCase, ResetVotesUseCase,
    RevealVotesUseCase, UpdateTaskUseCase,
};

/// Shared application state
pub struct AppState {
    /// JoinRoomUseCase（Room join のユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// AddParticipantUseCase（参加者追加のユースケース）
    pub add_participant_usecase: Arc<AddParticipantUseCase>,
    /// RemoveParticipantUseCase（参加者削除のユースケース）
    pub remove_participant_usecase: Arc<RemoveParticipantUseCase>,
    /// CastVoteUseCase（投票のユースケース）
    pub cast_vote_usecase: Arc<CastVoteUseCase>,
    /// UpdateTaskUseCase（タスク説明更新のユースケース）
    pub update_task_usecase: Arc<UpdateTaskUseCase>,
    /// RevealVotesUseCase（投票公開のユースケース）
    pub reveal_votes_usecase: Arc<RevealVotesUseCase>,
    /// ResetVotesUseCase（投票リセットのユースケース）
    pub reset_votes_usecase: Arc<ResetVotesUseCase>,
    /// DisconnectSessionUseCase（切断クリーンアップのユースケース）
    pub disconnect_session_usecase: Arc<DisconnectSessionUseCase>,
    /// GetRoomsUseCase（Room 一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（Room 詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
}
