//! UseCase 層のエラー型定義

use thiserror::Error;

/// 参加者追加のエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddParticipantError {
    /// 同じ ID の参加者が既に存在する
    #[error("Participant '{0}' already exists")]
    DuplicateParticipant(String),

    /// 接続が join していない Room への追加要求
    #[error("Room '{0}' not found")]
    RoomNotFound(String),
}

/// Room 詳細取得のエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GetRoomDetailError {
    /// 指定された Room が存在しない
    #[error("Room not found")]
    RoomNotFound,
}
