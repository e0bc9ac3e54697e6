//! ドメイン層のエラー型定義

use thiserror::Error;

/// 値オブジェクトのバリデーションエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValueObjectError {
    /// 空文字列は許可されない
    #[error("{0} must not be empty")]
    Empty(&'static str),

    /// 最大長超過
    #[error("{0} must not exceed {1} characters")]
    TooLong(&'static str, usize),
}

/// RoomRegistry のエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// 指定された Room が存在しない
    #[error("Room '{0}' not found")]
    RoomNotFound(String),

    /// 同じ ID の参加者が既に存在する
    #[error("Participant '{0}' already exists in the room")]
    DuplicateParticipant(String),
}

/// MessagePusher のエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MessagePushError {
    /// 指定された接続が登録されていない
    #[error("Connection '{0}' not found")]
    ConnectionNotFound(String),

    /// メッセージ送信失敗（接続が閉じられているなど）
    #[error("Failed to push message: {0}")]
    PushFailed(String),
}
