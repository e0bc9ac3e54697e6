//! 値オブジェクト定義
//!
//! ドメイン層の識別子と投票値をラップし、境界でのバリデーションを行います。
//! 文字列をそのまま引き回さず、`new() -> Result` で検証済みの値のみを
//! ドメイン層に流します。

use uuid::Uuid;

use super::error::ValueObjectError;

/// Room の識別子
///
/// URL やクエリパラメータ経由で与えられる安定キー。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomId(String);

impl RoomId {
    const MAX_LENGTH: usize = 64;

    /// 新しい RoomId を作成（空文字・長さ超過は拒否）
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::Empty("RoomId"));
        }
        if value.chars().count() > Self::MAX_LENGTH {
            return Err(ValueObjectError::TooLong("RoomId", Self::MAX_LENGTH));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// クライアント識別子
///
/// 再接続やリロードをまたいで安定なトークン。接続ハンドル
/// （[`ConnectionId`]）とは別物で、参加者の所有者判定に使われます。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientId(String);

impl ClientId {
    const MAX_LENGTH: usize = 128;

    /// 新しい ClientId を作成（空文字・長さ超過は拒否）
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::Empty("ClientId"));
        }
        if value.chars().count() > Self::MAX_LENGTH {
            return Err(ValueObjectError::TooLong("ClientId", Self::MAX_LENGTH));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ClientId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// 参加者の識別子
///
/// クライアント側で採番される、サーバーにとっては不透明な ID。
/// Room 内で一意であることはエンティティ側で保証されます。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParticipantId(String);

impl ParticipantId {
    const MAX_LENGTH: usize = 128;

    /// 新しい ParticipantId を作成（空文字・長さ超過は拒否）
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::Empty("ParticipantId"));
        }
        if value.chars().count() > Self::MAX_LENGTH {
            return Err(ValueObjectError::TooLong("ParticipantId", Self::MAX_LENGTH));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ParticipantId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// 投票値
///
/// カードデッキに限定しない自由形式の文字列。数値として解釈できるかは
/// 集計側（クライアント）の関心事であり、サーバーは長さのみ検証します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteValue(String);

impl VoteValue {
    const MAX_LENGTH: usize = 16;

    /// 新しい VoteValue を作成（空文字・長さ超過は拒否）
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::Empty("VoteValue"));
        }
        if value.chars().count() > Self::MAX_LENGTH {
            return Err(ValueObjectError::TooLong("VoteValue", Self::MAX_LENGTH));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for VoteValue {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// 接続ハンドルの識別子
///
/// WebSocket 接続ごとにサーバーが採番する一時的な ID。ClientId と違い、
/// 再接続すると新しい値になります。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// 新しい ConnectionId を採番（UUID v4）
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
