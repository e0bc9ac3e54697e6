//! Infrastructure 層
//!
//! ドメイン層が定義するインターフェースの具体的な実装（インメモリの
//! RoomRegistry、WebSocket の MessagePusher）と、プロトコル境界の DTO を
//! 提供します。

pub mod dto;
pub mod message_pusher;
pub mod registry;
