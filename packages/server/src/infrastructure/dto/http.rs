//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Response of `GET /api/health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
    /// Number of currently active rooms
    pub rooms: usize,
    /// RFC 3339 timestamp (JST)
    pub timestamp: String,
}

/// Response element of `GET /api/rooms` and response of
/// `GET /api/rooms/{room_id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub id: String,
    pub participant_count: usize,
    pub task: String,
    pub votes_revealed: bool,
}
