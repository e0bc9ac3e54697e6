//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    infrastructure::dto::http::{HealthDto, RoomSummaryDto},
    ui::state::AppState,
    usecase::GetRoomDetailError,
};
use mitsumori_shared::time::{get_jst_timestamp, timestamp_to_jst_rfc3339};

/// Health check endpoint reporting the active room count
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
        rooms: state.get_rooms_usecase.room_count().await,
        timestamp: timestamp_to_jst_rfc3339(get_jst_timestamp()),
    })
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.get_rooms_usecase.execute().await;

    // Domain Model から DTO への変換
    let room_summaries: Vec<RoomSummaryDto> = rooms.iter().map(Into::into).collect();

    Json(room_summaries)
}

/// Get room summary by ID (read-only)
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomSummaryDto>, StatusCode> {
    match state.get_room_detail_usecase.execute(room_id).await {
        Ok(room) => Ok(Json((&room).into())),
        Err(GetRoomDetailError::RoomNotFound) => Err(StatusCode::NOT_FOUND),
    }
}
