//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::usecase::{
    AddParticipantUseCase, CastVoteUseCase, DisconnectSessionUseCase, GetRoomDetailUseCase,
    GetRoomsUseCase, JoinRoomUseCase, RemoveParticipantUseCase, ResetVotesUseCase,
    RevealVotesUseCase, UpdateTaskUseCase,
};

use super::{
    handler::{get_room_detail, get_rooms, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Planning poker room server
///
/// This struct encapsulates the server configuration and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     join_room_usecase,
///     add_participant_usecase,
///     // ...
/// );
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// JoinRoomUseCase（Room join のユースケース）
    join_room_usecase: Arc<JoinRoomUseCase>,
    /// AddParticipantUseCase（参加者追加のユースケース）
    add_participant_usecase: Arc<AddParticipantUseCase>,
    /// RemoveParticipantUseCase（参加者削除のユースケース）
    remove_participant_usecase: Arc<RemoveParticipantUseCase>,
    /// CastVoteUseCase（投票のユースケース）
    cast_vote_usecase: Arc<CastVoteUseCase>,
    /// UpdateTaskUseCase（タスク説明更新のユースケース）
    update_task_usecase: Arc<UpdateTaskUseCase>,
    /// RevealVotesUseCase（投票公開のユースケース）
    reveal_votes_usecase: Arc<RevealVotesUseCase>,
    /// ResetVotesUseCase（投票リセットのユースケース）
    reset_votes_usecase: Arc<ResetVotesUseCase>,
    /// DisconnectSessionUseCase（切断クリーンアップのユースケース）
    disconnect_session_usecase: Arc<DisconnectSessionUseCase>,
    /// GetRoomsUseCase（Room 一覧取得のユースケース）
    get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（Room 詳細取得のユースケース）
    get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
}

impl Server {
    /// Create a new Server instance
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        join_room_usecase: Arc<JoinRoomUseCase>,
        add_participant_usecase: Arc<AddParticipantUseCase>,
        remove_participant_usecase: Arc<RemoveParticipantUseCase>,
        cast_vote_usecase: Arc<CastVoteUseCase>,
        update_task_usecase: Arc<UpdateTaskUseCase>,
        reveal_votes_usecase: Arc<RevealVotesUseCase>,
        reset_votes_usecase: Arc<ResetVotesUseCase>,
        disconnect_session_usecase: Arc<DisconnectSessionUseCase>,
        get_rooms_usecase: Arc<GetRoomsUseCase>,
        get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    ) -> Self {
        Self {
            join_room_usecase,
            add_participant_usecase,
            remove_participant_usecase,
            cast_vote_usecase,
            update_task_usecase,
            reveal_votes_usecase,
            reset_votes_usecase,
            disconnect_session_usecase,
            get_rooms_usecase,
            get_room_detail_usecase,
        }
    }

    /// Run the planning poker room server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app_state = Arc::new(AppState {
            join_room_usecase: self.join_room_usecase,
            add_participant_usecase: self.add_participant_usecase,
            remove_participant_usecase: self.remove_participant_usecase,
            cast_vote_usecase: self.cast_vote_usecase,
            update_task_usecase: self.update_task_usecase,
            reveal_votes_usecase: self.reveal_votes_usecase,
            reset_votes_usecase: self.reset_votes_usecase,
            disconnect_session_usecase: self.disconnect_session_usecase,
            get_rooms_usecase: self.get_rooms_usecase,
            get_room_detail_usecase: self.get_room_detail_usecase,
        });

        // Define handlers
        let app = Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{room_id}", get(get_room_detail))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!(
            "Planning poker room server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
