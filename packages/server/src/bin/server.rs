//! Planning poker room server.
//!
//! Maintains authoritative room state and fans out state-changing events to
//! all connected viewers of each room over WebSocket.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin mitsumori-server
//! cargo run --bin mitsumori-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;

use mitsumori_server::{
    infrastructure::{message_pusher::WebSocketMessagePusher, registry::InMemoryRoomRegistry},
    ui::Server,
    usecase::{
        AddParticipantUseCase, CastVoteUseCase, DisconnectSessionUseCase, GetRoomDetailUseCase,
        GetRoomsUseCase, JoinRoomUseCase, RemoveParticipantUseCase, ResetVotesUseCase,
        RevealVotesUseCase, UpdateTaskUseCase,
    },
};
use mitsumori_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "mitsumori-server")]
#[command(about = "Planning poker room server with WebSocket fan-out", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Registry
    // 2. MessagePusher
    // 3. UseCases
    // 4. Server

    // 1. Create Registry (in-memory, rooms are created lazily on join)
    let registry = Arc::new(InMemoryRoomRegistry::new());

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. Create UseCases
    let join_room_usecase = Arc::new(JoinRoomUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let add_participant_usecase = Arc::new(AddParticipantUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let remove_participant_usecase = Arc::new(RemoveParticipantUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let cast_vote_usecase = Arc::new(CastVoteUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let update_task_usecase = Arc::new(UpdateTaskUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let reveal_votes_usecase = Arc::new(RevealVotesUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let reset_votes_usecase = Arc::new(ResetVotesUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let disconnect_session_usecase = Arc::new(DisconnectSessionUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let get_rooms_usecase = Arc::new(GetRoomsUseCase::new(registry.clone()));
    let get_room_detail_usecase = Arc::new(GetRoomDetailUseCase::new(registry.clone()));

    // 4. Create and run the server
    let server = Server::new(
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
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
