//! WebSocket connection handlers.
//!
//! Each connection runs a small state machine: it starts unjoined, binds to
//! a room on the first `join` message, dispatches domain events to the use
//! cases while joined, and runs disconnect cleanup when the socket closes.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::{Mutex, mpsc};

use crate::{
    domain::{ClientId, ConnectionId, Participant, ParticipantId, RoomId, VoteValue},
    infrastructure::dto::websocket::{ClientMessage, ServerMessage},
    ui::state::AppState,
};

/// この接続が join している Room とクライアント識別子
///
/// ClientId は接続ハンドル（ConnectionId）と異なり再接続をまたいで安定で、
/// 切断時に所有参加者を片付けるために使われる。
#[derive(Debug, Clone)]
struct RoomBinding {
    room_id: RoomId,
    client_id: ClientId,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let connection_id = ConnectionId::generate();
    tracing::info!("New connection '{}'", connection_id.as_str());
    ws.on_upgrade(move |socket| handle_socket(socket, state, connection_id))
}

/// Spawns a task that receives messages from the rx channel and pushes them
/// to the WebSocket sender.
///
/// This function handles the outbound message flow: room events fanned out
/// by the use cases (via rx channel) are written to this connection's
/// WebSocket. Channel sends never block, so a slow socket only ever backs
/// up its own queue.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            // Send the message to this client
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, connection_id: ConnectionId) {
    let (sender, mut receiver) = socket.split();

    // Create a channel for this connection to receive room events
    let (tx, rx) = mpsc::unbounded_channel();

    // The room binding is established inside the recv task (on `join`) but
    // must outlive it: the recv task can be aborted, and the cleanup below
    // still needs to know which room to leave.
    let binding: Arc<Mutex<Option<RoomBinding>>> = Arc::new(Mutex::new(None));

    // Spawn a task to receive room events and send them to this connection
    let mut send_task = pusher_loop(rx, sender);

    // Spawn a task to receive messages from this connection
    let state_clone = state.clone();
    let binding_clone = binding.clone();
    let connection_id_clone = connection_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    handle_text_frame(
                        &state_clone,
                        &binding_clone,
                        &connection_id_clone,
                        &tx,
                        &text,
                    )
                    .await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!(
                        "Connection '{}' requested close",
                        connection_id_clone.as_str()
                    );
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Terminal state: leave the room and clean up owned participants
    let bound = binding.lock().await.take();
    if let Some(bound) = bound {
        run_disconnect_cleanup(&state, &bound, &connection_id).await;
    }
    tracing::info!("Connection '{}' closed", connection_id.as_str());
}

/// Parse one text frame and act on it.
///
/// Malformed payloads are logged and ignored; they never close the
/// connection or corrupt room state.
async fn handle_text_frame(
    state: &Arc<AppState>,
    binding: &Arc<Mutex<Option<RoomBinding>>>,
    connection_id: &ConnectionId,
    tx: &mpsc::UnboundedSender<String>,
    text: &str,
) {
    let msg = match serde_json::from_str::<ClientMessage>(text) {
        Ok(msg) => msg,
        Err(e) => {
            tracing::warn!("Failed to parse message as JSON: {}", e);
            return;
        }
    };

    match msg {
        ClientMessage::Join { room_id, client_id } => {
            handle_join(state, binding, connection_id, tx, room_id, client_id).await;
        }
        domain_event => {
            let bound = binding.lock().await.clone();
            let Some(bound) = bound else {
                tracing::warn!(
                    "Ignoring event from connection '{}' before join",
                    connection_id.as_str()
                );
                return;
            };
            dispatch_domain_event(state, &bound, connection_id, domain_event).await;
        }
    }
}

/// Bind the connection to a room and reply with a full roomState snapshot.
///
/// A `join` on an already-joined connection switches rooms: the connection
/// leaves its previous room with full disconnect semantics first.
async fn handle_join(
    state: &Arc<AppState>,
    binding: &Arc<Mutex<Option<RoomBinding>>>,
    connection_id: &ConnectionId,
    tx: &mpsc::UnboundedSender<String>,
    room_id: String,
    client_id: String,
) {
    let room_id = match RoomId::new(room_id) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Invalid roomId in join: {}", e);
            return;
        }
    };
    let client_id = match ClientId::new(client_id) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Invalid clientId in join: {}", e);
            return;
        }
    };

    // A connection belongs to exactly one room at a time
    let previous = binding.lock().await.take();
    if let Some(previous) = previous {
        tracing::info!(
            "Connection '{}' leaving room '{}' to rejoin",
            connection_id.as_str(),
            previous.room_id.as_str()
        );
        run_disconnect_cleanup(state, &previous, connection_id).await;
    }

    let room = state
        .join_room_usecase
        .execute(room_id.clone(), connection_id.clone(), tx.clone())
        .await;

    // Bind before pushing the snapshot so a dying connection still runs
    // the terminal cleanup for this room
    *binding.lock().await = Some(RoomBinding {
        room_id: room_id.clone(),
        client_id: client_id.clone(),
    });

    // Send the current room state to the joining connection only
    let room_state = ServerMessage::RoomState { room: room.into() };
    let room_state_json = serde_json::to_string(&room_state).unwrap();
    if let Err(e) = state
        .join_room_usecase
        .push_room_state(&room_id, connection_id, &room_state_json)
        .await
    {
        tracing::error!(
            "Failed to send roomState to connection '{}': {}",
            connection_id.as_str(),
            e
        );
        return;
    }

    tracing::info!(
        "Client '{}' joined room '{}' on connection '{}'",
        client_id.as_str(),
        room_id.as_str(),
        connection_id.as_str()
    );
}

/// Apply a domain event to the bound room and fan out the notification.
async fn dispatch_domain_event(
    state: &Arc<AppState>,
    bound: &RoomBinding,
    connection_id: &ConnectionId,
    msg: ClientMessage,
) {
    match msg {
        ClientMessage::AddParticipant { participant } => {
            let participant = match Participant::try_from(participant) {
                Ok(p) => p,
                Err(e) => {
                    tracing::warn!("Invalid participant payload: {}", e);
                    return;
                }
            };
            let echo = ServerMessage::ParticipantAdded {
                participant: participant.clone().into(),
            };
            let echo_json = serde_json::to_string(&echo).unwrap();
            if let Err(e) = state
                .add_participant_usecase
                .execute(&bound.room_id, participant, &echo_json)
                .await
            {
                tracing::warn!("Ignoring addParticipant: {}", e);
            }
        }
        ClientMessage::RemoveParticipant { participant_id } => {
            let participant_id = match ParticipantId::new(participant_id) {
                Ok(id) => id,
                Err(e) => {
                    tracing::warn!("Invalid participantId in removeParticipant: {}", e);
                    return;
                }
            };
            let removed_msg = ServerMessage::ParticipantRemoved {
                participant_id: participant_id.as_str().to_string(),
            };
            let removed_json = serde_json::to_string(&removed_msg).unwrap();
            if !state
                .remove_participant_usecase
                .execute(&bound.room_id, &participant_id, &removed_json)
                .await
            {
                tracing::debug!(
                    "removeParticipant for unknown participant '{}' ignored",
                    participant_id.as_str()
                );
            }
        }
        ClientMessage::Vote {
            participant_id,
            vote,
        } => {
            let participant_id = match ParticipantId::new(participant_id) {
                Ok(id) => id,
                Err(e) => {
                    tracing::warn!("Invalid participantId in vote: {}", e);
                    return;
                }
            };
            let vote = match VoteValue::new(vote) {
                Ok(v) => v,
                Err(e) => {
                    tracing::warn!("Invalid vote value: {}", e);
                    return;
                }
            };
            let vote_msg = ServerMessage::VoteUpdated {
                participant_id: participant_id.as_str().to_string(),
                vote: vote.as_str().to_string(),
                has_voted: true,
            };
            let vote_json = serde_json::to_string(&vote_msg).unwrap();
            if !state
                .cast_vote_usecase
                .execute(&bound.room_id, &participant_id, vote, &vote_json)
                .await
            {
                tracing::debug!(
                    "vote for unknown participant '{}' ignored",
                    participant_id.as_str()
                );
            }
        }
        ClientMessage::UpdateTask { task } => {
            let task_msg = ServerMessage::TaskUpdated { task: task.clone() };
            let task_json = serde_json::to_string(&task_msg).unwrap();
            state
                .update_task_usecase
                .execute(&bound.room_id, task, &task_json, connection_id.clone())
                .await;
        }
        ClientMessage::RevealVotes { revealed } => {
            let reveal_msg = ServerMessage::VotesRevealed { revealed };
            let reveal_json = serde_json::to_string(&reveal_msg).unwrap();
            state
                .reveal_votes_usecase
                .execute(&bound.room_id, revealed, &reveal_json, connection_id.clone())
                .await;
        }
        ClientMessage::ResetVotes => {
            let reset_json = serde_json::to_string(&ServerMessage::VotesReset).unwrap();
            state
                .reset_votes_usecase
                .execute(&bound.room_id, &reset_json)
                .await;
        }
        ClientMessage::Unrecognized => {
            // Forward compatibility: unknown event kinds are not an error
            tracing::debug!("Ignoring unrecognized message type");
        }
        ClientMessage::Join { .. } => {
            // Handled by the caller before dispatch
        }
    }
}

/// Terminal-state cleanup: unsubscribe, drop owned participants (one
/// participantRemoved broadcast each), and delete the room if it is now
/// empty.
async fn run_disconnect_cleanup(
    state: &Arc<AppState>,
    bound: &RoomBinding,
    connection_id: &ConnectionId,
) {
    let removed = state
        .disconnect_session_usecase
        .execute(&bound.room_id, &bound.client_id, connection_id)
        .await;

    for participant_id in removed {
        let removed_msg = ServerMessage::ParticipantRemoved {
            participant_id: participant_id.into_string(),
        };
        let removed_json = serde_json::to_string(&removed_msg).unwrap();
        if let Err(e) = state
            .disconnect_session_usecase
            .broadcast_participant_removed(&bound.room_id, &removed_json)
            .await
        {
            tracing::warn!("Failed to broadcast participantRemoved: {}", e);
        }
    }

    state
        .disconnect_session_usecase
        .remove_room_if_empty(&bound.room_id)
        .await;
}
