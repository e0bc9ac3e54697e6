//! WebSocket wire protocol messages.
//!
//! One self-contained JSON message per text frame, tagged by a `type`
//! field with camelCase keys. Both directions decode unknown tags into an
//! explicit `Unrecognized` variant so the protocol stays forward-compatible
//! with future event kinds.

use serde::{Deserialize, Serialize};

/// Wire representation of a participant.
///
/// Inbound `addParticipant` payloads may carry `vote`/`hasVoted`; they are
/// accepted syntactically and discarded on conversion to the domain model
/// (votes only ever arrive through explicit `vote` events).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub vote: Option<String>,
    #[serde(default)]
    pub has_voted: bool,
    pub client_id: String,
}

/// Full room snapshot, sent only to a joining connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomStateDto {
    pub participants: Vec<ParticipantDto>,
    pub task: String,
    pub votes_revealed: bool,
}

/// Messages sent from client to server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// Bind this connection to a room (first message of every session)
    Join { room_id: String, client_id: String },
    /// Add a participant to the bound room
    AddParticipant { participant: ParticipantDto },
    /// Remove a participant by id
    RemoveParticipant { participant_id: String },
    /// Cast or change a vote
    Vote { participant_id: String, vote: String },
    /// Replace the room's task description
    UpdateTask { task: String },
    /// Show or hide everyone's votes
    RevealVotes { revealed: bool },
    /// Clear all votes and hide them again
    ResetVotes,
    /// Unknown `type` tag; ignored by the session handler
    #[serde(other)]
    Unrecognized,
}

/// Messages sent from server to client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// Full snapshot, sent only to the joining connection
    RoomState { room: RoomStateDto },
    /// Broadcast to all subscribers (sender included)
    ParticipantAdded { participant: ParticipantDto },
    /// Broadcast to all subscribers
    ParticipantRemoved { participant_id: String },
    /// Broadcast to all subscribers
    VoteUpdated {
        participant_id: String,
        vote: String,
        has_voted: bool,
    },
    /// Broadcast to all subscribers except the sender
    TaskUpdated { task: String },
    /// Broadcast to all subscribers except the sender
    VotesRevealed { revealed: bool },
    /// Broadcast to all subscribers (sender included)
    VotesReset,
    /// Unknown `type` tag; ignored by the client mirror
    #[serde(other)]
    Unrecognized,
}
