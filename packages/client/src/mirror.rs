//! Local room mirror (reconciliation engine).
//!
//! Keeps the viewing side's copy of `{participants, task, votesRevealed}`
//! and applies server-pushed events to it. Application is idempotent where
//! duplicate delivery is possible (`participantAdded` after a
//! reconnect-triggered resync), and a full `roomState` snapshot always
//! replaces the mirror wholesale instead of merging.

use mitsumori_server::infrastructure::dto::websocket::{
    ParticipantDto, RoomStateDto, ServerMessage,
};

/// Local mirror of one room's state.
#[derive(Debug, Clone)]
pub struct RoomMirror {
    /// Participants in insertion order, as last seen from the server
    pub participants: Vec<ParticipantDto>,
    /// Task description
    pub task: String,
    /// Whether votes are currently revealed
    pub votes_revealed: bool,
    /// Participant id of the entry owned by this client, if any
    pub my_participant_id: Option<String>,
    /// Our durable client identity, used to recognize "me"
    client_id: String,
}

impl RoomMirror {
    /// Create an empty mirror for the given client identity.
    pub fn new(client_id: String) -> Self {
        Self {
            participants: Vec::new(),
            task: String::new(),
            votes_revealed: false,
            my_participant_id: None,
            client_id,
        }
    }

    /// Apply one server-pushed event to the mirror.
    pub fn apply(&mut self, message: &ServerMessage) {
        match message {
            ServerMessage::RoomState { room } => self.replace_with(room),
            ServerMessage::ParticipantAdded { participant } => {
                // Idempotent: a participant we already hold is a duplicate
                // delivery, not new information
                if self.find_participant(&participant.id).is_some() {
                    return;
                }
                if participant.client_id == self.client_id {
                    self.my_participant_id = Some(participant.id.clone());
                }
                self.participants.push(participant.clone());
            }
            ServerMessage::ParticipantRemoved { participant_id } => {
                self.participants.retain(|p| &p.id != participant_id);
                if self.my_participant_id.as_ref() == Some(participant_id) {
                    self.my_participant_id = None;
                }
            }
            ServerMessage::VoteUpdated {
                participant_id,
                vote,
                has_voted,
            } => {
                // Last-write-wins, no-op for unknown ids
                if let Some(participant) = self
                    .participants
                    .iter_mut()
                    .find(|p| &p.id == participant_id)
                {
                    participant.vote = Some(vote.clone());
                    participant.has_voted = *has_voted;
                }
            }
            ServerMessage::TaskUpdated { task } => {
                self.task = task.clone();
            }
            ServerMessage::VotesRevealed { revealed } => {
                self.votes_revealed = *revealed;
            }
            ServerMessage::VotesReset => {
                for participant in &mut self.participants {
                    participant.vote = None;
                    participant.has_voted = false;
                }
                self.votes_revealed = false;
            }
            ServerMessage::Unrecognized => {
                // Forward compatibility: unknown event kinds are ignored
            }
        }
    }

    /// Replace the mirror wholesale with a fresh snapshot.
    fn replace_with(&mut self, snapshot: &RoomStateDto) {
        self.participants = snapshot.participants.clone();
        self.task = snapshot.task.clone();
        self.votes_revealed = snapshot.votes_revealed;
        self.my_participant_id = self
            .participants
            .iter()
            .find(|p| p.client_id == self.client_id)
            .map(|p| p.id.clone());
    }

    /// Look up a participant by id.
    pub fn find_participant(&self, participant_id: &str) -> Option<&ParticipantDto> {
        self.participants.iter().find(|p| p.id == participant_id)
    }

    /// The participant entry owned by this client, if present.
    pub fn my_participant(&self) -> Option<&ParticipantDto> {
        self.my_participant_id
            .as_deref()
            .and_then(|id| self.find_participant(id))
    }

    /// Our durable client identity.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}
