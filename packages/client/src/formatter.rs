//! Message formatting utilities for client display.

use mitsumori_server::infrastructure::dto::websocket::ParticipantDto;
use mitsumori_shared::cards::CARD_VALUES;

use crate::{mirror::RoomMirror, results::VoteResults};

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the full room view shown after a roomState snapshot
    /// or on `/who`.
    pub fn format_room(mirror: &RoomMirror) -> String {
        let mut output = String::new();
        output.push_str("\n\n============================================================\n");
        if mirror.task.is_empty() {
            output.push_str("Task: (not set)\n");
        } else {
            output.push_str(&format!("Task: {}\n", mirror.task));
        }
        output.push_str(&format!(
            "Votes: {}\n",
            if mirror.votes_revealed {
                "revealed"
            } else {
                "hidden"
            }
        ));
        output.push_str("Participants:\n");

        if mirror.participants.is_empty() {
            output.push_str("(No participants)\n");
        } else {
            for participant in &mirror.participants {
                output.push_str(&Self::format_participant_line(participant, mirror));
            }
        }

        output.push_str("============================================================\n");
        output
    }

    fn format_participant_line(participant: &ParticipantDto, mirror: &RoomMirror) -> String {
        let is_me = mirror.my_participant_id.as_deref() == Some(participant.id.as_str());
        let me_suffix = if is_me { " (me)" } else { "" };
        let status = Self::vote_status(participant, mirror.votes_revealed, is_me);
        format!("{}{} - {}\n", participant.name, me_suffix, status)
    }

    /// One participant's vote status, masked unless revealed.
    ///
    /// Our own vote is always visible to us; other participants' votes
    /// stay masked until the room-wide reveal.
    fn vote_status(participant: &ParticipantDto, revealed: bool, is_me: bool) -> String {
        if !participant.has_voted {
            return "thinking...".to_string();
        }
        if revealed || is_me {
            match &participant.vote {
                Some(vote) => format!("voted {}", vote),
                None => "voted".to_string(),
            }
        } else {
            "voted ✓".to_string()
        }
    }

    /// Format a participant-added notification
    pub fn format_participant_added(participant: &ParticipantDto, is_me: bool) -> String {
        if is_me {
            format!("\n+ You joined the table as '{}'\n", participant.name)
        } else {
            format!("\n+ {} joined the table\n", participant.name)
        }
    }

    /// Format a participant-removed notification
    pub fn format_participant_removed(name: &str) -> String {
        format!("\n- {} left the table\n", name)
    }

    /// Format a vote-updated notification
    pub fn format_vote_updated(name: &str, vote: &str, revealed: bool) -> String {
        if revealed {
            format!("\n* {} voted {}\n", name, vote)
        } else {
            format!("\n* {} voted\n", name)
        }
    }

    /// Format a task-updated notification
    pub fn format_task_updated(task: &str) -> String {
        format!("\n* Task updated: {}\n", task)
    }

    /// Format a votes-revealed / votes-hidden notification
    pub fn format_votes_revealed(revealed: bool) -> String {
        if revealed {
            "\n* Votes are revealed\n".to_string()
        } else {
            "\n* Votes are hidden again\n".to_string()
        }
    }

    /// Format a votes-reset notification
    pub fn format_votes_reset() -> String {
        "\n* New round: all votes cleared\n".to_string()
    }

    /// Format the card deck for `/cards`
    pub fn format_deck() -> String {
        format!("\nCards: {}\n", CARD_VALUES.join(" "))
    }

    /// Format computed results for `/results`
    pub fn format_results(results: &VoteResults) -> String {
        let mut output = String::new();
        output.push_str("\nResults:\n");
        match (&results.mean, &results.median, &results.consensus) {
            (Some(mean), Some(median), Some(consensus)) => {
                output.push_str(&format!("  mean:      {:.1}\n", mean));
                output.push_str(&format!("  median:    {}\n", median));
                output.push_str(&format!(
                    "  consensus: {}\n",
                    if *consensus { "yes ✓" } else { "no" }
                ));
            }
            _ => {
                output.push_str("  (no numeric votes yet)\n");
            }
        }
        output
    }

    /// Format a raw message that could not be decoded
    pub fn format_raw_message(text: &str) -> String {
        format!("\n(unrecognized message) {}\n", text)
    }
}
