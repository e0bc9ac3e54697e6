//! Vote result computation.
//!
//! Results are derived from the current participant list, never stored.
//! Only votes that parse as numbers contribute; special cards (`?`, `☕`)
//! count toward participation but are excluded from mean, median, and
//! consensus.

use mitsumori_server::infrastructure::dto::websocket::ParticipantDto;

/// Derived vote statistics.
///
/// All fields are `None` when no numeric votes are present.
#[derive(Debug, Clone, PartialEq)]
pub struct VoteResults {
    /// Arithmetic average, rounded to one decimal place
    pub mean: Option<f64>,
    /// Middle element (average of the two central elements for even counts)
    pub median: Option<f64>,
    /// True iff all numeric votes are equal
    pub consensus: Option<bool>,
}

impl VoteResults {
    fn empty() -> Self {
        Self {
            mean: None,
            median: None,
            consensus: None,
        }
    }
}

/// Compute mean/median/consensus from the current participant list.
pub fn compute_results(participants: &[ParticipantDto]) -> VoteResults {
    let mut votes: Vec<f64> = participants
        .iter()
        .filter(|p| p.has_voted)
        .filter_map(|p| p.vote.as_deref())
        .filter_map(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .collect();

    if votes.is_empty() {
        return VoteResults::empty();
    }

    votes.sort_by(|a, b| a.total_cmp(b));

    let mean = votes.iter().sum::<f64>() / votes.len() as f64;
    let mean = (mean * 10.0).round() / 10.0;

    let mid = votes.len() / 2;
    let median = if votes.len() % 2 == 0 {
        (votes[mid - 1] + votes[mid]) / 2.0
    } else {
        votes[mid]
    };

    // sorted: all equal iff first == last
    let consensus = votes[0] == votes[votes.len() - 1];

    VoteResults {
        mean: Some(mean),
        median: Some(median),
        consensus: Some(consensus),
    }
}
