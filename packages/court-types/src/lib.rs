//! # court-types
//!
//! Shared records for the Court Suite match scheduler.
//!
//! These types are used by:
//! - `scheduler-core`: ranking waiting matches and generating box rotations
//! - `court-simulator`: driving a simulated tournament day and snapshot queries
//! - upstream storage: records are serialized `camelCase`, matching the JSON
//!   documents the tournament app keeps for matches, courts and divisions
//!
//! ## Ownership
//!
//! The scheduler never mutates a `Match` or a `Court`. Callers load them,
//! pass them in, and apply the returned decisions themselves.

use serde::{Deserialize, Serialize};

// ── Match Status ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    NotStarted,
    Waiting,
    InProgress,
    Completed,
    Pending,
    /// Any status string the store holds that the scheduler does not know.
    #[serde(other)]
    Other,
}

impl MatchStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Completed or currently on a court. Used for the played-match tally.
    pub fn has_been_played(&self) -> bool {
        matches!(self, Self::Completed | Self::InProgress)
    }
}

// ── Match ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: String,
    pub division_id: String,
    /// 1 = earliest round
    pub round_number: u32,
    /// Free-text label, e.g. "Main Bracket", "Pool", "Bronze", "Plate"
    #[serde(default)]
    pub stage: String,
    pub status: MatchStatus,
    #[serde(rename = "teamAId")]
    pub team_a_id: String,
    #[serde(rename = "teamBId")]
    pub team_b_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub court: Option<String>,
}

// ── Court ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Court {
    /// Assignment key. Courts have no synthetic id.
    pub name: String,
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_match_id: Option<String>,
}

impl Court {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
            current_match_id: None,
        }
    }

    /// Active and not hosting a match.
    pub fn is_free(&self) -> bool {
        self.active && self.current_match_id.is_none()
    }
}

// ── Division ──────────────────────────────────────────────────────────────────

/// Position in the caller's divisions array is the fairness tie-break, so the
/// array must be ordered the same way on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Division {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Division {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), name: None }
    }
}

// ── Queue Projection ──────────────────────────────────────────────────────────

/// Lightweight projection of a `Match`, recomputed on every scheduler call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueMatch {
    pub id: String,
    pub division_id: String,
    pub round_number: u32,
    pub stage: String,
    #[serde(rename = "teamAId")]
    pub team_a_id: String,
    #[serde(rename = "teamBId")]
    pub team_b_id: String,
    pub status: MatchStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub court: Option<String>,
}

impl From<&Match> for QueueMatch {
    fn from(m: &Match) -> Self {
        Self {
            id: m.id.clone(),
            division_id: m.division_id.clone(),
            round_number: m.round_number,
            stage: m.stage.clone(),
            team_a_id: m.team_a_id.clone(),
            team_b_id: m.team_b_id.clone(),
            status: m.status,
            court: m.court.clone(),
        }
    }
}

/// A decision to put `match_id` on `court_name`. The caller applies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourtAssignment {
    pub match_id: String,
    pub court_name: String,
}

// ── Box League ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
}

impl Player {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

/// One round of a box rotation with player indices resolved to players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPairing {
    /// 1-based
    pub round_number: u32,
    pub team_a: [Player; 2],
    pub team_b: [Player; 2],
    /// Players sitting out this round. Empty for 4-player boxes.
    #[serde(default)]
    pub bye_player_ids: Vec<String>,
}
