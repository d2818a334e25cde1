//! Priority scoring for waiting matches.
//!
//! Two independent policies, never blended:
//!
//! - **Round-balanced** (lower score first):
//!   `roundPriority * 100 + divisionIndex * 10 + roundNumber`, where
//!   `roundPriority` is 0 when the match is in its division's active round
//!   (lowest round with anything not completed) and 1 otherwise.
//! - **Stage-weighted** (higher score first):
//!   `stageWeight + (100 - roundNumber * 10) + (50 - (playedA + playedB))`.
//!
//! Both sorts are stable, so equal scores keep the caller's input order.

use std::collections::HashMap;

use court_types::{Division, Match};

use tracing::warn;

use crate::error::QueueError;

/// Estimated length of one match on court, in minutes.
pub const MATCH_MINUTES: u32 = 15;

/// Lowest round per division among matches that are not completed.
pub fn active_rounds(matches: &[Match]) -> HashMap<&str, u32> {
    let mut active: HashMap<&str, u32> = HashMap::new();
    for m in matches.iter().filter(|m| !m.status.is_completed()) {
        active
            .entry(m.division_id.as_str())
            .and_modify(|r| *r = (*r).min(m.round_number))
            .or_insert(m.round_number);
    }
    active
}

/// Completed + in-progress matches per team id. Empty ids are skipped.
pub fn played_counts(matches: &[Match]) -> HashMap<&str, i64> {
    let mut played: HashMap<&str, i64> = HashMap::new();
    for m in matches.iter().filter(|m| m.status.has_been_played()) {
        for team in [m.team_a_id.as_str(), m.team_b_id.as_str()] {
            if !team.is_empty() {
                *played.entry(team).or_insert(0) += 1;
            }
        }
    }
    played
}

/// Fixed precedence: Main Bracket > Pool > Bronze > Plate > anything else.
pub fn stage_weight(stage: &str) -> i64 {
    match stage.trim().to_ascii_lowercase().as_str() {
        "main bracket" | "main" => 1000,
        "pool" | "pool play" => 800,
        "bronze" => 600,
        "plate" => 400,
        _ => 0,
    }
}

fn check_round(m: &Match) -> Result<(), QueueError> {
    if m.round_number == 0 {
        return Err(QueueError::InvalidRound { match_id: m.id.clone() });
    }
    Ok(())
}

/// Orders `waiting` by round-balanced score. `all` is the full snapshot used
/// to find each division's active round. A division missing from `divisions`
/// takes the index just past the last listed one.
pub fn round_balanced_order<'a>(
    all: &[Match],
    waiting: &[&'a Match],
    divisions: &[Division],
) -> Result<Vec<&'a Match>, QueueError> {
    let active = active_rounds(all);

    // First occurrence wins if the caller repeats a division id.
    let mut division_index: HashMap<&str, u64> = HashMap::new();
    for (i, d) in divisions.iter().enumerate() {
        division_index.entry(d.id.as_str()).or_insert(i as u64);
    }

    let mut scored = Vec::with_capacity(waiting.len());
    for &m in waiting {
        check_round(m)?;
        let index = match division_index.get(m.division_id.as_str()) {
            Some(&i) => i,
            None => {
                warn!(
                    match_id = %m.id,
                    division_id = %m.division_id,
                    "division not in divisions list, ranking after listed divisions"
                );
                divisions.len() as u64
            }
        };
        let round_priority: u64 = match active.get(m.division_id.as_str()) {
            Some(&r) if r == m.round_number => 0,
            _ => 1,
        };
        let score = round_priority * 100 + index * 10 + u64::from(m.round_number);
        scored.push((score, m));
    }

    scored.sort_by_key(|(score, _)| *score);
    Ok(scored.into_iter().map(|(_, m)| m).collect())
}

/// Orders `waiting` by stage-weighted score, highest first.
pub fn stage_weighted_order<'a>(
    all: &[Match],
    waiting: &[&'a Match],
) -> Result<Vec<&'a Match>, QueueError> {
    let played = played_counts(all);
    let played_by = |team: &str| played.get(team).copied().unwrap_or(0);

    let mut scored = Vec::with_capacity(waiting.len());
    for &m in waiting {
        check_round(m)?;
        let recency = 100 - i64::from(m.round_number) * 10;
        let fairness = 50 - (played_by(&m.team_a_id) + played_by(&m.team_b_id));
        scored.push((stage_weight(&m.stage) + recency + fairness, m));
    }

    scored.sort_by(|a, b| b.0.cmp(&a.0));
    Ok(scored.into_iter().map(|(_, m)| m).collect())
}

/// `(floor(index / activeCourts) + 1) * MATCH_MINUTES`, with at least one court.
pub fn wait_minutes(queue_index: usize, active_courts: usize) -> u32 {
    let waves = queue_index / active_courts.max(1) + 1;
    waves as u32 * MATCH_MINUTES
}
