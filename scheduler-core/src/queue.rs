use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use court_types::{Court, Division, Match, MatchStatus, QueueMatch};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::QueueError;
use crate::priority;

// ── Strategy ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueueStrategy {
    /// No division starts round N+1 while round N is outstanding; divisions
    /// take turns by their position in the divisions list.
    #[default]
    RoundBalanced,
    /// Stage precedence, then earlier rounds, then teams that have played less.
    StageWeighted,
}

impl QueueStrategy {
    pub fn is_waiting(&self, status: MatchStatus) -> bool {
        match self {
            Self::RoundBalanced => matches!(status, MatchStatus::NotStarted | MatchStatus::Waiting),
            Self::StageWeighted => matches!(
                status,
                MatchStatus::NotStarted | MatchStatus::Waiting | MatchStatus::Pending
            ),
        }
    }

    pub fn wait_unit(&self) -> WaitUnit {
        match self {
            Self::RoundBalanced => WaitUnit::QueuePosition,
            Self::StageWeighted => WaitUnit::Minutes,
        }
    }
}

impl fmt::Display for QueueStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoundBalanced => f.write_str("round-balanced"),
            Self::StageWeighted => f.write_str("stage-weighted"),
        }
    }
}

impl FromStr for QueueStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "round-balanced" => Ok(Self::RoundBalanced),
            "stage-weighted" => Ok(Self::StageWeighted),
            other => Err(format!(
                "unknown queue strategy '{other}' (expected round-balanced or stage-weighted)"
            )),
        }
    }
}

// ── Result ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitUnit {
    /// Zero-based count of matches ahead in the queue
    QueuePosition,
    /// Estimated minutes until a court opens
    Minutes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledQueue {
    pub queue: Vec<QueueMatch>,
    pub wait_times: BTreeMap<String, u32>,
    pub wait_unit: WaitUnit,
}

impl ScheduledQueue {
    pub fn empty(strategy: QueueStrategy) -> Self {
        Self {
            queue: Vec::new(),
            wait_times: BTreeMap::new(),
            wait_unit: strategy.wait_unit(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

// ── Entry Points ──────────────────────────────────────────────────────────────

/// Ranks every waiting match in `matches`.
///
/// Never fails: malformed input is logged at `error` level and an empty queue
/// is returned. An empty result therefore means either nothing is waiting or
/// the snapshot could not be scored; use [`try_scheduled_queue`] to tell the
/// two apart.
pub fn scheduled_queue(
    matches: &[Match],
    courts: &[Court],
    divisions: &[Division],
    strategy: QueueStrategy,
) -> ScheduledQueue {
    match try_scheduled_queue(matches, courts, divisions, strategy) {
        Ok(scheduled) => scheduled,
        Err(e) => {
            error!(
                strategy = %strategy,
                matches = matches.len(),
                divisions = divisions.len(),
                error = %e,
                "match queue computation failed, returning empty queue"
            );
            ScheduledQueue::empty(strategy)
        }
    }
}

pub fn try_scheduled_queue(
    matches: &[Match],
    courts: &[Court],
    divisions: &[Division],
    strategy: QueueStrategy,
) -> Result<ScheduledQueue, QueueError> {
    let waiting: Vec<&Match> = matches.iter().filter(|m| strategy.is_waiting(m.status)).collect();

    let ordered = match strategy {
        QueueStrategy::RoundBalanced => priority::round_balanced_order(matches, &waiting, divisions)?,
        QueueStrategy::StageWeighted => priority::stage_weighted_order(matches, &waiting)?,
    };

    let active_courts = courts.iter().filter(|c| c.active).count();
    let wait_times = ordered
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let wait = match strategy.wait_unit() {
                WaitUnit::QueuePosition => i as u32,
                WaitUnit::Minutes => priority::wait_minutes(i, active_courts),
            };
            (m.id.clone(), wait)
        })
        .collect();

    let queue: Vec<QueueMatch> = ordered.into_iter().map(QueueMatch::from).collect();

    debug!(
        strategy = %strategy,
        total = matches.len(),
        queued = queue.len(),
        active_courts,
        "match queue computed"
    );

    Ok(ScheduledQueue {
        queue,
        wait_times,
        wait_unit: strategy.wait_unit(),
    })
}
