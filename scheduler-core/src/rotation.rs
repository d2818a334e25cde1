//! Box league rotations for rotating-partner doubles.
//!
//! A box of 4, 5 or 6 players plays a fixed schedule where partners rotate
//! every round and rests are spread evenly:
//!
//! | box | rounds | matches/player | byes/player |
//! |-----|--------|----------------|-------------|
//! | 4   | 3      | 3              | 0           |
//! | 5   | 5      | 4              | 1           |
//! | 6   | 6      | 4              | 2           |
//!
//! The tables are hand-built designs, not generated. In the 4 and 5 player
//! tables every pair partners exactly once; in the 6 player table each player
//! partners four different players. Any edit must still pass
//! [`validate_pattern_fairness`].

use std::collections::BTreeSet;

use court_types::{GeneratedPairing, Player};
use serde::Serialize;
use tracing::debug;

use crate::error::RotationError;

// ── Pattern Tables ────────────────────────────────────────────────────────────

/// One round as 0-based indices into the box's player list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundDefinition {
    pub team_a: [usize; 2],
    pub team_b: [usize; 2],
    pub bye: &'static [usize],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationPattern {
    pub box_size: usize,
    pub total_rounds: usize,
    pub matches_per_player: usize,
    pub byes_per_player: usize,
    pub rounds: &'static [RoundDefinition],
}

const fn round(team_a: [usize; 2], team_b: [usize; 2], bye: &'static [usize]) -> RoundDefinition {
    RoundDefinition { team_a, team_b, bye }
}

static FOUR_PLAYER: RotationPattern = RotationPattern {
    box_size: 4,
    total_rounds: 3,
    matches_per_player: 3,
    byes_per_player: 0,
    rounds: &[
        round([0, 1], [2, 3], &[]),
        round([0, 2], [1, 3], &[]),
        round([0, 3], [1, 2], &[]),
    ],
};

static FIVE_PLAYER: RotationPattern = RotationPattern {
    box_size: 5,
    total_rounds: 5,
    matches_per_player: 4,
    byes_per_player: 1,
    rounds: &[
        round([0, 1], [2, 3], &[4]),
        round([0, 2], [1, 4], &[3]),
        round([0, 4], [1, 3], &[2]),
        round([0, 3], [2, 4], &[1]),
        round([1, 2], [3, 4], &[0]),
    ],
};

static SIX_PLAYER: RotationPattern = RotationPattern {
    box_size: 6,
    total_rounds: 6,
    matches_per_player: 4,
    byes_per_player: 2,
    rounds: &[
        round([0, 2], [1, 3], &[4, 5]),
        round([0, 4], [1, 5], &[2, 3]),
        round([2, 4], [3, 5], &[0, 1]),
        round([1, 4], [2, 3], &[0, 5]),
        round([0, 3], [4, 5], &[1, 2]),
        round([0, 1], [2, 5], &[3, 4]),
    ],
};

// ── Box Size ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoxSize {
    Four,
    Five,
    Six,
}

impl TryFrom<usize> for BoxSize {
    type Error = RotationError;

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        match n {
            4 => Ok(Self::Four),
            5 => Ok(Self::Five),
            6 => Ok(Self::Six),
            other => Err(RotationError::UnsupportedBoxSize(other)),
        }
    }
}

impl BoxSize {
    pub fn players(&self) -> usize {
        self.pattern().box_size
    }

    pub fn pattern(&self) -> &'static RotationPattern {
        match self {
            Self::Four => &FOUR_PLAYER,
            Self::Five => &FIVE_PLAYER,
            Self::Six => &SIX_PLAYER,
        }
    }

    pub fn round_count(&self) -> usize {
        self.pattern().total_rounds
    }

    pub fn matches_per_player(&self) -> usize {
        self.pattern().matches_per_player
    }

    pub fn byes_per_player(&self) -> usize {
        self.pattern().byes_per_player
    }

    /// 1-based rounds in which `player_index` sits out.
    pub fn bye_rounds(&self, player_index: usize) -> Vec<u32> {
        self.pattern()
            .rounds
            .iter()
            .enumerate()
            .filter(|(_, r)| r.bye.contains(&player_index))
            .map(|(i, _)| i as u32 + 1)
            .collect()
    }
}

// ── Generation ────────────────────────────────────────────────────────────────

/// Maps the fixed table for `box_size` onto `players`, in input order.
pub fn generate_box_pairings(
    players: &[Player],
    box_size: usize,
) -> Result<Vec<GeneratedPairing>, RotationError> {
    let size = BoxSize::try_from(box_size)?;
    if players.len() != size.players() {
        return Err(RotationError::PlayerCountMismatch {
            expected: size.players(),
            actual: players.len(),
        });
    }

    let pick = |[a, b]: [usize; 2]| [players[a].clone(), players[b].clone()];

    let pairings: Vec<GeneratedPairing> = size
        .pattern()
        .rounds
        .iter()
        .enumerate()
        .map(|(i, r)| GeneratedPairing {
            round_number: i as u32 + 1,
            team_a: pick(r.team_a),
            team_b: pick(r.team_b),
            bye_player_ids: r.bye.iter().map(|&p| players[p].id.clone()).collect(),
        })
        .collect();

    debug!(box_size, rounds = pairings.len(), "box pairings generated");
    Ok(pairings)
}

// ── Fairness Validation ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerTally {
    pub matches: usize,
    pub byes: usize,
    pub partners: BTreeSet<usize>,
    pub opponents: BTreeSet<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FairnessChecks {
    pub matches_balanced: bool,
    pub byes_balanced: bool,
    pub partners_spread: bool,
    pub opponents_spread: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternValidationResult {
    /// False only for hard failures: match/bye counts or out-of-range indices.
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub warnings: Vec<String>,
    pub checks: FairnessChecks,
    /// Indexed by player position.
    pub players: Vec<PlayerTally>,
}

/// Replays `pattern` and checks every player's load.
///
/// Match and bye counts must equal the declared per-player figures. Partner
/// and opponent spread only raise warnings: each player should see at least
/// `min(matchesPerPlayer, boxSize - 1) - 1` partners and `boxSize - 2`
/// opponents.
pub fn validate_pattern_fairness(pattern: &RotationPattern) -> PatternValidationResult {
    let n = pattern.box_size;
    let mut tally = vec![PlayerTally::default(); n];
    let mut errors = Vec::new();

    for (i, r) in pattern.rounds.iter().enumerate() {
        let mut slots = r.team_a.iter().chain(&r.team_b).chain(r.bye);
        if let Some(&bad) = slots.find(|&&p| p >= n) {
            errors.push(format!(
                "round {} references player index {bad} outside a box of {n}",
                i + 1
            ));
            continue;
        }

        for (team, other) in [(r.team_a, r.team_b), (r.team_b, r.team_a)] {
            for (k, &p) in team.iter().enumerate() {
                let t = &mut tally[p];
                t.matches += 1;
                t.partners.insert(team[1 - k]);
                t.opponents.extend(other);
            }
        }
        for &p in r.bye {
            tally[p].byes += 1;
        }
    }

    let expected_partners = pattern.matches_per_player.min(n.saturating_sub(1));
    let min_partners = expected_partners.saturating_sub(1);
    let min_opponents = n.saturating_sub(2);

    let mut checks = FairnessChecks {
        matches_balanced: true,
        byes_balanced: true,
        partners_spread: true,
        opponents_spread: true,
    };
    let mut warnings = Vec::new();

    for (p, t) in tally.iter().enumerate() {
        if t.matches != pattern.matches_per_player {
            checks.matches_balanced = false;
            errors.push(format!(
                "player {p} plays {} matches, expected {}",
                t.matches, pattern.matches_per_player
            ));
        }
        if t.byes != pattern.byes_per_player {
            checks.byes_balanced = false;
            errors.push(format!(
                "player {p} has {} byes, expected {}",
                t.byes, pattern.byes_per_player
            ));
        }
        if t.partners.len() < min_partners {
            checks.partners_spread = false;
            warnings.push(format!(
                "player {p} partners only {} players, expected at least {min_partners}",
                t.partners.len()
            ));
        }
        if t.opponents.len() < min_opponents {
            checks.opponents_spread = false;
            warnings.push(format!(
                "player {p} faces only {} opponents, expected at least {min_opponents}",
                t.opponents.len()
            ));
        }
    }

    PatternValidationResult {
        valid: errors.is_empty(),
        error: (!errors.is_empty()).then(|| errors.join("; ")),
        warnings,
        checks,
        players: tally,
    }
}
