//! tournament.rs — Builds the divisions, pool matches and courts for a simulated day
//!
//! Each division plays a single round robin (circle method). With an odd team
//! count one team sits out each round. Matches start as `not_started` in the
//! "Pool" stage.

use court_types::{Court, Division, Match, MatchStatus};

use crate::config::{CourtsConfig, TournamentConfig};

pub fn team_ids(division_id: &str, teams: usize) -> Vec<String> {
    (1..=teams).map(|t| format!("{division_id}-t{t}")).collect()
}

/// Single round robin: every pair meets once, nobody plays twice in a round.
pub fn round_robin_matches(division_id: &str, teams: &[String]) -> Vec<Match> {
    if teams.len() < 2 {
        return Vec::new();
    }

    // None is the bye slot for odd counts.
    let mut slots: Vec<Option<&String>> = teams.iter().map(Some).collect();
    if slots.len() % 2 == 1 {
        slots.push(None);
    }
    let n = slots.len();

    let mut matches = Vec::new();
    for round in 1..n as u32 {
        let mut game = 0;
        for i in 0..n / 2 {
            if let (Some(a), Some(b)) = (slots[i], slots[n - 1 - i]) {
                game += 1;
                matches.push(Match {
                    id: format!("{division_id}-r{round}-g{game}"),
                    division_id: division_id.to_string(),
                    round_number: round,
                    stage: "Pool".to_string(),
                    status: MatchStatus::NotStarted,
                    team_a_id: a.clone(),
                    team_b_id: b.clone(),
                    court: None,
                });
            }
        }
        // First slot stays put, the rest turn one step.
        slots[1..].rotate_right(1);
    }
    matches
}

pub fn build_tournament(cfg: &TournamentConfig) -> (Vec<Division>, Vec<Match>) {
    let mut divisions = Vec::with_capacity(cfg.divisions.len());
    let mut matches = Vec::new();
    for d in &cfg.divisions {
        divisions.push(Division {
            id: d.id.clone(),
            name: Some(d.name.clone()),
        });
        matches.extend(round_robin_matches(&d.id, &team_ids(&d.id, d.teams)));
    }
    (divisions, matches)
}

pub fn build_courts(cfg: &CourtsConfig) -> Vec<Court> {
    (1..=cfg.count)
        .map(|i| Court::new(format!("{} {i}", cfg.name_prefix)))
        .collect()
}
