//! Invariants of the match queue and court assignment helpers over random snapshots.

use court_types::{Court, Division, Match, MatchStatus};
use proptest::prelude::*;
use scheduler_core::{auto_assign_first_wave, scheduled_queue, QueueStrategy};

const DIVISIONS: [&str; 3] = ["A", "B", "C"];

const STATUSES: [MatchStatus; 6] = [
    MatchStatus::NotStarted,
    MatchStatus::Waiting,
    MatchStatus::InProgress,
    MatchStatus::Completed,
    MatchStatus::Pending,
    MatchStatus::Other,
];

fn divisions() -> Vec<Division> {
    DIVISIONS.iter().map(|d| Division::new(*d)).collect()
}

fn snapshot() -> impl Strategy<Value = Vec<Match>> {
    prop::collection::vec((0..3usize, 1..6u32, 0..6usize, 0..8u32, 0..8u32), 0..40).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (div, round, status, a, b))| Match {
                id: format!("m{i}"),
                division_id: DIVISIONS[div].to_string(),
                round_number: round,
                stage: ["Pool", "Main Bracket", "Bronze", "Plate"][i % 4].to_string(),
                status: STATUSES[status],
                team_a_id: format!("t{a}"),
                team_b_id: format!("t{b}"),
                court: None,
            })
            .collect()
    })
}

fn courts() -> impl Strategy<Value = Vec<Court>> {
    prop::collection::vec((any::<bool>(), any::<bool>()), 0..8).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (active, busy))| Court {
                name: format!("Court {}", i + 1),
                active,
                current_match_id: busy.then(|| format!("busy{i}")),
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_queue_holds_only_waiting_matches(matches in snapshot()) {
        for strategy in [QueueStrategy::RoundBalanced, QueueStrategy::StageWeighted] {
            let q = scheduled_queue(&matches, &[], &divisions(), strategy);
            for m in &q.queue {
                prop_assert!(strategy.is_waiting(m.status));
                prop_assert!(m.status != MatchStatus::Completed && m.status != MatchStatus::InProgress);
            }
            prop_assert_eq!(q.queue.len(), q.wait_times.len());
        }
    }

    #[test]
    fn prop_active_round_served_before_later_rounds(matches in snapshot()) {
        let q = scheduled_queue(&matches, &[], &divisions(), QueueStrategy::RoundBalanced);
        for div in DIVISIONS {
            let active = matches
                .iter()
                .filter(|m| m.division_id == div && !m.status.is_completed())
                .map(|m| m.round_number)
                .min();
            let Some(active) = active else { continue };

            let positions: Vec<(usize, u32)> = q
                .queue
                .iter()
                .enumerate()
                .filter(|(_, m)| m.division_id == div)
                .map(|(i, m)| (i, m.round_number))
                .collect();
            let last_active = positions.iter().filter(|(_, r)| *r == active).map(|(i, _)| *i).max();
            let first_later = positions.iter().filter(|(_, r)| *r > active).map(|(i, _)| *i).min();
            if let (Some(last_active), Some(first_later)) = (last_active, first_later) {
                prop_assert!(last_active < first_later);
            }
        }
    }

    #[test]
    fn prop_queue_is_deterministic(matches in snapshot(), courts in courts()) {
        for strategy in [QueueStrategy::RoundBalanced, QueueStrategy::StageWeighted] {
            let first = scheduled_queue(&matches, &courts, &divisions(), strategy);
            let second = scheduled_queue(&matches, &courts, &divisions(), strategy);
            prop_assert_eq!(first, second);
        }
    }

    #[test]
    fn prop_first_wave_bounded_by_capacity(matches in snapshot(), courts in courts()) {
        let q = scheduled_queue(&matches, &courts, &divisions(), QueueStrategy::RoundBalanced);
        let wave = auto_assign_first_wave(&q.queue, &courts);
        let free = courts.iter().filter(|c| c.is_free()).count();
        prop_assert!(wave.len() <= free.min(q.queue.len()));
        prop_assert_eq!(wave.len(), free.min(q.queue.len()));

        let mut used: Vec<&str> = wave.iter().map(|a| a.court_name.as_str()).collect();
        used.sort_unstable();
        used.dedup();
        prop_assert_eq!(used.len(), wave.len());
    }
}
