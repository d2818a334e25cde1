//! Completeness of the shipped box rotations, checked through the public API.

use std::collections::{BTreeMap, BTreeSet};

use court_types::{GeneratedPairing, Player};
use scheduler_core::{generate_box_pairings, validate_pattern_fairness, BoxSize};

fn box_of(n: usize) -> Vec<Player> {
    ["Ana", "Ben", "Cleo", "Dev", "Eli", "Fay"][..n]
        .iter()
        .enumerate()
        .map(|(i, name)| Player::new(format!("p{i}"), *name))
        .collect()
}

struct Load {
    matches: BTreeMap<String, usize>,
    byes: BTreeMap<String, usize>,
    partner_pairs: BTreeMap<(String, String), usize>,
}

fn load(rounds: &[GeneratedPairing]) -> Load {
    let mut out = Load {
        matches: BTreeMap::new(),
        byes: BTreeMap::new(),
        partner_pairs: BTreeMap::new(),
    };
    for r in rounds {
        for team in [&r.team_a, &r.team_b] {
            for p in team {
                *out.matches.entry(p.id.clone()).or_insert(0) += 1;
            }
            let mut pair = [team[0].id.clone(), team[1].id.clone()];
            pair.sort();
            let [a, b] = pair;
            *out.partner_pairs.entry((a, b)).or_insert(0) += 1;
        }
        for id in &r.bye_player_ids {
            *out.byes.entry(id.clone()).or_insert(0) += 1;
        }
    }
    out
}

#[test]
fn four_player_box_partners_everyone_once() {
    let rounds = generate_box_pairings(&box_of(4), 4).unwrap();
    assert_eq!(rounds.len(), 3);
    let l = load(&rounds);
    assert!(l.matches.values().all(|&n| n == 3));
    assert!(l.byes.is_empty());
    assert_eq!(l.partner_pairs.len(), 6);
    assert!(l.partner_pairs.values().all(|&n| n == 1));
}

#[test]
fn five_player_box_one_bye_each() {
    let rounds = generate_box_pairings(&box_of(5), 5).unwrap();
    assert_eq!(rounds.len(), 5);
    let l = load(&rounds);
    assert_eq!(l.matches.len(), 5);
    assert!(l.matches.values().all(|&n| n == 4));
    assert_eq!(l.byes.len(), 5);
    assert!(l.byes.values().all(|&n| n == 1));
    assert!(l.partner_pairs.values().all(|&n| n == 1));
}

#[test]
fn six_player_box_two_rests_each() {
    let rounds = generate_box_pairings(&box_of(6), 6).unwrap();
    assert_eq!(rounds.len(), 6);
    assert!(rounds.iter().all(|r| r.bye_player_ids.len() == 2));
    let l = load(&rounds);
    assert!(l.matches.values().all(|&n| n == 4));
    assert!(l.byes.values().all(|&n| n == 2));

    let partners_of = |id: &str| -> BTreeSet<String> {
        l.partner_pairs
            .keys()
            .filter_map(|(a, b)| match (a == id, b == id) {
                (true, _) => Some(b.clone()),
                (_, true) => Some(a.clone()),
                _ => None,
            })
            .collect()
    };
    for p in box_of(6) {
        assert_eq!(partners_of(&p.id).len(), 4, "{}", p.name);
    }
}

#[test]
fn nobody_plays_and_rests_in_same_round() {
    for n in 4..=6 {
        for r in generate_box_pairings(&box_of(n), n).unwrap() {
            let on_court: BTreeSet<&str> = r.team_a.iter().chain(&r.team_b).map(|p| p.id.as_str()).collect();
            assert_eq!(on_court.len(), 4);
            assert!(r.bye_player_ids.iter().all(|id| !on_court.contains(id.as_str())));
        }
    }
}

#[test]
fn generation_is_deterministic() {
    let players = box_of(6);
    assert_eq!(
        generate_box_pairings(&players, 6).unwrap(),
        generate_box_pairings(&players, 6).unwrap()
    );
    let size = BoxSize::Five;
    assert_eq!(
        validate_pattern_fairness(size.pattern()),
        validate_pattern_fairness(size.pattern())
    );
}

#[test]
fn validation_result_serializes_for_callers() {
    let result = validate_pattern_fairness(BoxSize::Six.pattern());
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["valid"], true);
    assert!(json.get("error").is_none());
    assert_eq!(json["checks"]["byesBalanced"], true);
    assert_eq!(json["players"].as_array().unwrap().len(), 6);
}
