//! day_sim.rs — Minute-by-minute simulation of a tournament day
//!
//! Plays the caller's role around the scheduler:
//! - first wave: rank the queue, fill every free court
//! - on each finished match: mark it completed, free the court, re-rank the
//!   whole snapshot and put the queue head on that court
//! - scenario events close and reopen courts
//!
//! Match lengths come from a seeded normal distribution, so a given config
//! always produces the same day.

use anyhow::{anyhow, Result};
use chrono::{Duration, NaiveTime};
use court_types::{Court, CourtAssignment, Division, Match, MatchStatus};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use scheduler_core::{auto_assign_first_wave, auto_assign_on_court_free, scheduled_queue, QueueStrategy};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::SimulationConfig;
use crate::scenarios::{CourtEvent, ScenarioConfig};

// ── Types ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct RunningMatch {
    match_id: String,
    court_name: String,
    started_minute: u32,
    ends_minute: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub match_id: String,
    pub division_id: String,
    pub round_number: u32,
    pub court_name: String,
    pub started_minute: u32,
    pub finished_minute: u32,
    pub started_at: String,
    pub finished_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayReport {
    pub strategy: QueueStrategy,
    pub start_time: String,
    pub finish_time: String,
    pub day_minutes: u32,
    pub completed: usize,
    pub unplayed: usize,
    pub matches: Vec<MatchRecord>,
}

pub struct DaySim {
    pub matches: Vec<Match>,
    pub courts: Vec<Court>,
    divisions: Vec<Division>,
    strategy: QueueStrategy,
    scenario: ScenarioConfig,
    start_time: NaiveTime,
    rng: StdRng,
    durations: Normal<f64>,
    min_match_minutes: f64,
    pub minute: u32,
    running: Vec<RunningMatch>,
    records: Vec<MatchRecord>,
}

// ── Simulation ────────────────────────────────────────────────────────────────

impl DaySim {
    pub fn new(
        divisions: Vec<Division>,
        matches: Vec<Match>,
        courts: Vec<Court>,
        cfg: &SimulationConfig,
        strategy: QueueStrategy,
        scenario: ScenarioConfig,
        start_time: NaiveTime,
    ) -> Result<Self> {
        let durations = Normal::new(cfg.match_minutes_mean, cfg.match_minutes_stddev)
            .map_err(|e| anyhow!("invalid match length distribution: {e}"))?;
        Ok(Self {
            matches,
            courts,
            divisions,
            strategy,
            scenario,
            start_time,
            rng: StdRng::seed_from_u64(cfg.seed),
            durations,
            min_match_minutes: cfg.min_match_minutes.max(1.0),
            minute: 0,
            running: Vec::new(),
            records: Vec::new(),
        })
    }

    pub fn clock(&self, minute: u32) -> String {
        (self.start_time + Duration::minutes(i64::from(minute)))
            .format("%H:%M")
            .to_string()
    }

    /// Fills every free court from a fresh queue.
    pub fn start(&mut self) -> Vec<CourtAssignment> {
        let queue = scheduled_queue(&self.matches, &self.courts, &self.divisions, self.strategy);
        let wave = auto_assign_first_wave(&queue.queue, &self.courts);
        for a in &wave {
            self.apply(a);
        }
        info!(
            "First wave at {}: {} of {} matches on court",
            self.clock(self.minute),
            wave.len(),
            self.matches.len()
        );
        wave
    }

    /// Advances the clock `minutes` minutes and returns every placement made.
    pub fn tick(&mut self, minutes: u32) -> Vec<CourtAssignment> {
        let mut placed = Vec::new();
        for _ in 0..minutes.max(1) {
            self.minute += 1;

            let mut freed = Vec::new();
            for event in self.scenario.events_at(self.minute) {
                match event {
                    CourtEvent::Close(name) => self.set_court_active(&name, false),
                    CourtEvent::Reopen(name) => {
                        self.set_court_active(&name, true);
                        freed.push(name);
                    }
                }
            }
            freed.extend(self.finish_due());

            for court_name in freed {
                if let Some(a) = self.fill(&court_name) {
                    placed.push(a);
                }
            }
        }
        placed
    }

    pub fn is_finished(&self) -> bool {
        self.matches.iter().all(|m| m.status.is_completed())
    }

    /// Nothing on court and nothing can be placed.
    pub fn is_stalled(&self) -> bool {
        self.running.is_empty() && !self.is_finished() && !self.courts.iter().any(|c| c.is_free())
    }

    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    pub fn report(&self) -> DayReport {
        let completed = self.matches.iter().filter(|m| m.status.is_completed()).count();
        let day_minutes = self.records.iter().map(|r| r.finished_minute).max().unwrap_or(0);
        DayReport {
            strategy: self.strategy,
            start_time: self.clock(0),
            finish_time: self.clock(day_minutes),
            day_minutes,
            completed,
            unplayed: self.matches.len() - completed,
            matches: self.records.clone(),
        }
    }

    fn set_court_active(&mut self, name: &str, active: bool) {
        match self.courts.iter_mut().find(|c| c.name == name) {
            Some(court) => {
                court.active = active;
                info!(
                    "{} {} at {}",
                    name,
                    if active { "reopened" } else { "closed" },
                    self.clock(self.minute)
                );
            }
            None => warn!("Scenario references unknown court: {name}"),
        }
    }

    /// Completes matches whose time is up and returns the courts they vacated.
    fn finish_due(&mut self) -> Vec<String> {
        let minute = self.minute;
        let (done, still_running): (Vec<_>, Vec<_>) =
            self.running.drain(..).partition(|r| r.ends_minute <= minute);
        self.running = still_running;

        let mut freed = Vec::with_capacity(done.len());
        for r in done {
            let Some(m) = self.matches.iter_mut().find(|m| m.id == r.match_id) else {
                warn!("Finished match {} is missing from the snapshot", r.match_id);
                continue;
            };
            m.status = MatchStatus::Completed;
            let (division_id, round_number) = (m.division_id.clone(), m.round_number);

            if let Some(court) = self.courts.iter_mut().find(|c| c.name == r.court_name) {
                court.current_match_id = None;
            }

            debug!("{} finished on {}", r.match_id, r.court_name);
            self.records.push(MatchRecord {
                started_at: self.clock(r.started_minute),
                finished_at: self.clock(minute),
                match_id: r.match_id,
                division_id,
                round_number,
                court_name: r.court_name.clone(),
                started_minute: r.started_minute,
                finished_minute: minute,
            });
            freed.push(r.court_name);
        }
        freed
    }

    /// Re-ranks the snapshot and puts the queue head on `court_name` if it is free.
    fn fill(&mut self, court_name: &str) -> Option<CourtAssignment> {
        let court = self.courts.iter().find(|c| c.name == court_name)?;
        if !court.is_free() || self.scenario.is_closed(court_name, self.minute) {
            return None;
        }
        let queue = scheduled_queue(&self.matches, &self.courts, &self.divisions, self.strategy);
        let assignment = auto_assign_on_court_free(&queue.queue, court)?;
        self.apply(&assignment);
        Some(assignment)
    }

    fn apply(&mut self, a: &CourtAssignment) {
        let Some(m) = self.matches.iter_mut().find(|m| m.id == a.match_id) else {
            warn!("Assignment for unknown match {}", a.match_id);
            return;
        };
        m.status = MatchStatus::InProgress;
        m.court = Some(a.court_name.clone());
        if let Some(court) = self.courts.iter_mut().find(|c| c.name == a.court_name) {
            court.current_match_id = Some(a.match_id.clone());
        }

        let length = self.durations.sample(&mut self.rng).max(self.min_match_minutes).round() as u32;
        info!(
            "{} → {} at {} (~{} min)",
            a.match_id,
            a.court_name,
            self.clock(self.minute),
            length
        );
        self.running.push(RunningMatch {
            match_id: a.match_id.clone(),
            court_name: a.court_name.clone(),
            started_minute: self.minute,
            ends_minute: self.minute + length,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CourtsConfig, DivisionConfig, ScenariosConfig, TournamentConfig};
    use crate::scenarios::preset_court_outage;
    use crate::tournament::{build_courts, build_tournament};
    use std::collections::HashMap;

    fn sim_cfg() -> SimulationConfig {
        SimulationConfig {
            tick_ms: 1,
            minutes_per_tick: 1,
            seed: 7,
            match_minutes_mean: 15.0,
            match_minutes_stddev: 3.0,
            min_match_minutes: 8.0,
            max_day_minutes: 720,
        }
    }

    fn sim(strategy: QueueStrategy, scenario: ScenarioConfig) -> DaySim {
        let (divisions, matches) = build_tournament(&TournamentConfig {
            start_time: "09:00".into(),
            divisions: vec![
                DivisionConfig { id: "a".into(), name: "A".into(), teams: 5 },
                DivisionConfig { id: "b".into(), name: "B".into(), teams: 4 },
            ],
        });
        let courts = build_courts(&CourtsConfig { count: 3, name_prefix: "Court".into() });
        let start = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        DaySim::new(divisions, matches, courts, &sim_cfg(), strategy, scenario, start).unwrap()
    }

    fn run(sim: &mut DaySim) {
        sim.start();
        while !sim.is_finished() && sim.minute < 720 {
            sim.tick(1);
        }
    }

    #[test]
    fn day_completes_every_match() {
        let mut s = sim(QueueStrategy::RoundBalanced, ScenarioConfig::default());
        run(&mut s);
        assert!(s.is_finished());
        let report = s.report();
        assert_eq!(report.completed, 16);
        assert_eq!(report.unplayed, 0);
        assert_eq!(report.matches.len(), 16);
        assert_eq!(report.start_time, "09:00");
    }

    #[test]
    fn first_wave_fills_every_court() {
        let mut s = sim(QueueStrategy::RoundBalanced, ScenarioConfig::default());
        let wave = s.start();
        assert_eq!(wave.len(), 3);
        assert!(s.courts.iter().all(|c| c.current_match_id.is_some()));
    }

    #[test]
    fn courts_never_double_booked() {
        let mut s = sim(QueueStrategy::StageWeighted, ScenarioConfig::default());
        run(&mut s);
        let mut by_court: HashMap<&str, Vec<&MatchRecord>> = HashMap::new();
        for r in s.records() {
            by_court.entry(&r.court_name).or_default().push(r);
        }
        for records in by_court.values_mut() {
            records.sort_by_key(|r| r.started_minute);
            for pair in records.windows(2) {
                assert!(pair[1].started_minute >= pair[0].finished_minute);
            }
        }
    }

    #[test]
    fn rounds_start_in_order_within_division() {
        let mut s = sim(QueueStrategy::RoundBalanced, ScenarioConfig::default());
        run(&mut s);
        for div in ["a", "b"] {
            let mut latest_start: HashMap<u32, u32> = HashMap::new();
            let mut earliest_start: HashMap<u32, u32> = HashMap::new();
            for r in s.records().iter().filter(|r| r.division_id == div) {
                let l = latest_start.entry(r.round_number).or_insert(0);
                *l = (*l).max(r.started_minute);
                let e = earliest_start.entry(r.round_number).or_insert(u32::MAX);
                *e = (*e).min(r.started_minute);
            }
            for (round, latest) in &latest_start {
                if let Some(next_earliest) = earliest_start.get(&(round + 1)) {
                    assert!(latest <= next_earliest, "division {div} round {round}");
                }
            }
        }
    }

    #[test]
    fn closed_court_takes_no_new_matches() {
        let scenario = preset_court_outage(&ScenariosConfig {
            outage_court: "Court 2".into(),
            outage_start_minute: 20,
            outage_end_minute: 60,
        });
        let mut s = sim(QueueStrategy::RoundBalanced, scenario.clone());
        run(&mut s);
        assert!(s.is_finished());
        for r in s.records().iter().filter(|r| r.court_name == "Court 2") {
            assert!(!scenario.is_closed("Court 2", r.started_minute), "{} started during outage", r.match_id);
        }
    }

    #[test]
    fn same_seed_same_day() {
        let mut first = sim(QueueStrategy::RoundBalanced, ScenarioConfig::default());
        let mut second = sim(QueueStrategy::RoundBalanced, ScenarioConfig::default());
        run(&mut first);
        run(&mut second);
        assert_eq!(first.report(), second.report());
    }

    #[test]
    fn all_courts_closed_stalls() {
        let mut s = sim(QueueStrategy::RoundBalanced, ScenarioConfig::default());
        for c in &mut s.courts {
            c.active = false;
        }
        assert!(s.start().is_empty());
        assert!(s.is_stalled());
    }
}
