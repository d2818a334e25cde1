//! config.rs — `config.toml` layout for the simulator
//!
//! A missing file falls back to the copy embedded at build time, so the
//! binary runs out of the box. CLI flags override individual values.

use anyhow::{Context, Result};
use chrono::NaiveTime;
use scheduler_core::QueueStrategy;
use serde::Deserialize;
use tracing::info;

pub const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct FullConfig {
    pub tournament: TournamentConfig,
    pub courts: CourtsConfig,
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    pub scenarios: ScenariosConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TournamentConfig {
    /// "HH:MM" wall-clock time of the first wave
    pub start_time: String,
    /// Order here is the division tie-break order.
    pub divisions: Vec<DivisionConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DivisionConfig {
    pub id: String,
    pub name: String,
    pub teams: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CourtsConfig {
    pub count: usize,
    pub name_prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    pub tick_ms: u64,
    pub minutes_per_tick: u32,
    pub seed: u64,
    pub match_minutes_mean: f64,
    pub match_minutes_stddev: f64,
    pub min_match_minutes: f64,
    pub max_day_minutes: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default)]
    pub strategy: QueueStrategy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenariosConfig {
    pub outage_court: String,
    pub outage_start_minute: u32,
    pub outage_end_minute: u32,
}

impl FullConfig {
    pub fn load(path: &str) -> Result<Self> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(_) => {
                info!("No {path} found, using built-in defaults");
                DEFAULT_CONFIG.to_string()
            }
        };
        toml::from_str(&raw).with_context(|| format!("invalid config in {path}"))
    }

    pub fn start_time(&self) -> Result<NaiveTime> {
        NaiveTime::parse_from_str(&self.tournament.start_time, "%H:%M")
            .with_context(|| format!("start_time '{}' is not HH:MM", self.tournament.start_time))
    }
}
