//! scenarios.rs — Injectable disruptions for the simulated day
//!
//! Each scenario exercises a path the live app has to survive: the scheduler
//! is re-run from scratch after the disruption and must keep every court that
//! is still open busy.

use crate::config::ScenariosConfig;

#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioType {
    /// One court goes inactive for a window (net repair, wet surface).
    /// A match already on it plays out; no new match is placed there.
    CourtOutage,
}

#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    pub active: Vec<ScenarioType>,
    pub outage_court: String,
    pub outage_start_minute: u32,
    pub outage_end_minute: u32,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            active: vec![],
            outage_court: String::new(),
            outage_start_minute: 0,
            outage_end_minute: 0,
        }
    }
}

/// Court state change due at a given minute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourtEvent {
    Close(String),
    Reopen(String),
}

impl ScenarioConfig {
    pub fn has(&self, s: &ScenarioType) -> bool {
        self.active.contains(s)
    }

    pub fn events_at(&self, minute: u32) -> Vec<CourtEvent> {
        let mut events = Vec::new();
        if self.has(&ScenarioType::CourtOutage) {
            if minute == self.outage_start_minute {
                events.push(CourtEvent::Close(self.outage_court.clone()));
            }
            if minute == self.outage_end_minute {
                events.push(CourtEvent::Reopen(self.outage_court.clone()));
            }
        }
        events
    }

    /// True while `court` is held closed by a scenario.
    pub fn is_closed(&self, court: &str, minute: u32) -> bool {
        self.has(&ScenarioType::CourtOutage)
            && court == self.outage_court
            && (self.outage_start_minute..self.outage_end_minute).contains(&minute)
    }
}

pub fn preset_court_outage(cfg: &ScenariosConfig) -> ScenarioConfig {
    ScenarioConfig {
        active: vec![ScenarioType::CourtOutage],
        outage_court: cfg.outage_court.clone(),
        outage_start_minute: cfg.outage_start_minute,
        outage_end_minute: cfg.outage_end_minute,
    }
}

/// Presets selectable with `--scenario`.
pub fn preset(name: &str, cfg: &ScenariosConfig) -> Option<ScenarioConfig> {
    match name {
        "default" | "none" => Some(ScenarioConfig::default()),
        "court-outage" | "court_outage" => Some(preset_court_outage(cfg)),
        _ => None,
    }
}
