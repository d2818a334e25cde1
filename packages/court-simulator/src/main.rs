//! main.rs — Court Suite scheduler simulator
//!
//! Three modes, all thin callers around `scheduler-core`:
//!   1. `day`: simulates a tournament day on N courts, re-running the queue
//!      after every finished match
//!   2. `queue`: ranks a JSON snapshot exported from the app and prints the
//!      queue, wait estimates and first-wave court decisions
//!   3. `box`: prints a box league rotation and its fairness check

mod config;
mod day_sim;
mod persistence;
mod scenarios;
mod tournament;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use court_types::Player;
use scheduler_core::{
    auto_assign_first_wave, generate_box_pairings, next_match_for_court, scheduled_queue,
    validate_pattern_fairness, BoxSize, QueueStrategy,
};
use serde_json::json;
use tokio::time::interval;
use tracing::{info, warn};

use config::FullConfig;
use day_sim::DaySim;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "court-sim", about = "Court Suite match scheduler simulator")]
struct Args {
    /// Config file path
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate a full tournament day
    Day {
        /// Queue strategy (round-balanced | stage-weighted); overrides config
        #[arg(long)]
        strategy: Option<QueueStrategy>,
        /// Scenario preset (default | court-outage)
        #[arg(long, default_value = "default")]
        scenario: String,
        /// Write the day report as JSON
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Rank a snapshot of matches, courts and divisions
    Queue {
        snapshot: PathBuf,
        #[arg(long, default_value_t = QueueStrategy::RoundBalanced)]
        strategy: QueueStrategy,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the rotation for a box of 4, 5 or 6 players
    #[command(name = "box")]
    Rotation {
        size: usize,
        /// Player names in box order
        names: Vec<String>,
    },
}

// ── Main ──────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "court_simulator=info,scheduler_core=warn".into()),
        )
        .init();

    let args = Args::parse();

    match args.command {
        Command::Day { strategy, scenario, out } => {
            let cfg = FullConfig::load(&args.config)?;
            let strategy = strategy.unwrap_or(cfg.scheduler.strategy);
            run_day(&cfg, strategy, &scenario, out).await
        }
        Command::Queue { snapshot, strategy, out } => run_queue(snapshot, strategy, out).await,
        Command::Rotation { size, names } => run_box(size, names),
    }
}

// ── Day simulation ────────────────────────────────────────────────────────────

async fn run_day(
    cfg: &FullConfig,
    strategy: QueueStrategy,
    scenario_name: &str,
    out: Option<PathBuf>,
) -> Result<()> {
    let scenario = scenarios::preset(scenario_name, &cfg.scenarios)
        .ok_or_else(|| anyhow!("unknown scenario preset: {scenario_name}"))?;
    let (divisions, matches) = tournament::build_tournament(&cfg.tournament);
    let courts = tournament::build_courts(&cfg.courts);

    info!(
        "🏓 Court day starting at {}: {} divisions, {} matches, {} courts, {} strategy",
        cfg.tournament.start_time,
        divisions.len(),
        matches.len(),
        courts.len(),
        strategy
    );

    let mut sim = DaySim::new(
        divisions,
        matches,
        courts,
        &cfg.simulation,
        strategy,
        scenario,
        cfg.start_time()?,
    )?;
    sim.start();

    let mut ticker = interval(Duration::from_millis(cfg.simulation.tick_ms.max(1)));
    let mut last_hour = 0;
    while !sim.is_finished() {
        ticker.tick().await;
        sim.tick(cfg.simulation.minutes_per_tick);

        if entered_new_hour(&mut last_hour, sim.minute) {
            let done = sim.records().len();
            info!("⏱ {} | {} of {} matches played", sim.clock(sim.minute), done, sim.matches.len());
        }
        if sim.is_stalled() {
            warn!("No court available and nothing running at {}, stopping", sim.clock(sim.minute));
            break;
        }
        if sim.minute >= cfg.simulation.max_day_minutes {
            warn!("Day cut off at {} with matches unplayed", sim.clock(sim.minute));
            break;
        }
    }

    let report = sim.report();
    info!(
        "🏁 Day finished at {} ({} min): {} played, {} unplayed",
        report.finish_time, report.day_minutes, report.completed, report.unplayed
    );

    if let Some(path) = out {
        persistence::save_json(&path, &report).await?;
    }
    Ok(())
}

/// True once per hour of simulated time, whatever the tick size.
fn entered_new_hour(last_hour: &mut u32, minute: u32) -> bool {
    let hour = minute / 60;
    if hour > *last_hour {
        *last_hour = hour;
        true
    } else {
        false
    }
}

// ── Snapshot queue ────────────────────────────────────────────────────────────

async fn run_queue(path: PathBuf, strategy: QueueStrategy, out: Option<PathBuf>) -> Result<()> {
    let snap = persistence::load_snapshot(&path).await?;

    let scheduled = scheduled_queue(&snap.matches, &snap.courts, &snap.divisions, strategy);
    if scheduled.is_empty() {
        info!("Nothing waiting for a court (or the snapshot could not be scored; see errors above)");
    }

    let active_courts: Vec<&str> = snap
        .courts
        .iter()
        .filter(|c| c.active)
        .map(|c| c.name.as_str())
        .collect();
    let next_up = next_match_for_court(&scheduled.queue, &active_courts);
    let first_wave = auto_assign_first_wave(&scheduled.queue, &snap.courts);

    let result = json!({
        "strategy": strategy,
        "queue": scheduled.queue,
        "waitTimes": scheduled.wait_times,
        "waitUnit": scheduled.wait_unit,
        "nextUp": next_up.map(|m| &m.id),
        "firstWave": first_wave,
    });

    println!("{}", serde_json::to_string_pretty(&result)?);
    if let Some(out) = out {
        persistence::save_json(&out, &result).await?;
    }
    Ok(())
}

// ── Box rotation ──────────────────────────────────────────────────────────────

fn run_box(size: usize, names: Vec<String>) -> Result<()> {
    let box_size = BoxSize::try_from(size)?;
    let players: Vec<Player> = names
        .into_iter()
        .enumerate()
        .map(|(i, name)| Player::new(format!("p{}", i + 1), name))
        .collect();

    let pairings = generate_box_pairings(&players, size)
        .with_context(|| format!("cannot build a box of {size}"))?;
    let validation = validate_pattern_fairness(box_size.pattern());

    for p in &pairings {
        let byes: Vec<&str> = p
            .bye_player_ids
            .iter()
            .filter_map(|id| players.iter().find(|pl| &pl.id == id).map(|pl| pl.name.as_str()))
            .collect();
        println!(
            "Round {}: {} & {} vs {} & {}{}",
            p.round_number,
            p.team_a[0].name,
            p.team_a[1].name,
            p.team_b[0].name,
            p.team_b[1].name,
            if byes.is_empty() { String::new() } else { format!("  (rest: {})", byes.join(", ")) }
        );
    }
    println!("{}", serde_json::to_string_pretty(&validation)?);
    Ok(())
}
