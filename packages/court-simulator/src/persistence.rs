use anyhow::{Context, Result};
use court_types::{Court, Division, Match};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::info;

/// Everything the scheduler needs for one call, as exported from the app's store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub matches: Vec<Match>,
    #[serde(default)]
    pub courts: Vec<Court>,
    #[serde(default)]
    pub divisions: Vec<Division>,
}

/// Load a snapshot file. Unlike the day state, a broken snapshot is an error:
/// scheduling an empty stand-in would hide the problem.
pub async fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let data = fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    let snapshot: Snapshot = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse snapshot {}", path.display()))?;
    info!(
        "Loaded snapshot {} ({} matches, {} courts, {} divisions)",
        path.display(),
        snapshot.matches.len(),
        snapshot.courts.len(),
        snapshot.divisions.len()
    );
    Ok(snapshot)
}

/// Write any result (queue, report, rotation) as pretty JSON.
pub async fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}
