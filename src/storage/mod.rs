//! Snapshot loading.
//!
//! Reads a JSON array of wager records exported from the external store.
//! The engine never writes wagers; persistence belongs to the caller.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

use crate::types::Wager;

/// Default snapshot file path.
pub const DEFAULT_SNAPSHOT_FILE: &str = "wagers.json";

/// Parse a JSON array of wager records.
pub fn parse_wagers(json: &str) -> Result<Vec<Wager>> {
    let wagers: Vec<Wager> =
        serde_json::from_str(json).context("Failed to parse wager snapshot")?;
    debug!(count = wagers.len(), "Wager snapshot parsed");
    Ok(wagers)
}

/// Load wagers from a JSON snapshot file.
/// Returns an empty collection if the file doesn't exist.
pub fn load_wagers(path: Option<&str>) -> Result<Vec<Wager>> {
    let path = path.unwrap_or(DEFAULT_SNAPSHOT_FILE);

    if !Path::new(path).exists() {
        info!(path, "No snapshot found, nothing to report");
        return Ok(Vec::new());
    }

    let json = std::fs::read_to_string(path)
        .context(format!("Failed to read snapshot from {path}"))?;

    let wagers = parse_wagers(&json).context(format!("Invalid snapshot {path}"))?;

    info!(path, wagers = wagers.len(), "Snapshot loaded from disk");
    Ok(wagers)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
