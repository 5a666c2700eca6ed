//! Persistence layer.
//!
//! One key-value slot: the last good quote, saved as a small JSON file.
//! Written synchronously on every successful cycle, read once at startup.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

use crate::types::PersistedQuote;

/// Default state file path.
const DEFAULT_STATE_FILE: &str = "devexcuses_state.json";

/// Save the last good quote to disk.
pub fn save_state(state: &PersistedQuote, path: Option<&str>) -> Result<()> {
    let path = path.unwrap_or(DEFAULT_STATE_FILE);
    let json = serde_json::to_string_pretty(state)
        .context("Failed to serialise quote state")?;

    std::fs::write(path, &json)
        .context(format!("Failed to write quote state to {path}"))?;

    debug!(path, quote = %state.text, "Quote state saved");
    Ok(())
}

/// Load the last good quote from disk.
/// Returns None if the file doesn't exist (fresh start).
pub fn load_state(path: Option<&str>) -> Result<Option<PersistedQuote>> {
    let path = path.unwrap_or(DEFAULT_STATE_FILE);

    if !Path::new(path).exists() {
        info!(path, "No saved quote found, starting fresh");
        return Ok(None);
    }

    let json = std::fs::read_to_string(path)
        .context(format!("Failed to read quote state from {path}"))?;

    let state: PersistedQuote = serde_json::from_str(&json)
        .context(format!("Failed to parse quote state from {path}"))?;

    info!(
        path,
        quote = %state.text,
        fetched_at = %state.fetched_at,
        "Quote state loaded from disk"
    );

    Ok(Some(state))
}

/// Delete the state file (for testing or reset).
pub fn delete_state(path: Option<&str>) -> Result<()> {
    let path = path.unwrap_or(DEFAULT_STATE_FILE);
    if Path::new(path).exists() {
        std::fs::remove_file(path)
            .context(format!("Failed to delete state file {path}"))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
