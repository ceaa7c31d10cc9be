//! JSON sidecar holding the run summary next to the event file.

use std::path::{Path, PathBuf};

use crate::error::SimResult;
use crate::sims::record::RunSummary;

/// `<events>.summary.json` for an event file path.
pub fn summary_path_for(events_path: impl AsRef<Path>) -> PathBuf {
    let mut name = events_path.as_ref().as_os_str().to_owned();
    name.push(".summary.json");
    PathBuf::from(name)
}

pub fn write_summary_json(path: impl AsRef<Path>, summary: &RunSummary) -> SimResult<()> {
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn read_summary_json(path: impl AsRef<Path>) -> SimResult<RunSummary> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}
