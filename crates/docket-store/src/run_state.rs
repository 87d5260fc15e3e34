use crate::write_atomic;
use docket_core::{iso_date, CalendarDate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

/// Marker of the last successful generation. Always written whole.
///
/// The schema is flat with no version field; unknown keys are ignored and
/// the older `last_run_at_utc` / `last_output_file` names are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState {
    #[serde(with = "iso_date")]
    pub last_run_date: CalendarDate,
    #[serde(with = "time::serde::rfc3339", alias = "last_run_at_utc")]
    pub last_run_at: OffsetDateTime,
    #[serde(alias = "last_output_file")]
    pub last_output_path: PathBuf,
    #[serde(default)]
    pub timezone: String,
}

impl RunState {
    /// Whether this state records a completed run for `date`.
    pub fn covers(&self, date: CalendarDate) -> bool {
        self.last_run_date == date && !self.last_output_path.as_os_str().is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("state file {path} is unreadable or corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },
    #[error("saving state {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Load state from disk. Returns None if the file doesn't exist.
pub fn load_state(path: &Path) -> Result<Option<RunState>, StateError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(StateError::Corrupt {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        }
    };
    let state: RunState = serde_json::from_str(&content).map_err(|e| StateError::Corrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(Some(state))
}

/// Save state atomically, creating parent directories as needed.
pub fn save_state(path: &Path, state: &RunState) -> Result<(), StateError> {
    let write_err = |source: std::io::Error| StateError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut data = serde_json::to_string_pretty(state).map_err(|e| write_err(e.into()))?;
    data.push('\n');
    write_atomic(path, data.as_bytes()).map_err(write_err)?;
    tracing::debug!(path = %path.display(), "run state saved");
    Ok(())
}
