use crate::guard::{self, Guard};
use docket_core::clock::{self, ClockError};
use docket_core::compose::compose;
use docket_core::render::{render, RenderError, Report, ReportFormat};
use docket_core::{format_date, iso_date, utc_seconds, CalendarDate, TaskCatalog};
use docket_store::{absolute, load_state, save_state, write_atomic, RunState, StateError};
use serde::Serialize;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

/// Prefix of every generated report file.
pub const REPORT_PREFIX: &str = "daily-tasklist-";

/// Inputs for one invocation.
///
/// Only one invocation at a time may target a given state file; nothing
/// here locks it. Two racing runs for the same date converge on the same
/// report file and the last state write wins.
#[derive(Debug, Clone, Copy)]
pub struct RunRequest<'a> {
    pub force: bool,
    pub date_override: Option<&'a str>,
    pub timezone: &'a str,
    pub state_file: &'a Path,
    pub output_dir: &'a Path,
    pub format: ReportFormat,
    pub catalog: &'a TaskCatalog,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Generated,
    AlreadyRan,
}

/// Outcome of one invocation, consumed by the caller's emission step.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RunResult {
    pub status: RunStatus,
    #[serde(with = "iso_date")]
    pub run_date: CalendarDate,
    pub output_file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_count: Option<usize>,
    /// When the reused report was generated (`already_ran` only).
    #[serde(
        rename = "last_run_at_utc",
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub last_run_at: Option<OffsetDateTime>,
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Clock(#[from] ClockError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("writing report {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("report {output} was written but run state was not committed: {source}")]
    StateCommit {
        output: PathBuf,
        source: StateError,
    },
}

/// Report location for `run_date`. Depends on nothing but the date and form,
/// so forced reruns overwrite the same file.
pub fn report_path(output_dir: &Path, run_date: CalendarDate, format: ReportFormat) -> PathBuf {
    output_dir.join(format!(
        "{REPORT_PREFIX}{}.{}",
        format_date(run_date),
        format.extension()
    ))
}

/// Run the once-per-day generation for the date resolved from `now`.
///
/// `now` is the only clock read: it picks the run date (absent an override)
/// and becomes `last_run_at` and the report's generation stamp.
pub fn run(req: &RunRequest<'_>, now: OffsetDateTime) -> Result<RunResult, RunError> {
    // Validation first: nothing touches the filesystem until this passes.
    let run_date = clock::resolve(req.date_override, req.timezone, now)?;
    let state_file = absolute(req.state_file);
    let output_dir = absolute(req.output_dir);

    let prior = match load_state(&state_file) {
        Ok(state) => state,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unusable run state; treating as first run");
            None
        }
    };

    if let Guard::AlreadyRunToday(state) = guard::check(prior.as_ref(), run_date, req.force) {
        if state.last_output_path.exists() {
            tracing::info!(
                run_date = %format_date(run_date),
                output = %state.last_output_path.display(),
                "tasklist already generated"
            );
            return Ok(RunResult {
                status: RunStatus::AlreadyRan,
                run_date,
                output_file: state.last_output_path.clone(),
                task_count: None,
                last_run_at: Some(state.last_run_at),
            });
        }
        tracing::warn!(
            output = %state.last_output_path.display(),
            "recorded report is missing; regenerating"
        );
    }

    let generated_at = utc_seconds(now);
    let tasks = compose(req.catalog, run_date);
    let report = Report {
        run_date,
        generated_at,
        timezone: req.timezone,
        zone_label: &req.catalog.zone_label,
        tasks: &tasks,
        agents: &req.catalog.agents,
    };
    let body = render(&report, req.format)?;

    let output_file = report_path(&output_dir, run_date, req.format);
    write_atomic(&output_file, body.as_bytes()).map_err(|source| RunError::OutputWrite {
        path: output_file.clone(),
        source,
    })?;

    // Commit only after the report is on disk.
    let state = RunState {
        last_run_date: run_date,
        last_run_at: generated_at,
        last_output_path: output_file.clone(),
        timezone: req.timezone.to_string(),
    };
    save_state(&state_file, &state).map_err(|source| RunError::StateCommit {
        output: output_file.clone(),
        source,
    })?;

    tracing::info!(
        run_date = %format_date(run_date),
        tasks = tasks.len(),
        forced = req.force,
        output = %output_file.display(),
        "tasklist generated"
    );
    Ok(RunResult {
        status: RunStatus::Generated,
        run_date,
        output_file,
        task_count: Some(tasks.len()),
        last_run_at: None,
    })
}
