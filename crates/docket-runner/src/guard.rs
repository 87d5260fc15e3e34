use docket_core::CalendarDate;
use docket_store::RunState;

/// Where an invocation stands relative to the once-per-day guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard<'a> {
    /// Generate: no prior run for this date, or the guard was forced open.
    NotRunToday,
    /// A run for this date is already recorded; nothing may be written.
    AlreadyRunToday(&'a RunState),
}

/// Evaluate the guard for `run_date`.
///
/// `force` only bypasses this check; the generation branch that follows
/// still commits a fresh `RunState`.
pub fn check(prior: Option<&RunState>, run_date: CalendarDate, force: bool) -> Guard<'_> {
    match prior {
        Some(state) if !force && state.covers(run_date) => Guard::AlreadyRunToday(state),
        _ => Guard::NotRunToday,
    }
}
