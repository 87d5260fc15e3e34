pub mod guard;
pub mod run;

pub use guard::Guard;
pub use run::{report_path, run, RunError, RunRequest, RunResult, RunStatus};
