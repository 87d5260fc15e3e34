use crate::settings::Settings;
use anyhow::Context;
use docket_core::{format_date, format_ts};
use docket_runner::{run, RunRequest, RunResult, RunStatus};
use std::io::Write;
use time::OffsetDateTime;

/// Parameters for the default `docket` invocation.
pub struct GenerateParams<'a> {
    pub settings: &'a Settings,
    pub force: bool,
    pub date_override: Option<&'a str>,
    pub json: bool,
}

/// Generate today's tasklist unless it already exists, then report the outcome.
pub fn execute(params: &GenerateParams<'_>, now: OffsetDateTime) -> anyhow::Result<()> {
    let settings = params.settings;
    let catalog = settings.load_catalog()?;

    let req = RunRequest {
        force: params.force,
        date_override: params.date_override,
        timezone: &settings.timezone,
        state_file: &settings.state_file,
        output_dir: &settings.output_dir,
        format: settings.format,
        catalog: &catalog,
    };
    let result = run(&req, now).context("tasklist generation failed")?;

    let stdout = std::io::stdout();
    emit(&result, params.json, &mut stdout.lock())?;
    Ok(())
}

/// Print the outcome: pretty JSON with `--json`, a short banner otherwise.
pub fn emit(result: &RunResult, json: bool, out: &mut impl Write) -> anyhow::Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(result)?)?;
        return Ok(());
    }

    let run_date = format_date(result.run_date);
    match result.status {
        RunStatus::AlreadyRan => {
            let at = result
                .last_run_at
                .map(format_ts)
                .unwrap_or_else(|| "unknown".to_string());
            writeln!(
                out,
                "PASSIVE: Tasklist already generated for {run_date} at {at}."
            )?;
            writeln!(out, "Reusing: {}", result.output_file.display())?;
        }
        RunStatus::Generated => {
            writeln!(out, "Generated: {}", result.output_file.display())?;
            writeln!(out, "Run date: {run_date}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use time::macros::{date, datetime};

    fn generated() -> RunResult {
        RunResult {
            status: RunStatus::Generated,
            run_date: date!(2024 - 06 - 03),
            output_file: PathBuf::from("/out/daily-tasklist-2024-06-03.md"),
            task_count: Some(9),
            last_run_at: None,
        }
    }

    fn emitted(result: &RunResult, json: bool) -> String {
        let mut buf = Vec::new();
        emit(result, json, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn generated_banner() {
        assert_eq!(
            emitted(&generated(), false),
            "Generated: /out/daily-tasklist-2024-06-03.md\nRun date: 2024-06-03\n"
        );
    }

    #[test]
    fn already_ran_banner() {
        let r = RunResult {
            status: RunStatus::AlreadyRan,
            task_count: None,
            last_run_at: Some(datetime!(2024-06-03 13:00 UTC)),
            ..generated()
        };
        assert_eq!(
            emitted(&r, false),
            "PASSIVE: Tasklist already generated for 2024-06-03 at 2024-06-03T13:00:00Z.\n\
             Reusing: /out/daily-tasklist-2024-06-03.md\n"
        );
    }

    #[test]
    fn already_ran_without_timestamp_says_unknown() {
        let r = RunResult {
            status: RunStatus::AlreadyRan,
            task_count: None,
            last_run_at: None,
            ..generated()
        };
        assert!(emitted(&r, false).contains(" at unknown."));
    }

    #[test]
    fn json_emission() {
        let out = emitted(&generated(), true);
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["status"], "generated");
        assert_eq!(v["output_file"], "/out/daily-tasklist-2024-06-03.md");
        assert_eq!(v["task_count"], 9);
    }

    #[test]
    fn execute_writes_report_and_state() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            state_file: dir.path().join("state").join("last_run.json"),
            output_dir: dir.path().join("outputs"),
            ..Settings::default()
        };
        let params = GenerateParams {
            settings: &settings,
            force: false,
            date_override: Some("2024-06-03"),
            json: true,
        };
        execute(&params, datetime!(2024-06-03 13:00 UTC)).unwrap();
        assert!(dir
            .path()
            .join("outputs")
            .join("daily-tasklist-2024-06-03.md")
            .exists());
        assert!(settings.state_file.exists());
    }

    #[test]
    fn execute_rejects_bad_input_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            timezone: "Not/AZone".into(),
            state_file: dir.path().join("state").join("last_run.json"),
            output_dir: dir.path().join("outputs"),
            ..Settings::default()
        };
        let params = GenerateParams {
            settings: &settings,
            force: false,
            date_override: None,
            json: false,
        };
        let err = execute(&params, datetime!(2024-06-03 13:00 UTC)).unwrap_err();
        assert!(format!("{err:#}").contains("Not/AZone"));
        assert!(!dir.path().join("outputs").exists());
        assert!(!settings.state_file.exists());
    }
}
