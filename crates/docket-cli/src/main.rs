mod cmd_generate;
mod settings;

use clap::{Parser, ValueEnum};
use docket_core::ReportFormat;
use settings::{Overrides, Settings, SettingsFile};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "docket",
    version,
    about = "Generate the Miami3PL daily passive customs and operations tasklist"
)]
struct Cli {
    /// Generate a new tasklist even if one was already generated for the date
    #[arg(long)]
    force: bool,
    /// Run date in YYYY-MM-DD format (defaults to today in the timezone)
    #[arg(long = "date", value_name = "YYYY-MM-DD")]
    date_override: Option<String>,
    /// IANA timezone (default: America/New_York)
    #[arg(long, value_name = "NAME")]
    timezone: Option<String>,
    /// Path to the run-state file
    #[arg(long, value_name = "PATH")]
    state_file: Option<PathBuf>,
    /// Directory for generated tasklists
    #[arg(long, value_name = "PATH")]
    output_dir: Option<PathBuf>,
    /// Emit machine-readable JSON to stdout
    #[arg(long)]
    json: bool,
    /// Form of the written report
    #[arg(long, value_enum)]
    format: Option<FormatArg>,
    /// Task catalog YAML (defaults to the built-in catalog)
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,
    /// YAML settings file supplying defaults for the options above
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Log debug detail to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    #[value(alias = "md")]
    Markdown,
    Json,
}

impl From<FormatArg> for ReportFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Markdown => ReportFormat::Markdown,
            FormatArg::Json => ReportFormat::Json,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "docket=debug,warn" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let file = match &cli.config {
        Some(path) => SettingsFile::load(path)?,
        None => SettingsFile::default(),
    };
    let settings = Settings::resolve(
        file,
        Overrides {
            timezone: cli.timezone,
            state_file: cli.state_file,
            output_dir: cli.output_dir,
            catalog: cli.catalog,
            format: cli.format.map(ReportFormat::from),
        },
    )?;
    tracing::debug!(?settings, "effective settings");

    cmd_generate::execute(
        &cmd_generate::GenerateParams {
            settings: &settings,
            force: cli.force,
            date_override: cli.date_override.as_deref(),
            json: cli.json,
        },
        time::OffsetDateTime::now_utc(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format_of(args: &[&str]) -> Option<ReportFormat> {
        let argv = std::iter::once("docket").chain(args.iter().copied());
        Cli::try_parse_from(argv).unwrap().format.map(ReportFormat::from)
    }

    #[test]
    fn format_flag_accepts_settings_spellings() {
        assert_eq!(format_of(&["--format", "markdown"]), Some(ReportFormat::Markdown));
        assert_eq!(format_of(&["--format", "md"]), Some(ReportFormat::Markdown));
        assert_eq!(format_of(&["--format", "json"]), Some(ReportFormat::Json));
        assert_eq!(format_of(&[]), None);
        for spelling in ["markdown", "md", "json"] {
            assert!(spelling.parse::<ReportFormat>().is_ok());
        }
    }

    #[test]
    fn format_flag_rejects_unknown() {
        assert!(Cli::try_parse_from(["docket", "--format", "pdf"]).is_err());
    }
}
