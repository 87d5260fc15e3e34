use anyhow::Context;
use docket_core::catalog::{default_catalog, load_catalog};
use docket_core::clock::DEFAULT_TIMEZONE;
use docket_core::{ReportFormat, TaskCatalog};
use docket_store::expand_home;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Optional YAML settings file. Every key may be omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    pub timezone: Option<String>,
    pub state_file: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub catalog: Option<PathBuf>,
    pub format: Option<String>,
}

impl SettingsFile {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("parsing settings: {}", path.display()))
    }

    pub fn parse(yaml: &str) -> anyhow::Result<Self> {
        // An empty file is a valid "all defaults" settings file.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }
}

/// Values given on the command line; `None` means "not given".
#[derive(Debug, Default)]
pub struct Overrides {
    pub timezone: Option<String>,
    pub state_file: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub catalog: Option<PathBuf>,
    pub format: Option<ReportFormat>,
}

/// Effective settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub timezone: String,
    pub state_file: PathBuf,
    pub output_dir: PathBuf,
    pub catalog: Option<PathBuf>,
    pub format: ReportFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            state_file: docket_store::default_state_file(),
            output_dir: docket_store::default_output_dir(),
            catalog: None,
            format: ReportFormat::default(),
        }
    }
}

impl Settings {
    /// Layer defaults, then the settings file, then command-line flags.
    pub fn resolve(file: SettingsFile, cli: Overrides) -> anyhow::Result<Self> {
        let defaults = Settings::default();
        let file_format = file
            .format
            .as_deref()
            .map(str::parse::<ReportFormat>)
            .transpose()
            .context("settings key 'format'")?;

        Ok(Settings {
            timezone: cli.timezone.or(file.timezone).unwrap_or(defaults.timezone),
            state_file: expand_home(
                &cli.state_file
                    .or(file.state_file)
                    .unwrap_or(defaults.state_file),
            ),
            output_dir: expand_home(
                &cli.output_dir
                    .or(file.output_dir)
                    .unwrap_or(defaults.output_dir),
            ),
            catalog: cli.catalog.or(file.catalog).map(|p| expand_home(&p)),
            format: cli.format.or(file_format).unwrap_or(defaults.format),
        })
    }

    /// The configured catalog, or the embedded one.
    pub fn load_catalog(&self) -> anyhow::Result<TaskCatalog> {
        match &self.catalog {
            Some(path) => {
                load_catalog(path).with_context(|| format!("loading catalog {}", path.display()))
            }
            None => default_catalog().context("embedded catalog is invalid"),
        }
    }
}
