use crate::types::{AgentRow, TaskRecord};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use time::Weekday;

/// Catalog shipped with the binary.
pub const DEFAULT_CATALOG_YAML: &str = include_str!("../catalog/default.yaml");

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("reading catalog {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid catalog YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("unknown start_of_week '{0}' (expected an English weekday name)")]
    UnknownWeekday(String),
    #[error("catalog '{catalog}' task #{index}: field '{field}' is empty")]
    EmptyField {
        catalog: CatalogName,
        index: usize,
        field: &'static str,
    },
    #[error("agent row #{index}: field '{field}' is empty")]
    EmptyAgentField { index: usize, field: &'static str },
    #[error("catalog 'base' must contain at least one task")]
    EmptyBase,
}

/// The recognized catalogs, in composition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogName {
    Base,
    Weekly,
    MonthStart,
}

impl CatalogName {
    pub const ALL: [CatalogName; 3] = [
        CatalogName::Base,
        CatalogName::Weekly,
        CatalogName::MonthStart,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogName::Base => "base",
            CatalogName::Weekly => "weekly",
            CatalogName::MonthStart => "month_start",
        }
    }
}

impl fmt::Display for CatalogName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated task content: the three catalogs plus the agent matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCatalog {
    /// Weekday that pulls in the `weekly` catalog.
    pub start_of_week: Weekday,
    /// Label printed after due times, e.g. `ET`.
    pub zone_label: String,
    pub base: Vec<TaskRecord>,
    pub weekly: Vec<TaskRecord>,
    pub month_start: Vec<TaskRecord>,
    pub agents: Vec<AgentRow>,
}

impl TaskCatalog {
    pub fn tasks(&self, name: CatalogName) -> &[TaskRecord] {
        match name {
            CatalogName::Base => &self.base,
            CatalogName::Weekly => &self.weekly,
            CatalogName::MonthStart => &self.month_start,
        }
    }
}

// ── On-disk shape ──

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCatalog {
    #[serde(default = "default_start_of_week")]
    start_of_week: String,
    #[serde(default)]
    zone_label: String,
    catalogs: RawCatalogSets,
    #[serde(default)]
    agents: Vec<AgentRow>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCatalogSets {
    base: Vec<TaskRecord>,
    #[serde(default)]
    weekly: Vec<TaskRecord>,
    #[serde(default)]
    month_start: Vec<TaskRecord>,
}

fn default_start_of_week() -> String {
    "monday".into()
}

// ── Loading ──

/// The embedded reference catalog.
pub fn default_catalog() -> Result<TaskCatalog, CatalogError> {
    parse_catalog(DEFAULT_CATALOG_YAML)
}

/// Load and validate a catalog from a YAML file.
pub fn load_catalog(path: &Path) -> Result<TaskCatalog, CatalogError> {
    let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_catalog(&content)
}

/// Parse and validate a catalog from a YAML string.
pub fn parse_catalog(yaml: &str) -> Result<TaskCatalog, CatalogError> {
    let raw: RawCatalog = serde_yaml::from_str(yaml)?;
    let start_of_week = parse_weekday(&raw.start_of_week)?;

    let catalog = TaskCatalog {
        start_of_week,
        zone_label: raw.zone_label.trim().to_string(),
        base: raw.catalogs.base,
        weekly: raw.catalogs.weekly,
        month_start: raw.catalogs.month_start,
        agents: raw.agents,
    };
    validate_catalog(&catalog)?;
    Ok(catalog)
}

fn parse_weekday(name: &str) -> Result<Weekday, CatalogError> {
    let day = match name.trim().to_ascii_lowercase().as_str() {
        "monday" => Weekday::Monday,
        "tuesday" => Weekday::Tuesday,
        "wednesday" => Weekday::Wednesday,
        "thursday" => Weekday::Thursday,
        "friday" => Weekday::Friday,
        "saturday" => Weekday::Saturday,
        "sunday" => Weekday::Sunday,
        _ => return Err(CatalogError::UnknownWeekday(name.to_string())),
    };
    Ok(day)
}

fn validate_catalog(catalog: &TaskCatalog) -> Result<(), CatalogError> {
    if catalog.base.is_empty() {
        return Err(CatalogError::EmptyBase);
    }

    for name in CatalogName::ALL {
        for (index, task) in catalog.tasks(name).iter().enumerate() {
            let fields = [
                ("owner", &task.owner),
                ("due_time", &task.due_time),
                ("description", &task.description),
            ];
            if let Some((field, _)) = fields.iter().find(|(_, v)| v.trim().is_empty()) {
                return Err(CatalogError::EmptyField {
                    catalog: name,
                    index,
                    field: *field,
                });
            }
        }
    }

    for (index, row) in catalog.agents.iter().enumerate() {
        let fields = [
            ("agent", &row.agent),
            ("scope", &row.scope),
            ("deliverable", &row.deliverable),
            ("sla", &row.sla),
        ];
        if let Some((field, _)) = fields.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(CatalogError::EmptyAgentField {
                index,
                field: *field,
            });
        }
    }
    Ok(())
}
