use crate::types::{format_date, format_ts, AgentRow, CalendarDate, TaskRecord};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

pub const REPORT_TITLE: &str = "Miami3PL Daily Passive Customs Ops Tasklist";

/// Marker carried by every freshly generated task.
pub const PENDING_MARKER: &str = "PENDING";

/// Closing standard-operating-procedure guidance.
pub const SOP_LINES: &[&str] = &[
    "Escalate critical customs or safety risks immediately.",
    "Keep handoff notes concise and professional.",
    "Carry unresolved tasks into the next day with owner and blocker noted.",
];

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("serializing report: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown report format '{0}' (expected markdown or json)")]
    UnknownFormat(String),
}

/// Document form written to the output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Sectioned checklist for people.
    #[default]
    Markdown,
    /// Field-complete JSON for further processing.
    Json,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Markdown => "markdown",
            ReportFormat::Json => "json",
        }
    }

    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Markdown => "md",
            ReportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "json" => Ok(ReportFormat::Json),
            other => Err(RenderError::UnknownFormat(other.to_string())),
        }
    }
}

/// Everything a report is rendered from. Rendering never samples the clock.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    pub run_date: CalendarDate,
    pub generated_at: OffsetDateTime,
    pub timezone: &'a str,
    /// Printed after each due time; may be empty.
    pub zone_label: &'a str,
    pub tasks: &'a [TaskRecord],
    pub agents: &'a [AgentRow],
}

/// Render `report` in `format`. Same inputs give byte-identical output.
pub fn render(report: &Report<'_>, format: ReportFormat) -> Result<String, RenderError> {
    match format {
        ReportFormat::Markdown => Ok(render_markdown(report)),
        ReportFormat::Json => render_json(report),
    }
}

// ── Markdown ──

/// One checklist line: marker, priority, owner, description, due time.
pub fn checklist_line(task: &TaskRecord, zone_label: &str) -> String {
    let due = if zone_label.is_empty() {
        task.due_time.clone()
    } else {
        format!("{} {}", task.due_time, zone_label)
    };
    format!(
        "- [ ] [{PENDING_MARKER}] [{}] [{}] {} (Due {due})",
        task.priority, task.owner, task.description
    )
}

fn render_markdown(report: &Report<'_>) -> String {
    let ts = format_ts(report.generated_at);
    let mut out = String::new();

    out.push_str(&format!(
        "# {REPORT_TITLE} - {}\n\n",
        format_date(report.run_date)
    ));
    out.push_str(&format!("Generated (UTC): {ts}\n"));
    out.push_str(&format!("Operating timezone: {}\n\n", report.timezone));
    out.push_str(&format!("TODO LIST ({ts})\n\n"));

    for task in report.tasks {
        out.push_str(&checklist_line(task, report.zone_label));
        out.push('\n');
    }

    out.push_str("\n## Research Agent Matrix\n\n");
    out.push_str("| Agent | Scope | Deliverable | SLA |\n");
    out.push_str("| --- | --- | --- | --- |\n");
    for row in report.agents {
        out.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            row.agent, row.scope, row.deliverable, row.sla
        ));
    }

    out.push_str("\n## SOP Completion Standard\n\n");
    for line in SOP_LINES {
        out.push_str(&format!("- {line}\n"));
    }
    out
}

// ── JSON ──

#[derive(Serialize)]
struct ReportDocument<'a> {
    title: &'static str,
    run_date: String,
    generated_at_utc: String,
    timezone: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    zone_label: &'a str,
    tasks: Vec<TaskEntry<'a>>,
    agents: &'a [AgentRow],
    sop: &'static [&'static str],
}

#[derive(Serialize)]
struct TaskEntry<'a> {
    status: &'static str,
    #[serde(flatten)]
    task: &'a TaskRecord,
}

fn render_json(report: &Report<'_>) -> Result<String, RenderError> {
    let doc = ReportDocument {
        title: REPORT_TITLE,
        run_date: format_date(report.run_date),
        generated_at_utc: format_ts(report.generated_at),
        timezone: report.timezone,
        zone_label: report.zone_label,
        tasks: report
            .tasks
            .iter()
            .map(|task| TaskEntry {
                status: "pending",
                task,
            })
            .collect(),
        agents: report.agents,
        sop: SOP_LINES,
    };
    let mut out = serde_json::to_string_pretty(&doc)?;
    out.push('\n');
    Ok(out)
}
