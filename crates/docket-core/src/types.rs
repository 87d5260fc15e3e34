use serde::{Deserialize, Serialize};
use std::fmt;
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

/// A calendar day with no time-of-day, resolved once per run.
pub type CalendarDate = time::Date;

const ISO_DATE: &[time::format_description::BorrowedFormatItem<'static>] =
    time::macros::format_description!("[year]-[month]-[day]");

/// Task urgency as printed in the checklist (`HIGH`, `MEDIUM`, `LOW`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of work in a catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TaskRecord {
    pub priority: Priority,
    /// Role responsible for the task.
    pub owner: String,
    /// Local wall-clock time (`HH:MM`), read in the operating timezone.
    pub due_time: String,
    pub description: String,
}

/// Static reference row for the research agent matrix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AgentRow {
    pub agent: String,
    pub scope: String,
    pub deliverable: String,
    pub sla: String,
}

/// Normalize an instant to UTC with the sub-second part dropped.
pub fn utc_seconds(ts: OffsetDateTime) -> OffsetDateTime {
    let ts = ts.to_offset(UtcOffset::UTC);
    ts.replace_nanosecond(0).unwrap_or(ts)
}

/// RFC 3339 form used for every timestamp docket writes.
pub fn format_ts(ts: OffsetDateTime) -> String {
    utc_seconds(ts).format(&Rfc3339).unwrap_or_default()
}

/// `YYYY-MM-DD` form of a calendar date.
pub fn format_date(date: CalendarDate) -> String {
    date.format(ISO_DATE).unwrap_or_default()
}

/// Parse a strict `YYYY-MM-DD` date.
///
/// Only the exact ten-character shape is accepted: no two-digit years, no
/// signs, no week or ordinal forms, no clamping of out-of-range days.
/// Year 0000 is rejected; the first representable day is 0001-01-01.
pub fn parse_iso_date(input: &str) -> Result<CalendarDate, String> {
    let bytes = input.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shape_ok {
        return Err("expected YYYY-MM-DD".to_string());
    }
    if &input[..4] == "0000" {
        return Err("year must be 0001 or later".to_string());
    }
    CalendarDate::parse(input, ISO_DATE).map_err(|e| e.to_string())
}

/// `YYYY-MM-DD` serde form for `CalendarDate` fields.
pub mod iso_date {
    use super::{format_date, parse_iso_date, CalendarDate};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &CalendarDate, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<CalendarDate, D::Error> {
        let raw = String::deserialize(d)?;
        parse_iso_date(&raw).map_err(serde::de::Error::custom)
    }
}
