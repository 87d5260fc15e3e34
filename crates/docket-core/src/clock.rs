use crate::types::{parse_iso_date, CalendarDate};
use chrono::{Datelike, TimeZone};
use chrono_tz::Tz;
use time::{Month, OffsetDateTime};

/// Zone used when none is configured.
pub const DEFAULT_TIMEZONE: &str = "America/New_York";

#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    #[error("invalid date '{input}': {reason}")]
    InvalidDateFormat { input: String, reason: String },
    #[error("invalid timezone '{0}': not found in the zone database")]
    UnknownTimezone(String),
    #[error("instant {0} is outside the supported calendar range")]
    OutOfRange(OffsetDateTime),
}

/// Look up an IANA zone name.
pub fn parse_timezone(name: &str) -> Result<Tz, ClockError> {
    name.parse::<Tz>()
        .map_err(|_| ClockError::UnknownTimezone(name.to_string()))
}

/// Resolve the run date for one invocation.
///
/// An explicit `override_date` wins and must be strict `YYYY-MM-DD`.
/// Otherwise `now` is converted into `timezone`'s local calendar day. The
/// zone is validated either way since it is recorded alongside the run.
pub fn resolve(
    override_date: Option<&str>,
    timezone: &str,
    now: OffsetDateTime,
) -> Result<CalendarDate, ClockError> {
    let tz = parse_timezone(timezone)?;

    if let Some(input) = override_date {
        return parse_iso_date(input).map_err(|reason| ClockError::InvalidDateFormat {
            input: input.to_string(),
            reason,
        });
    }

    local_date(&tz, now)
}

fn local_date(tz: &Tz, now: OffsetDateTime) -> Result<CalendarDate, ClockError> {
    let local = tz
        .timestamp_opt(now.unix_timestamp(), 0)
        .single()
        .ok_or(ClockError::OutOfRange(now))?;
    let naive = local.date_naive();
    let month = u8::try_from(naive.month())
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .ok_or(ClockError::OutOfRange(now))?;
    let day = u8::try_from(naive.day()).map_err(|_| ClockError::OutOfRange(now))?;
    CalendarDate::from_calendar_date(naive.year(), month, day)
        .map_err(|_| ClockError::OutOfRange(now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn override_wins_over_clock() {
        let now = datetime!(2024-06-03 12:00 UTC);
        let d = resolve(Some("2023-12-31"), DEFAULT_TIMEZONE, now).unwrap();
        assert_eq!(d, date!(2023 - 12 - 31));
    }

    #[test]
    fn malformed_override_rejected() {
        let now = datetime!(2024-06-03 12:00 UTC);
        for bad in ["2024-13-40", "24-06-03", "2024/06/03", "", "2024-02-30"] {
            let err = resolve(Some(bad), DEFAULT_TIMEZONE, now).unwrap_err();
            assert!(
                matches!(err, ClockError::InvalidDateFormat { ref input, .. } if input == bad),
                "expected InvalidDateFormat for {bad:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn unknown_timezone_rejected() {
        let now = datetime!(2024-06-03 12:00 UTC);
        let err = resolve(None, "Not/AZone", now).unwrap_err();
        assert!(matches!(err, ClockError::UnknownTimezone(ref z) if z == "Not/AZone"));
        assert!(err.to_string().contains("Not/AZone"));
    }

    #[test]
    fn unknown_timezone_rejected_even_with_override() {
        let now = datetime!(2024-06-03 12:00 UTC);
        let err = resolve(Some("2024-06-03"), "Not/AZone", now).unwrap_err();
        assert!(matches!(err, ClockError::UnknownTimezone(_)));
    }

    #[test]
    fn converts_instant_into_local_day() {
        // 02:30 UTC on June 4 is still June 3 in New York (UTC-4 in summer)
        let now = datetime!(2024-06-04 02:30 UTC);
        assert_eq!(
            resolve(None, "America/New_York", now).unwrap(),
            date!(2024 - 06 - 03)
        );
        assert_eq!(resolve(None, "UTC", now).unwrap(), date!(2024 - 06 - 04));
        // Tokyo is already on June 4 at 11:30
        assert_eq!(
            resolve(None, "Asia/Tokyo", now).unwrap(),
            date!(2024 - 06 - 04)
        );
    }

    #[test]
    fn offset_of_injected_instant_is_irrelevant() {
        let a = datetime!(2024-06-04 02:30 UTC);
        let b = datetime!(2024-06-03 22:30 -4);
        assert_eq!(
            resolve(None, "Europe/Berlin", a).unwrap(),
            resolve(None, "Europe/Berlin", b).unwrap()
        );
    }
}
