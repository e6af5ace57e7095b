//! Time utilities: parsing HH:MM and submission timestamps.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

const LOCAL_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t.trim(), "%H:%M").ok()
}

/// Parse an RFC 3339 instant, or a local date-time read in `tz`.
pub fn parse_timestamp(s: &str, tz: Tz) -> AppResult<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = LOCAL_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .ok_or_else(|| AppError::InvalidTime(s.to_string()))?;

    // A local time skipped by a DST jump has no instant.
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| AppError::InvalidTime(format!("{} does not exist in {}", s, tz)))
}

pub fn parse_optional_timestamp(
    input: Option<&String>,
    tz: Tz,
) -> AppResult<Option<DateTime<Utc>>> {
    input.map(|s| parse_timestamp(s, tz)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc3339_is_taken_as_is() {
        let t = parse_timestamp("2025-09-15T06:30:00-05:00", chrono_tz::UTC).unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2025, 9, 15, 11, 30, 0).unwrap());
    }

    #[test]
    fn local_forms_use_the_timezone() {
        let tz: Tz = "America/Chicago".parse().unwrap();
        let t = parse_timestamp("2025-09-15 06:30", tz).unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2025, 9, 15, 11, 30, 0).unwrap());
    }

    #[test]
    fn garbage_and_dst_gaps_are_rejected() {
        assert!(parse_timestamp("yesterday", chrono_tz::UTC).is_err());
        let tz: Tz = "America/Chicago".parse().unwrap();
        assert!(parse_timestamp("2025-03-09 02:30", tz).is_err());
    }

    #[test]
    fn hh_mm() {
        assert_eq!(parse_time("04:30"), NaiveTime::from_hms_opt(4, 30, 0));
        assert_eq!(parse_time("4h30"), None);
    }
}
