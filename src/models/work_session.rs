use super::driver::DriverId;
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// One continuous clocked-in interval for a driver.
///
/// A session is opened by a pre-trip checklist and closed by the next
/// post-trip checklist of the same driver. `work_date` is the business date
/// of `start_time` and never moves, even when the close happens after the
/// daily reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkSession {
    pub id: i64,
    pub driver_id: DriverId,
    pub work_date: NaiveDate,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_seconds: Option<i64>,
}

impl WorkSession {
    /// New open session, not yet stored (`id == 0`).
    pub fn open(driver_id: DriverId, work_date: NaiveDate, start_time: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            driver_id,
            work_date,
            start_time,
            end_time: None,
            duration_seconds: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// Stamp `end_time` and the cached duration.
    pub fn close(&mut self, at: DateTime<Utc>) -> AppResult<()> {
        if !self.is_open() {
            return Err(AppError::Conflict(format!(
                "session {} is already closed",
                self.id
            )));
        }
        if at <= self.start_time {
            return Err(AppError::Validation(format!(
                "post-trip at {} is not after pre-trip at {}",
                at.to_rfc3339(),
                self.start_time.to_rfc3339()
            )));
        }

        self.end_time = Some(at);
        self.duration_seconds = Some(elapsed_seconds(self.start_time, at));
        Ok(())
    }

    /// Seconds counted for this session as of `now`: the cached duration when
    /// closed, the live elapsed time otherwise.
    pub fn seconds_at(&self, now: DateTime<Utc>) -> i64 {
        match self.duration_seconds {
            Some(d) => d,
            None => elapsed_seconds(self.start_time, now),
        }
    }
}

/// Whole seconds from `start` to `end`, floored and never negative.
pub fn elapsed_seconds(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let delta = end - start;
    // num_seconds truncates toward zero; clamp handles the negative side.
    delta.num_seconds().max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 15, h, m, s).unwrap()
    }

    fn sample() -> WorkSession {
        WorkSession::open(
            DriverId::parse("drv1").unwrap(),
            NaiveDate::from_ymd_opt(2025, 9, 15).unwrap(),
            at(6, 0, 0),
        )
    }

    #[test]
    fn close_caches_whole_seconds() {
        let mut s = sample();
        let end = at(7, 30, 0) + Duration::milliseconds(900);
        s.close(end).unwrap();
        assert_eq!(s.duration_seconds, Some(5400));
        assert_eq!(s.end_time, Some(end));
        assert!(!s.is_open());
    }

    #[test]
    fn close_rejects_end_not_after_start() {
        let mut s = sample();
        assert!(matches!(s.close(at(6, 0, 0)), Err(AppError::Validation(_))));
        assert!(matches!(s.close(at(5, 59, 0)), Err(AppError::Validation(_))));
        assert!(s.is_open());
    }

    #[test]
    fn close_twice_is_a_conflict() {
        let mut s = sample();
        s.close(at(8, 0, 0)).unwrap();
        assert!(matches!(s.close(at(9, 0, 0)), Err(AppError::Conflict(_))));
    }

    #[test]
    fn live_seconds_clamp_to_zero_on_skew() {
        let s = sample();
        assert_eq!(s.seconds_at(at(5, 0, 0)), 0);
        assert_eq!(s.seconds_at(at(6, 10, 0)), 600);
    }
}
