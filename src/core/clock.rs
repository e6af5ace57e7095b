//! Business calendar: which date an instant belongs to, and which week a
//! date belongs to.

use crate::config::{Config, WeekStart};
use crate::errors::{AppError, AppResult};
use crate::utils::date::add_days;
use crate::utils::time::parse_time;
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;

#[derive(Debug, Clone, Copy)]
pub struct BusinessClock {
    tz: Tz,
    reset: NaiveTime,
    week_start: WeekStart,
}

impl BusinessClock {
    pub fn new(tz: Tz, reset: NaiveTime, week_start: WeekStart) -> Self {
        Self {
            tz,
            reset,
            week_start,
        }
    }

    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        let tz: Tz = cfg
            .timezone
            .parse()
            .map_err(|_| AppError::Config(format!("unknown timezone '{}'", cfg.timezone)))?;
        let reset = parse_time(&cfg.day_reset_time).ok_or_else(|| {
            AppError::Config(format!(
                "day_reset_time '{}' is not HH:MM",
                cfg.day_reset_time
            ))
        })?;
        Ok(Self::new(tz, reset, cfg.week_start))
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    /// Local date of `at`, where the day starts at the reset time instead of
    /// midnight. With a 03:00 reset, 02:30 local still counts as yesterday.
    pub fn business_date(&self, at: DateTime<Utc>) -> NaiveDate {
        let local = at.with_timezone(&self.tz).naive_local();
        let shift = self.reset.signed_duration_since(NaiveTime::MIN);
        (local - shift).date()
    }

    /// Inclusive seven-day range containing `date`.
    pub fn week_of(&self, date: NaiveDate) -> AppResult<(NaiveDate, NaiveDate)> {
        let offset = match self.week_start {
            WeekStart::Monday => date.weekday().num_days_from_monday(),
            WeekStart::Sunday => date.weekday().num_days_from_sunday(),
        };
        let start = date
            .checked_sub_days(chrono::Days::new(offset as u64))
            .ok_or_else(|| AppError::InvalidDate(date.to_string()))?;
        let end = add_days(start, 6).ok_or_else(|| AppError::InvalidDate(date.to_string()))?;
        Ok((start, end))
    }
}

impl Default for BusinessClock {
    fn default() -> Self {
        Self::new(chrono_tz::UTC, NaiveTime::MIN, WeekStart::Monday)
    }
}
