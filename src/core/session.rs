//! Work-session aggregator: opens and closes driver sessions and computes
//! daily and weekly totals.
//!
//! Totals are computed at query time. A closed session contributes its cached
//! duration; an open session contributes `now - start_time`, so today's total
//! keeps growing while past days stay fixed.

use crate::core::clock::BusinessClock;
use crate::db::store::SessionStore;
use crate::errors::{AppError, AppResult};
use crate::models::driver::DriverId;
use crate::models::work_session::WorkSession;
use crate::utils::date::dates_between;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Longest range a timecard covers, in days.
pub const MAX_TIMECARD_DAYS: i64 = 366;

pub struct Aggregator<'a, S: SessionStore + ?Sized> {
    store: &'a S,
    clock: &'a BusinessClock,
}

/// Per-day line of a timecard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimecardDay {
    pub date: NaiveDate,
    pub sessions: usize,
    pub seconds: i64,
    pub open: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Timecard {
    pub driver_id: DriverId,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub days: Vec<TimecardDay>,
    pub total_seconds: i64,
}

impl<'a, S: SessionStore + ?Sized> Aggregator<'a, S> {
    pub fn new(store: &'a S, clock: &'a BusinessClock) -> Self {
        Self { store, clock }
    }

    /// Open a session at `at`. Fails with `Conflict` when the driver already
    /// has an open session, whatever its date.
    pub fn start_session(&self, driver: &DriverId, at: DateTime<Utc>) -> AppResult<WorkSession> {
        let work_date = self.clock.business_date(at);
        let session = self
            .store
            .insert_open(&WorkSession::open(driver.clone(), work_date, at))?;

        tracing::info!(
            driver = %driver,
            session = session.id,
            %work_date,
            "session started"
        );
        Ok(session)
    }

    /// Close the driver's most recently started open session at `at`.
    pub fn end_session(&self, driver: &DriverId, at: DateTime<Utc>) -> AppResult<WorkSession> {
        let mut session = self.store.find_open(driver)?.ok_or_else(|| {
            AppError::NotFound(format!("no active session to close for driver {}", driver))
        })?;

        session.close(at)?;
        self.store.update(&session)?;

        tracing::info!(
            driver = %driver,
            session = session.id,
            seconds = session.duration_seconds,
            "session ended"
        );
        Ok(session)
    }

    /// Seconds worked on `date`, counting an open session up to `now`.
    pub fn daily_total(
        &self,
        driver: &DriverId,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> AppResult<i64> {
        let sessions = self.store.find(driver, date)?;
        Ok(sessions.iter().map(|s| s.seconds_at(now)).sum())
    }

    /// Sum of [`Self::daily_total`] over `week_start..=week_end`.
    pub fn weekly_total(
        &self,
        driver: &DriverId,
        week_start: NaiveDate,
        week_end: NaiveDate,
        now: DateTime<Utc>,
    ) -> AppResult<i64> {
        Ok(self.timecard(driver, week_start, week_end, now)?.total_seconds)
    }

    /// One line per date of `from..=to`, dates without sessions included.
    pub fn timecard(
        &self,
        driver: &DriverId,
        from: NaiveDate,
        to: NaiveDate,
        now: DateTime<Utc>,
    ) -> AppResult<Timecard> {
        if from > to {
            return Err(AppError::Validation(format!(
                "range start {} is after range end {}",
                from, to
            )));
        }
        let span = (to - from).num_days() + 1;
        if span > MAX_TIMECARD_DAYS {
            return Err(AppError::Validation(format!(
                "range {} to {} spans {} days (at most {})",
                from, to, span, MAX_TIMECARD_DAYS
            )));
        }

        let mut by_date: BTreeMap<NaiveDate, Vec<WorkSession>> = BTreeMap::new();
        for s in self.store.find_range(driver, from, to)? {
            by_date.entry(s.work_date).or_default().push(s);
        }

        let days: Vec<TimecardDay> = dates_between(from, to)
            .map(|date| {
                let sessions = by_date.get(&date).map(Vec::as_slice).unwrap_or(&[]);
                TimecardDay {
                    date,
                    sessions: sessions.len(),
                    seconds: sessions.iter().map(|s| s.seconds_at(now)).sum(),
                    open: sessions.iter().any(WorkSession::is_open),
                }
            })
            .collect();

        let total_seconds = days.iter().map(|d| d.seconds).sum();

        Ok(Timecard {
            driver_id: driver.clone(),
            from,
            to,
            days,
            total_seconds,
        })
    }

    /// Sessions of `driver` between two business dates.
    pub fn sessions(
        &self,
        driver: &DriverId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<WorkSession>> {
        self.store.find_range(driver, from, to)
    }
}
