//! Session store: the data-access boundary for work sessions.
//!
//! Rows are validated into [`WorkSession`] on read; a row that breaks the
//! session invariants is reported as a storage error instead of flowing into
//! the totals.

use crate::errors::{AppError, AppResult};
use crate::models::driver::DriverId;
use crate::models::work_session::{WorkSession, elapsed_seconds};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{Connection, ErrorCode, Row, params};

/// Read/write interface the aggregator works against.
pub trait SessionStore {
    /// All sessions of `driver` attributed to `work_date`, by start time.
    fn find(&self, driver: &DriverId, work_date: NaiveDate) -> AppResult<Vec<WorkSession>>;

    /// Sessions of `driver` with `from <= work_date <= to`, by start time.
    fn find_range(
        &self,
        driver: &DriverId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<WorkSession>>;

    /// The most recently started open session of `driver`, if any.
    fn find_open(&self, driver: &DriverId) -> AppResult<Option<WorkSession>>;

    /// Insert `session` only if the driver has no open session.
    /// The check and the insert are one atomic statement; a second open
    /// session fails with [`AppError::Conflict`].
    fn insert_open(&self, session: &WorkSession) -> AppResult<WorkSession>;

    /// Persist the close fields of a stored open session. Fails with
    /// [`AppError::NotFound`] when the row is gone or already closed.
    fn update(&self, session: &WorkSession) -> AppResult<()>;
}

pub fn ts_to_db(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn ts_from_db(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn conversion_error(idx: usize, e: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
}

pub fn map_session_row(row: &Row) -> rusqlite::Result<WorkSession> {
    let id: i64 = row.get("id")?;
    let driver_raw: String = row.get("driver_id")?;
    let date_str: String = row.get("work_date")?;
    let start_str: String = row.get("start_time")?;
    let end_str: Option<String> = row.get("end_time")?;
    let duration: Option<i64> = row.get("duration_seconds")?;

    let driver_id = DriverId::parse(&driver_raw).map_err(|e| conversion_error(1, e))?;

    let work_date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|_| conversion_error(2, AppError::InvalidDate(date_str.clone())))?;

    let start_time = ts_from_db(&start_str)
        .ok_or_else(|| conversion_error(3, AppError::InvalidTime(start_str.clone())))?;

    let end_time = match end_str {
        Some(s) => Some(
            ts_from_db(&s).ok_or_else(|| conversion_error(4, AppError::InvalidTime(s.clone())))?,
        ),
        None => None,
    };

    match (end_time, duration) {
        (None, None) => {}
        (Some(end), Some(d)) if end > start_time && d == elapsed_seconds(start_time, end) => {}
        _ => {
            return Err(conversion_error(
                4,
                AppError::Validation(format!("session {} has inconsistent close fields", id)),
            ));
        }
    }

    Ok(WorkSession {
        id,
        driver_id,
        work_date,
        start_time,
        end_time,
        duration_seconds: duration,
    })
}

fn collect(
    stmt: &mut rusqlite::Statement<'_>,
    params: impl rusqlite::Params,
) -> AppResult<Vec<WorkSession>> {
    let rows = stmt.query_map(params, map_session_row)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

impl SessionStore for Connection {
    fn find(&self, driver: &DriverId, work_date: NaiveDate) -> AppResult<Vec<WorkSession>> {
        let mut stmt = self.prepare_cached(
            "SELECT * FROM work_sessions
             WHERE driver_id = ?1 AND work_date = ?2
             ORDER BY start_time ASC",
        )?;
        collect(&mut stmt, params![driver.as_str(), work_date.to_string()])
    }

    fn find_range(
        &self,
        driver: &DriverId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<WorkSession>> {
        let mut stmt = self.prepare_cached(
            "SELECT * FROM work_sessions
             WHERE driver_id = ?1 AND work_date BETWEEN ?2 AND ?3
             ORDER BY start_time ASC",
        )?;
        collect(
            &mut stmt,
            params![driver.as_str(), from.to_string(), to.to_string()],
        )
    }

    fn find_open(&self, driver: &DriverId) -> AppResult<Option<WorkSession>> {
        let mut stmt = self.prepare_cached(
            "SELECT * FROM work_sessions
             WHERE driver_id = ?1 AND end_time IS NULL
             ORDER BY start_time DESC
             LIMIT 1",
        )?;
        Ok(collect(&mut stmt, params![driver.as_str()])?.into_iter().next())
    }

    fn insert_open(&self, session: &WorkSession) -> AppResult<WorkSession> {
        if !session.is_open() {
            return Err(AppError::Validation("only open sessions can be inserted".into()));
        }

        let result = self.execute(
            "INSERT INTO work_sessions (driver_id, work_date, start_time, created_at)
             SELECT ?1, ?2, ?3, ?4
             WHERE NOT EXISTS (
                 SELECT 1 FROM work_sessions
                 WHERE driver_id = ?1 AND end_time IS NULL
             )",
            params![
                session.driver_id.as_str(),
                session.work_date.to_string(),
                ts_to_db(&session.start_time),
                ts_to_db(&Utc::now()),
            ],
        );

        let changed = match result {
            Ok(n) => n,
            // Lost a race against a concurrent insert: the partial unique
            // index refused the second open row.
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == ErrorCode::ConstraintViolation =>
            {
                0
            }
            Err(e) => return Err(e.into()),
        };

        if changed == 0 {
            return Err(AppError::Conflict(format!(
                "driver {} already has an open session",
                session.driver_id
            )));
        }

        let mut stored = session.clone();
        stored.id = self.last_insert_rowid();
        Ok(stored)
    }

    fn update(&self, session: &WorkSession) -> AppResult<()> {
        let changed = self.execute(
            "UPDATE work_sessions
             SET end_time = ?1, duration_seconds = ?2
             WHERE id = ?3 AND driver_id = ?4 AND end_time IS NULL",
            params![
                session.end_time.as_ref().map(ts_to_db),
                session.duration_seconds,
                session.id,
                session.driver_id.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(AppError::NotFound(format!(
                "open session {} for driver {}",
                session.id, session.driver_id
            )));
        }
        Ok(())
    }
}

/// Total and open session counts, for `db --info`.
pub fn session_counts(conn: &Connection) -> AppResult<(i64, i64)> {
    let row = conn.query_row(
        "SELECT COUNT(*), IFNULL(SUM(end_time IS NULL), 0) FROM work_sessions",
        [],
        |r| Ok((r.get(0)?, r.get(1)?)),
    )?;
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::init_db;
    use chrono::TimeZone;

    fn conn() -> Connection {
        let c = Connection::open_in_memory().unwrap();
        init_db(&c).unwrap();
        c
    }

    fn drv(s: &str) -> DriverId {
        DriverId::parse(s).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, d).unwrap()
    }

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, d, h, 0, 0).unwrap()
    }

    #[test]
    fn insert_then_find_open() {
        let c = conn();
        let s = c
            .insert_open(&WorkSession::open(drv("d1"), day(15), at(15, 6)))
            .unwrap();
        assert!(s.id > 0);

        let open = c.find_open(&drv("d1")).unwrap().unwrap();
        assert_eq!(open, s);
        assert!(c.find_open(&drv("d2")).unwrap().is_none());
    }

    #[test]
    fn conditional_insert_blocks_second_open_session() {
        let c = conn();
        c.insert_open(&WorkSession::open(drv("d1"), day(15), at(15, 6)))
            .unwrap();

        // A different date does not matter: one open session per driver.
        let err = c
            .insert_open(&WorkSession::open(drv("d1"), day(16), at(16, 6)))
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // Other drivers are unaffected.
        c.insert_open(&WorkSession::open(drv("d2"), day(15), at(15, 6)))
            .unwrap();
    }

    #[test]
    fn update_closes_and_find_returns_by_date() {
        let c = conn();
        let mut s = c
            .insert_open(&WorkSession::open(drv("d1"), day(15), at(15, 6)))
            .unwrap();
        s.close(at(15, 8)).unwrap();
        c.update(&s).unwrap();

        let found = c.find(&drv("d1"), day(15)).unwrap();
        assert_eq!(found, vec![s]);
        assert!(c.find_open(&drv("d1")).unwrap().is_none());
        assert!(c.find(&drv("d1"), day(16)).unwrap().is_empty());
    }

    #[test]
    fn update_of_unknown_session_is_not_found() {
        let c = conn();
        let mut s = WorkSession::open(drv("d1"), day(15), at(15, 6));
        s.id = 42;
        s.close(at(15, 7)).unwrap();
        assert!(matches!(c.update(&s), Err(AppError::NotFound(_))));
    }

    #[test]
    fn malformed_rows_are_rejected_on_read() {
        let c = conn();
        c.execute(
            "INSERT INTO work_sessions (driver_id, work_date, start_time, end_time, duration_seconds, created_at)
             VALUES ('d1', '2025-09-15', '2025-09-15T08:00:00.000Z', '2025-09-15T07:00:00.000Z', 10, 'x')",
            [],
        )
        .unwrap();
        assert!(matches!(
            c.find(&drv("d1"), day(15)),
            Err(AppError::Storage(_))
        ));
    }

    #[test]
    fn counts_open_and_total() {
        let c = conn();
        let mut s = c
            .insert_open(&WorkSession::open(drv("d1"), day(15), at(15, 6)))
            .unwrap();
        s.close(at(15, 7)).unwrap();
        c.update(&s).unwrap();
        c.insert_open(&WorkSession::open(drv("d1"), day(16), at(16, 6)))
            .unwrap();
        assert_eq!(session_counts(&c).unwrap(), (2, 1));
    }

    #[test]
    fn racing_starts_on_two_connections_leave_one_open_session() {
        use crate::core::clock::BusinessClock;
        use crate::core::session::Aggregator;
        use crate::db::pool::DbPool;
        use std::sync::{Arc, Barrier};
        use std::thread;

        let path = std::env::temp_dir().join("rtripclock_racing_starts.sqlite");
        std::fs::remove_file(&path).ok();
        let db = path.to_string_lossy().to_string();
        init_db(&DbPool::new(&db, 5000).unwrap().conn).unwrap();

        for round in 0..25u32 {
            let driver = format!("drv-{}", round);
            let barrier = Arc::new(Barrier::new(2));
            let handles: Vec<_> = (0..2)
                .map(|_| {
                    let (barrier, db, driver) = (Arc::clone(&barrier), db.clone(), driver.clone());
                    thread::spawn(move || {
                        let pool = DbPool::new(&db, 5000).unwrap();
                        let clock = BusinessClock::default();
                        barrier.wait();
                        Aggregator::new(&pool.conn, &clock).start_session(&drv(&driver), at(15, 6))
                    })
                })
                .collect();

            let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
            let started = results.iter().filter(|r| r.is_ok()).count();
            let conflicts = results
                .iter()
                .filter(|r| matches!(r, Err(AppError::Conflict(_))))
                .count();
            assert_eq!((started, conflicts), (1, 1), "round {}: {:?}", round, results);
        }

        let pool = DbPool::new(&db, 5000).unwrap();
        assert_eq!(session_counts(&pool.conn).unwrap(), (25, 25));
        std::fs::remove_file(&path).ok();
    }
}
