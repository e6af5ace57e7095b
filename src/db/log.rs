use crate::errors::AppResult;
use chrono::{SecondsFormat, Utc};
use rusqlite::Connection;
use rusqlite::params;

/// Timestamp format of `log.date`: RFC 3339 UTC with milliseconds.
pub fn log_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Write an internal audit line into the `log` table.
pub fn ttlog(conn: &Connection, operation: &str, target: &str, message: &str) -> AppResult<()> {
    let now = log_timestamp();

    let mut stmt = conn.prepare_cached(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, ?2, ?3, ?4)",
    )?;

    stmt.execute(params![now, operation, target, message])?;

    Ok(())
}

/// All log rows, oldest first: (id, date, operation, target, message).
pub fn load_log(conn: &Connection) -> AppResult<Vec<(i64, String, String, String, String)>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, date, operation, IFNULL(target, ''), message FROM log ORDER BY id ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
        ))
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::init_db;
    use chrono::DateTime;

    #[test]
    fn migration_and_audit_rows_share_one_date_format() {
        let conn = Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();
        ttlog(&conn, "init", "", "Database initialized").unwrap();

        let rows = load_log(&conn).unwrap();
        assert!(rows.len() > 1);
        for (_, date, op, ..) in rows {
            assert!(date.ends_with('Z'), "{} has date {}", op, date);
            assert!(DateTime::parse_from_rfc3339(&date).is_ok(), "{} has date {}", op, date);
        }
    }
}
