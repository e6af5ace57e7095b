use crate::db::log::log_timestamp;
use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, OptionalExtension};

/// Ensure that the `log` table exists. Applied migrations are recorded in it.
fn ensure_log_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

struct Migration {
    version: &'static str,
    message: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250901_0001_create_work_sessions",
        message: "Created work_sessions table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS work_sessions (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            driver_id        TEXT NOT NULL,
            work_date        TEXT NOT NULL,
            start_time       TEXT NOT NULL,
            end_time         TEXT,
            duration_seconds INTEGER,
            created_at       TEXT NOT NULL,
            CHECK ((end_time IS NULL) = (duration_seconds IS NULL)),
            CHECK (duration_seconds IS NULL OR duration_seconds >= 0)
        );

        CREATE INDEX IF NOT EXISTS idx_work_sessions_driver_date
            ON work_sessions(driver_id, work_date);
        "#,
    },
    Migration {
        version: "20250901_0002_unique_open_session",
        message: "At most one open session per driver",
        sql: r#"
        CREATE UNIQUE INDEX IF NOT EXISTS ux_work_sessions_open_driver
            ON work_sessions(driver_id) WHERE end_time IS NULL;
        "#,
    },
    Migration {
        version: "20250902_0003_create_checklists",
        message: "Created checklists table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS checklists (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            driver_id    TEXT NOT NULL,
            vehicle_id   TEXT,
            kind         TEXT NOT NULL CHECK(kind IN ('pre','post')),
            submitted_at TEXT NOT NULL,
            items        TEXT NOT NULL DEFAULT '[]',
            notes        TEXT NOT NULL DEFAULT '',
            session_id   INTEGER REFERENCES work_sessions(id),
            created_at   TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_checklists_driver_time
            ON checklists(driver_id, submitted_at);
        CREATE INDEX IF NOT EXISTS idx_checklists_session
            ON checklists(session_id);
        "#,
    },
];

fn is_applied(conn: &Connection, version: &str) -> AppResult<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> AppResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(m.sql)
        .map_err(|e| AppError::Migration(format!("{}: {}", m.version, e)))?;

    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, 'migration_applied', ?2, ?3)",
        [log_timestamp().as_str(), m.version, m.message],
    )?;

    tx.commit()?;
    tracing::info!(version = m.version, "migration applied");
    Ok(())
}

/// Public entry point: run all pending migrations, in order.
/// Returns the versions applied by this call.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<Vec<&'static str>> {
    ensure_log_table(conn)?;

    let mut applied = Vec::new();
    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }
        apply(conn, m)?;
        applied.push(m.version);
    }

    Ok(applied)
}
