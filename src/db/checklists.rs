use crate::db::store::{ts_from_db, ts_to_db};
use crate::errors::{AppError, AppResult};
use crate::models::checklist::{Checklist, ChecklistItem, ChecklistKind};
use crate::models::driver::DriverId;
use chrono::Utc;
use rusqlite::{Connection, Row, params};

pub fn insert_checklist(conn: &Connection, c: &Checklist) -> AppResult<i64> {
    let items = serde_json::to_string(&c.items)?;

    conn.execute(
        "INSERT INTO checklists (driver_id, vehicle_id, kind, submitted_at, items, notes, session_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            c.driver_id.as_str(),
            c.vehicle_id,
            c.kind.to_db_str(),
            ts_to_db(&c.submitted_at),
            items,
            c.notes,
            c.session_id,
            ts_to_db(&Utc::now()),
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

fn conversion_error(e: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
}

pub fn map_checklist_row(row: &Row) -> rusqlite::Result<Checklist> {
    let driver_raw: String = row.get("driver_id")?;
    let kind_str: String = row.get("kind")?;
    let submitted_str: String = row.get("submitted_at")?;
    let items_str: String = row.get("items")?;

    let driver_id = DriverId::parse(&driver_raw).map_err(conversion_error)?;
    let kind = ChecklistKind::from_db_str(&kind_str).ok_or_else(|| {
        conversion_error(AppError::Validation(format!(
            "invalid checklist kind: {}",
            kind_str
        )))
    })?;
    let submitted_at = ts_from_db(&submitted_str)
        .ok_or_else(|| conversion_error(AppError::InvalidTime(submitted_str.clone())))?;
    let items: Vec<ChecklistItem> =
        serde_json::from_str(&items_str).map_err(|e| conversion_error(e.into()))?;

    Ok(Checklist {
        id: row.get("id")?,
        driver_id,
        vehicle_id: row.get("vehicle_id")?,
        kind,
        submitted_at,
        items,
        notes: row.get("notes")?,
        session_id: row.get("session_id")?,
    })
}

/// Checklists linked to a session, in submission order.
pub fn load_checklists_for_session(
    conn: &Connection,
    session_id: i64,
) -> AppResult<Vec<Checklist>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM checklists
         WHERE session_id = ?1
         ORDER BY submitted_at ASC",
    )?;

    let rows = stmt.query_map([session_id], map_checklist_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn count_checklists(conn: &Connection) -> AppResult<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM checklists", [], |r| r.get(0))?)
}
