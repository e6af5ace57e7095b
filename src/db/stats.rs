use crate::db::checklists::count_checklists;
use crate::db::pool::DbPool;
use crate::db::store::session_counts;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

pub fn print_db_info(pool: &DbPool, db_path: &str) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) SESSIONS / CHECKLISTS
    //
    let (sessions, open) = session_counts(&pool.conn)?;
    let checklists = count_checklists(&pool.conn)?;
    println!(
        "{}• Work sessions:{} {}{}{} ({} open)",
        CYAN, RESET, GREEN, sessions, RESET, open
    );
    println!("{}• Checklists:{} {}{}{}", CYAN, RESET, GREEN, checklists, RESET);

    //
    // 3) DATE RANGE
    //
    let (first, last): (Option<String>, Option<String>) = pool
        .conn
        .query_row(
            "SELECT MIN(work_date), MAX(work_date) FROM work_sessions",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?
        .unwrap_or((None, None));

    let dash = format!("{GREY}--{RESET}");
    println!("{}• Work dates:{}", CYAN, RESET);
    println!("    from: {}", first.unwrap_or_else(|| dash.clone()));
    println!("    to:   {}", last.unwrap_or(dash));

    println!();
    Ok(())
}
