pub mod backup;
pub mod checklist;
pub mod config;
pub mod db;
pub mod init;
pub mod log;
pub mod route;
pub mod sessions;
pub mod total;

use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

/// Open the configured database with pending migrations applied.
pub(crate) fn open_pool(cfg: &Config) -> AppResult<DbPool> {
    let pool = DbPool::new(&cfg.database, cfg.busy_timeout_ms)?;
    init_db(&pool.conn)?;
    Ok(pool)
}
