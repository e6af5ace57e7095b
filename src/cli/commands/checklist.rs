use crate::cli::commands::open_pool;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::checklist::ChecklistLogic;
use crate::core::clock::BusinessClock;
use crate::errors::{AppError, AppResult};
use crate::models::checklist::{Checklist, ChecklistItem, ChecklistKind};
use crate::models::driver::DriverId;
use crate::ui::messages::{success, warning};
use crate::utils::formatting::secs2readable;
use crate::utils::time::parse_optional_timestamp;
use chrono::Utc;

/// Handle the `checklist` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Checklist {
        driver,
        kind,
        at,
        vehicle,
        items,
        notes,
    } = cmd
    {
        let clock = BusinessClock::from_config(cfg)?;

        let driver = DriverId::parse(driver)?;
        let kind = ChecklistKind::from_code(kind).ok_or_else(|| {
            AppError::Validation(format!("invalid checklist kind '{}' (use pre or post)", kind))
        })?;
        let submitted_at =
            parse_optional_timestamp(at.as_ref(), clock.tz())?.unwrap_or_else(Utc::now);
        let items = items
            .iter()
            .map(|raw| ChecklistItem::parse(raw))
            .collect::<AppResult<Vec<_>>>()?;

        let checklist = Checklist::new(
            driver,
            kind,
            submitted_at,
            vehicle.clone(),
            items,
            notes.clone().unwrap_or_default(),
        );

        let pool = open_pool(cfg)?;
        let sub = ChecklistLogic::submit(&pool.conn, &clock, checklist)?;

        let local = sub.checklist.submitted_at.with_timezone(&clock.tz());
        match sub.checklist.kind {
            ChecklistKind::Pre => success(format!(
                "Session {} started for {} at {} (work date {})",
                sub.session.id,
                sub.checklist.driver_id,
                local.format("%H:%M"),
                sub.session.work_date
            )),
            ChecklistKind::Post => success(format!(
                "Session {} ended for {} at {} (worked {})",
                sub.session.id,
                sub.checklist.driver_id,
                local.format("%H:%M"),
                secs2readable(sub.session.duration_seconds.unwrap_or(0), true)
            )),
        }

        for defect in sub.checklist.defects() {
            warning(format!("Defect reported: {}", defect.name));
        }
    }

    Ok(())
}
