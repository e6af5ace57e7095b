use crate::cli::commands::open_pool;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::clock::BusinessClock;
use crate::core::session::Aggregator;
use crate::db::checklists::load_checklists_for_session;
use crate::errors::AppResult;
use crate::models::driver::DriverId;
use crate::ui::messages::info;
use crate::utils::colors::{RESET, color_for_defects, color_for_open, colorize_optional};
use crate::utils::date::{period_bounds, range_bounds};
use crate::utils::formatting::secs2readable;
use crate::utils::table::Table;
use chrono::Utc;

/// Handle the `sessions` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Sessions {
        driver,
        period,
        details,
    } = cmd
    {
        let clock = BusinessClock::from_config(cfg)?;
        let driver = DriverId::parse(driver)?;
        let now = Utc::now();

        let (from, to) = match period {
            Some(p) => range_bounds(p)?,
            None => period_bounds(&clock.business_date(now).format("%Y-%m").to_string())?,
        };

        let pool = open_pool(cfg)?;
        let agg = Aggregator::new(&pool.conn, &clock);
        let sessions = agg.sessions(&driver, from, to)?;

        if sessions.is_empty() {
            info(format!("No sessions for {} between {} and {}", driver, from, to));
            return Ok(());
        }

        let tz = clock.tz();
        let mut table = Table::new(&["ID", "DATE", "START", "END", "WORKED"]);
        for s in &sessions {
            let end = s
                .end_time
                .map(|e| e.with_timezone(&tz).format("%H:%M").to_string())
                .unwrap_or_else(|| "--:--".to_string());
            let worked = secs2readable(s.seconds_at(now), true);
            table.add_row(vec![
                s.id.to_string(),
                s.work_date.to_string(),
                s.start_time.with_timezone(&tz).format("%H:%M").to_string(),
                colorize_optional(&end),
                format!("{}{}{}", color_for_open(s.is_open()), worked, RESET),
            ]);
        }

        println!("🚌 Sessions for {} ({} → {}):\n", driver, from, to);
        println!("{}", table.render());

        if *details {
            println!();
            for s in &sessions {
                for c in load_checklists_for_session(&pool.conn, s.id)? {
                    let defects = c.defects().count();
                    println!(
                        "  #{} {} {} {}{} defect(s){} {}",
                        s.id,
                        c.kind.label(),
                        c.submitted_at.with_timezone(&tz).format("%Y-%m-%d %H:%M"),
                        color_for_defects(defects),
                        defects,
                        RESET,
                        c.vehicle_id.as_deref().unwrap_or("")
                    );
                }
            }
        }

        let total: i64 = sessions.iter().map(|s| s.seconds_at(now)).sum();
        println!("\nTotal: {}", secs2readable(total, false));
    }

    Ok(())
}
