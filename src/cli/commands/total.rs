use crate::cli::commands::open_pool;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::clock::BusinessClock;
use crate::core::session::{Aggregator, Timecard};
use crate::errors::AppResult;
use crate::models::driver::DriverId;
use crate::utils::colors::{RESET, color_for_open, colorize_optional};
use crate::utils::date::parse_date_arg;
use crate::utils::formatting::{bold, secs2readable};
use crate::utils::table::Table;
use crate::utils::time::parse_optional_timestamp;
use chrono::{NaiveDate, Utc};
use serde_json::json;

/// Handle the `total` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Total {
        driver,
        date,
        week,
        from,
        to,
        now,
        json,
    } = cmd
    {
        let clock = BusinessClock::from_config(cfg)?;
        let driver = DriverId::parse(driver)?;
        let now = parse_optional_timestamp(now.as_ref(), clock.tz())?.unwrap_or_else(Utc::now);

        let pool = open_pool(cfg)?;
        let agg = Aggregator::new(&pool.conn, &clock);

        // Range modes print a timecard, the default is a single day.
        let range = match (week, from, to) {
            (Some(w), _, _) => Some(clock.week_of(parse_date_arg(w)?)?),
            (None, Some(f), Some(t)) => Some((parse_date_arg(f)?, parse_date_arg(t)?)),
            _ => None,
        };

        match range {
            Some((start, end)) => {
                let card = agg.timecard(&driver, start, end, now)?;
                if *json {
                    println!("{}", serde_json::to_string_pretty(&card)?);
                } else {
                    print_timecard(&card);
                }
            }
            None => {
                let day = match date {
                    Some(d) => parse_date_arg(d)?,
                    None => clock.business_date(now),
                };
                let seconds = agg.daily_total(&driver, day, now)?;
                print_daily(&driver, day, seconds, *json)?;
            }
        }
    }

    Ok(())
}

fn print_daily(driver: &DriverId, day: NaiveDate, seconds: i64, as_json: bool) -> AppResult<()> {
    if as_json {
        let body = json!({
            "driver_id": driver,
            "date": day,
            "seconds": seconds,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        println!(
            "⏱  {} on {}: {}",
            driver,
            day,
            bold(&secs2readable(seconds, false))
        );
    }
    Ok(())
}

fn print_timecard(card: &Timecard) {
    let mut table = Table::new(&["DATE", "DAY", "SESSIONS", "WORKED"]);
    for d in &card.days {
        let worked = secs2readable(d.seconds, false);
        let worked = if d.open {
            format!("{}{} *{}", color_for_open(true), worked, RESET)
        } else {
            colorize_optional(&worked)
        };
        table.add_row(vec![
            d.date.to_string(),
            d.date.format("%a").to_string(),
            d.sessions.to_string(),
            worked,
        ]);
    }

    println!(
        "📅 Timecard for {} ({} → {}):\n",
        card.driver_id, card.from, card.to
    );
    println!("{}", table.render());
    println!("\nTotal: {}", bold(&secs2readable(card.total_seconds, false)));
    if card.days.iter().any(|d| d.open) {
        println!("* includes a session still in progress");
    }
}
