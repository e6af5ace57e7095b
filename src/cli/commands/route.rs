use crate::cli::parser::Commands;
use crate::core::route::group_stops;
use crate::errors::AppResult;
use crate::models::route_stop::{StopGroup, parse_stops};
use crate::ui::messages::info;
use crate::utils::colors::colorize_optional;
use crate::utils::path::expand_tilde;
use crate::utils::table::Table;
use std::fs;

/// Handle the `route` subcommand. Needs no database.
pub fn handle(cmd: &Commands) -> AppResult<()> {
    if let Commands::Route { file, json } = cmd {
        let content = fs::read_to_string(expand_tilde(file))?;
        let stops = parse_stops(&content)?;
        let groups = group_stops(&stops);

        if *json {
            println!("{}", serde_json::to_string_pretty(&groups)?);
        } else if groups.is_empty() {
            info("Route has no stops.");
        } else {
            print_groups(&groups, stops.len());
        }
    }

    Ok(())
}

fn print_groups(groups: &[StopGroup], stop_count: usize) {
    let mut table = Table::new(&["SEQ", "TYPE", "STUDENTS", "SCHOOL", "ADDRESS", "STOPS"]);
    for g in groups {
        table.add_row(vec![
            g.sequence.to_string(),
            g.stop_type.label().to_string(),
            colorize_optional(&g.student_name),
            colorize_optional(g.school_name.as_deref().unwrap_or("")),
            colorize_optional(g.address.as_deref().unwrap_or("")),
            g.stop_ids.len().to_string(),
        ]);
    }

    println!("🗺  {} stop(s) in {} group(s):\n", stop_count, groups.len());
    println!("{}", table.render());
}
