use crate::db::log::load_log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::formatting::strip_ansi;
use ansi_term::Colour;

const OP_WIDTH_MAX: usize = 60;

/// Colour for each audit operation.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "checklist_pre" => Colour::Green,
        "checklist_post" => Colour::Red,
        "migration_applied" => Colour::Purple,
        "backup" => Colour::Blue,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

/// Cut to `max` visible characters, ending with "...".
fn truncate_visible(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &DbPool) -> AppResult<()> {
        let entries = load_log(&pool.conn)?;

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let id_w = entries
            .iter()
            .map(|(id, ..)| id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries
            .iter()
            .map(|(_, date, ..)| date.len())
            .max()
            .unwrap_or(10);
        let op_w = entries
            .iter()
            .map(|(_, _, op, target, _)| op.len() + target.len() + 3)
            .max()
            .unwrap_or(10)
            .min(OP_WIDTH_MAX);

        println!("📜 Internal log:\n");

        for (id, date, operation, target, message) in entries {
            let op_target = if target.is_empty() {
                operation.clone()
            } else {
                format!("{operation} ({target})")
            };
            let visible = truncate_visible(&op_target, OP_WIDTH_MAX);

            // Only the operation word is coloured.
            let color = color_for_operation(&operation);
            let colored = match visible.split_once(' ') {
                Some((op_word, rest)) => format!("{} {}", color.paint(op_word), rest),
                None => color.paint(visible.as_str()).to_string(),
            };

            let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&colored).chars().count()));

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                id,
                date,
                colored,
                padding,
                message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn painted_operation_keeps_its_visible_text() {
        let painted = color_for_operation("checklist_pre").paint("checklist_pre").to_string();
        assert_eq!(strip_ansi(&painted), "checklist_pre");
    }

    #[test]
    fn truncates_long_targets() {
        let long = "x".repeat(80);
        let cut = truncate_visible(&long, OP_WIDTH_MAX);
        assert_eq!(cut.chars().count(), OP_WIDTH_MAX);
        assert!(cut.ends_with("..."));
        assert_eq!(truncate_visible("short", OP_WIDTH_MAX), "short");
    }
}
