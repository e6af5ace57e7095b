/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Open sessions are highlighted, closed ones use the default color.
pub fn color_for_open(open: bool) -> &'static str {
    if open { YELLOW } else { RESET }
}

/// Checklist verdict: green when every item passed, red otherwise.
pub fn color_for_defects(defects: usize) -> &'static str {
    if defects == 0 { GREEN } else { RED }
}

/// Grey out placeholders such as `--:--` or an empty cell.
pub fn colorize_optional(value: &str) -> String {
    if value.trim().is_empty() || value.trim() == "--:--" || value.trim() == "00h 00m" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}
