//! Formatting utilities used for CLI outputs.

use regex::Regex;
use std::sync::LazyLock;

static ANSI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1B\[[0-9;]*[mK]").expect("valid ANSI regex"));

/// Remove terminal color codes.
pub fn strip_ansi(s: &str) -> String {
    ANSI_RE.replace_all(s, "").into_owned()
}

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

/// Seconds → `07h 30m` (long) or `07:30:05` (short).
pub fn secs2readable(secs: i64, short: bool) -> String {
    let sign = if secs < 0 { "-" } else { "" };
    let abs_s = secs.abs();
    let hours = abs_s / 3600;
    let minutes = (abs_s % 3600) / 60;
    let seconds = abs_s % 60;

    if short {
        format!("{}{:02}:{:02}:{:02}", sign, hours, minutes, seconds)
    } else {
        format!("{}{:02}h {:02}m", sign, hours, minutes)
    }
}
