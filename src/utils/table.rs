//! Table rendering utilities for CLI outputs.
//! Widths are measured in terminal columns, so names with accents or
//! wide characters still line up. Color codes take no room.

use crate::utils::formatting::strip_ansi;
use unicode_width::UnicodeWidthStr;

pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn visible_width(cell: &str) -> usize {
    UnicodeWidthStr::width(strip_ansi(cell).as_str())
}

fn pad(cell: &str, width: usize) -> String {
    let w = visible_width(cell);
    format!("{}{}", cell, " ".repeat(width.saturating_sub(w)))
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self
            .headers
            .iter()
            .map(|h| visible_width(h))
            .collect();

        for row in &self.rows {
            for (i, cell) in row.iter().enumerate().take(widths.len()) {
                widths[i] = widths[i].max(visible_width(cell));
            }
        }
        widths
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let mut out = String::new();

        let line = |cells: &[String]| -> String {
            let parts: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(i, w)| pad(cells.get(i).map(String::as_str).unwrap_or(""), *w))
                .collect();
            parts.join(" | ").trim_end().to_string()
        };

        out.push_str(&line(&self.headers));
        out.push('\n');
        let total: usize = widths.iter().sum::<usize>() + 3 * widths.len().saturating_sub(1);
        out.push_str(&"-".repeat(total));
        out.push('\n');

        for row in &self.rows {
            out.push_str(&line(row));
            out.push('\n');
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_align_on_display_width() {
        let mut t = Table::new(&["Seq", "Students"]);
        t.add_row(vec!["1".into(), "Zoë".into()]);
        t.add_row(vec!["10".into(), "Al".into()]);
        let out = t.render();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Seq | Students");
        assert_eq!(lines[2], "1   | Zoë");
        assert_eq!(lines[3], "10  | Al");
    }

    #[test]
    fn color_codes_do_not_widen_columns() {
        let mut t = Table::new(&["A", "B"]);
        t.add_row(vec!["\x1b[33mxy\x1b[0m".into(), "z".into()]);
        let out = t.render();
        assert_eq!(out.lines().next(), Some("A  | B"));
    }
}
