//! Table rendering utilities for CLI outputs.

use regex::Regex;
use std::sync::LazyLock;
use unicode_width::UnicodeWidthStr;

static ANSI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1B\[[0-9;]*[mK]").expect("valid ANSI escape pattern")
});

pub fn strip_ansi(s: &str) -> String {
    ANSI.replace_all(s, "").into_owned()
}

/// Display width ignoring ANSI color codes.
pub fn visible_width(s: &str) -> usize {
    strip_ansi(s).width()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

pub struct Column {
    pub header: String,
    pub align: Align,
}

impl Column {
    pub fn left(header: &str) -> Self {
        Self {
            header: header.to_string(),
            align: Align::Left,
        }
    }

    pub fn right(header: &str) -> Self {
        Self {
            header: header.to_string(),
            align: Align::Right,
        }
    }
}

pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
    /// Index of rows rendered after a separator line (totals).
    footer_from: Option<usize>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            footer_from: None,
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Add a row below a separator line.
    pub fn add_footer(&mut self, row: Vec<String>) {
        if self.footer_from.is_none() {
            self.footer_from = Some(self.rows.len());
        }
        self.rows.push(row);
    }

    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                self.rows
                    .iter()
                    .filter_map(|r| r.get(i))
                    .map(|c| visible_width(c))
                    .chain(std::iter::once(visible_width(&col.header)))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    fn render_line(&self, cells: &[&str], widths: &[usize]) -> String {
        let mut out = String::new();
        for (i, col) in self.columns.iter().enumerate() {
            let cell = cells.get(i).copied().unwrap_or("");
            let pad = " ".repeat(widths[i].saturating_sub(visible_width(cell)));
            match col.align {
                Align::Left => {
                    out.push_str(cell);
                    out.push_str(&pad);
                }
                Align::Right => {
                    out.push_str(&pad);
                    out.push_str(cell);
                }
            }
            out.push(' ');
        }
        out.trim_end().to_string()
    }

    pub fn render(&self, separator_char: &str) -> String {
        let widths = self.widths();
        let total: usize = widths.iter().sum::<usize>() + widths.len().saturating_sub(1);
        let rule = separator_char.repeat(total.max(1));

        let mut out = String::new();

        let headers: Vec<&str> = self.columns.iter().map(|c| c.header.as_str()).collect();
        out.push_str(&self.render_line(&headers, &widths));
        out.push('\n');
        out.push_str(&rule);
        out.push('\n');

        for (idx, row) in self.rows.iter().enumerate() {
            if self.footer_from == Some(idx) {
                out.push_str(&rule);
                out.push('\n');
            }
            let cells: Vec<&str> = row.iter().map(String::as_str).collect();
            out.push_str(&self.render_line(&cells, &widths));
            out.push('\n');
        }

        out
    }
}
