//! CLI output formatting
//!
//! Colored status lines, per-repo spinners and the table used by `show`.

use colored::Colorize;
use console::measure_text_width;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Output helper for consistent CLI formatting
pub struct Output;

impl Output {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!("\n{}", message.bold());
    }

    /// Create a spinner with a message
    pub fn spinner(message: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    }

    /// Format a repo name consistently
    pub fn repo_name(name: &str) -> String {
        name.cyan().bold().to_string()
    }

    /// Format a branch name consistently
    pub fn branch_name(name: &str) -> String {
        name.magenta().to_string()
    }

    /// Format a `git describe` result, highlighting dirty working copies
    pub fn describe(desc: &str) -> String {
        if desc.ends_with("-dirty") {
            desc.yellow().to_string()
        } else {
            desc.green().to_string()
        }
    }
}

/// Table builder for formatted output
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    column_widths: Vec<usize>,
}

impl Table {
    /// Create a new table with headers
    pub fn new(headers: Vec<&str>) -> Self {
        let headers: Vec<String> = headers.into_iter().map(|s| s.to_string()).collect();
        let column_widths = headers.iter().map(|h| h.len()).collect();
        Self {
            headers,
            rows: Vec::new(),
            column_widths,
        }
    }

    /// Add a row to the table
    pub fn add_row(&mut self, row: Vec<&str>) {
        let row: Vec<String> = row.into_iter().map(|s| s.to_string()).collect();
        for (i, cell) in row.iter().enumerate() {
            if i < self.column_widths.len() {
                self.column_widths[i] = self.column_widths[i].max(measure_text_width(cell));
            }
        }
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render the table as lines, header and separator first
    pub fn render(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.rows.len() + 2);

        let header_line: String = self
            .headers
            .iter()
            .enumerate()
            .map(|(i, h)| pad(h, self.column_widths[i]))
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(header_line.bold().to_string());

        let sep_line: String = self
            .column_widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(sep_line.dimmed().to_string());

        for row in &self.rows {
            let row_line: String = row
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    let width = self.column_widths.get(i).copied().unwrap_or(cell.len());
                    pad(cell, width)
                })
                .collect::<Vec<_>>()
                .join("  ");
            lines.push(row_line.trim_end().to_string());
        }
        lines
    }

    /// Print the table
    pub fn print(&self) {
        for line in self.render() {
            println!("{}", line);
        }
    }
}

fn pad(cell: &str, width: usize) -> String {
    let fill = width.saturating_sub(measure_text_width(cell));
    format!("{}{}", cell, " ".repeat(fill))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_columns_align() {
        colored::control::set_override(false);
        let mut table = Table::new(vec!["Repo", "Describe", "Branch"]);
        table.add_row(vec!["daffy", "v0.1-2-gabc1234", "main"]);
        table.add_row(vec!["porky", "abc1234-dirty", "branch1"]);
        let lines = table.render();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].find("Describe"), lines[2].find("v0.1"));
        assert_eq!(lines[0].find("Branch"), lines[3].find("branch1"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_colored_cells_pad_to_visible_width() {
        assert_eq!(pad("\x1b[36mdaffy\x1b[0m", 7), "\x1b[36mdaffy\x1b[0m  ");
        assert_eq!(pad("porky", 7), "porky  ");
        assert_eq!(pad("branch1", 3), "branch1");
    }
}
