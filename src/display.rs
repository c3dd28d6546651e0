use crate::Result;
use colored::Colorize;
use serde::Serialize;
use subnetter_core::LifecycleState;

/// Table formatting utilities
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    max_widths: Vec<usize>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        let headers: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
        let max_widths = headers.iter().map(|h| h.chars().count()).collect();
        Self {
            headers,
            rows: Vec::new(),
            max_widths,
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        // Update max widths
        for (i, cell) in row.iter().enumerate() {
            if i < self.max_widths.len() {
                self.max_widths[i] = self.max_widths[i].max(cell.chars().count());
            }
        }
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str(&self.separator('┌', '┬', '┐'));
        out.push_str(&self.line(&self.headers, true));
        out.push_str(&self.separator('├', '┼', '┤'));
        for row in &self.rows {
            out.push_str(&self.line(row, false));
        }
        out.push_str(&self.separator('└', '┴', '┘'));

        out
    }

    pub fn print(&self) {
        print!("{}", self.render());
    }

    fn separator(&self, left: char, middle: char, right: char) -> String {
        let segments: Vec<String> = self
            .max_widths
            .iter()
            .map(|width| "─".repeat(width + 2))
            .collect();
        format!("{}{}{}\n", left, segments.join(&middle.to_string()), right)
    }

    fn line(&self, cells: &[String], header: bool) -> String {
        let mut out = String::from("│");
        for (i, width) in self.max_widths.iter().enumerate() {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            // Pad before styling; escape codes would throw off the width
            let padded = format!("{:<width$}", cell, width = width);
            if header {
                out.push_str(&format!(" {} │", padded.bold()));
            } else {
                out.push_str(&format!(" {} │", padded));
            }
        }
        out.push('\n');
        out
    }
}

/// Colored lifecycle state for terminal output
pub fn format_state(state: LifecycleState) -> String {
    let text = state.as_str();
    match state {
        LifecycleState::Running => text.green().to_string(),
        LifecycleState::Creating | LifecycleState::Deleting => text.yellow().to_string(),
        LifecycleState::Rollback | LifecycleState::Failed => text.red().to_string(),
        LifecycleState::Unknown => text.dimmed().to_string(),
    }
}

/// Print a value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

pub fn print_info(message: &str) {
    println!("{}", message.dimmed());
}

pub fn print_error(message: &str) {
    eprintln!("{}", message.red());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_render() {
        colored::control::set_override(false);

        let mut table = Table::new(&["NAME", "SUBNET"]);
        assert!(table.is_empty());
        table.add_row(vec!["api".to_string(), "10.0.1.0/24".to_string()]);
        table.add_row(vec!["worker-long-name".to_string()]);

        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1], "│ NAME             │ SUBNET      │");
        assert_eq!(lines[3], "│ api              │ 10.0.1.0/24 │");
        assert_eq!(lines[4], "│ worker-long-name │             │");
        assert!(lines[0].starts_with('┌') && lines[5].starts_with('└'));

        // Every line has the same visible width
        let widths: Vec<usize> = lines.iter().map(|l| l.chars().count()).collect();
        assert!(widths.iter().all(|w| *w == widths[0]));
    }
}
