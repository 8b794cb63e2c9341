//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// One labelled value in a vertical result table
#[derive(Tabled)]
pub struct FieldRow {
    #[tabled(rename = "Field")]
    pub field: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl FieldRow {
    pub fn new(field: &str, value: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            value: value.into(),
        }
    }
}

/// Print label/value rows as a rounded table
pub fn print_fields(rows: Vec<FieldRow>) {
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", table);
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format minutes as e.g. `1h 05m`
pub fn format_minutes(minutes: f64) -> String {
    let total = minutes.round() as u64;
    let (hours, mins) = (total / 60, total % 60);
    if hours > 0 {
        format!("{}h {:02}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}

/// Format a percentage value already scaled to 0-100
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

/// Color risk text based on the risk level
pub fn color_risk(level: &str, text: &str) -> String {
    match level.to_uppercase().as_str() {
        "LOW" => text.green().to_string(),
        "MEDIUM" => text.yellow().to_string(),
        "HIGH" => text.red().bold().to_string(),
        _ => text.to_string(),
    }
}

/// Color model availability
pub fn color_loaded(loaded: bool) -> String {
    if loaded {
        "loaded".green().to_string()
    } else {
        "heuristic fallback".yellow().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(43.2), "43m");
        assert_eq!(format_minutes(65.0), "1h 05m");
        assert_eq!(format_minutes(120.4), "2h 00m");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(69.0), "69.00%");
    }

    #[test]
    fn test_color_risk_keeps_text() {
        colored::control::set_override(false);
        assert_eq!(color_risk("HIGH", "High risk"), "High risk");
        assert_eq!(color_risk("unknown", "n/a"), "n/a");
    }
}
