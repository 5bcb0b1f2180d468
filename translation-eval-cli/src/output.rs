//! Output formatting for CLI

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};
use serde::Serialize;
use translation_eval_core::{MetricId, MetricValue, QualityRating};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Output writer that handles different formats
pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    pub fn new(format: OutputFormat, no_color: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { format }
    }

    /// Write a report as tables or pretty JSON
    pub fn write<T: Serialize + TableDisplay>(&self, item: &T) -> Result<()> {
        match self.format {
            OutputFormat::Table => item.display_table(),
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(item)?;
                println!("{}", json);
            }
        }
        Ok(())
    }

    /// Write an info message; suppressed for JSON so stdout stays parseable
    pub fn info(&self, message: &str) {
        if self.format == OutputFormat::Table {
            println!("{} {}", "ℹ".blue(), message);
        }
    }
}

/// Trait for reports that render as tables
pub trait TableDisplay {
    fn display_table(&self);
}

/// A table with the shared preset and the given cyan header
pub fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.apply_modifier(UTF8_ROUND_CORNERS);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    );
    table
}

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", title.bold().underline());
}

/// Print a key-value pair in detail format
pub fn print_field(key: &str, value: &str) {
    println!("  {}: {}", key.cyan(), value);
}

/// Cell for a metric value, coloured by its quality band
pub fn value_cell(metric: MetricId, value: &MetricValue) -> Cell {
    let text = value.format(metric.precision());
    match value {
        MetricValue::Value(v) => match metric.rating(*v) {
            Some(rating) => Cell::new(text).fg(rating_color(rating)),
            None => Cell::new(text),
        },
        MetricValue::Unavailable => Cell::new(text).fg(Color::DarkGrey),
        MetricValue::Errored(_) => Cell::new(text).fg(Color::Red),
    }
}

/// Cell naming the quality band, or `-` when the metric has none
pub fn rating_cell(metric: MetricId, value: &MetricValue) -> Cell {
    match value.value().and_then(|v| metric.rating(v)) {
        Some(rating) => Cell::new(rating_label(rating)).fg(rating_color(rating)),
        None => Cell::new("-"),
    }
}

pub fn rating_label(rating: QualityRating) -> &'static str {
    match rating {
        QualityRating::Excellent => "excellent",
        QualityRating::Good => "good",
        QualityRating::Fair => "fair",
        QualityRating::Poor => "poor",
    }
}

fn rating_color(rating: QualityRating) -> Color {
    match rating {
        QualityRating::Excellent => Color::Green,
        QualityRating::Good => Color::Cyan,
        QualityRating::Fair => Color::Yellow,
        QualityRating::Poor => Color::Red,
    }
}

/// Colour a formatted total for inline display
pub fn format_total(value: &MetricValue) -> String {
    let text = value.format(MetricId::Total.precision());
    match value.value().and_then(|v| MetricId::Total.rating(v)) {
        Some(QualityRating::Excellent) => text.green().bold().to_string(),
        Some(QualityRating::Good) => text.cyan().bold().to_string(),
        Some(QualityRating::Fair) => text.yellow().to_string(),
        Some(QualityRating::Poor) => text.red().to_string(),
        None => text.dimmed().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Table.to_string(), "table");
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }

    #[test]
    fn test_rating_cell() {
        assert_eq!(rating_cell(MetricId::Bleu, &MetricValue::Value(65.0)).content(), "excellent");
        assert_eq!(rating_cell(MetricId::CopyRate, &MetricValue::Value(12.0)).content(), "-");
        assert_eq!(rating_cell(MetricId::Bleu, &MetricValue::Unavailable).content(), "-");
    }

    #[test]
    fn test_value_cell_uses_metric_precision() {
        assert_eq!(value_cell(MetricId::Comet, &MetricValue::Value(0.85123)).content(), "0.8512");
        assert_eq!(value_cell(MetricId::Bleu, &MetricValue::Unavailable).content(), "N/A");
    }

    #[test]
    fn test_rating_labels() {
        assert_eq!(rating_label(QualityRating::Excellent), "excellent");
        assert_eq!(rating_label(QualityRating::Poor), "poor");
    }
}
