//! Colored formatter implementation with terminal color support

use super::formatter::{
    create_table, summary_text, worker_columns, worker_rows, FormattingOptions, OutputFormatter,
};
use crate::{
    error::{AppError, Result},
    models::RunReport,
};
use colored::*;
use std::fmt::Write as _;

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub muted: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            muted: Color::BrightBlack,
        }
    }
}

/// Colored formatter implementation
pub struct ColoredFormatter {
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    pub fn new(options: FormattingOptions) -> Self {
        Self {
            options,
            color_scheme: ColorScheme::default(),
        }
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_summary(&self, report: &RunReport) -> Result<String> {
        let text = summary_text(report);
        let colored = if report.is_success() {
            text.color(self.color_scheme.success).bold()
        } else {
            text.color(self.color_scheme.error).bold()
        };
        Ok(colored.to_string())
    }

    fn format_worker_table(&self, report: &RunReport) -> Result<String> {
        let table = create_table(&worker_columns(), &worker_rows(report), self.options.table_borders);

        // Colorize whole lines after layout so ANSI codes don't skew column widths
        let lines: Vec<String> = table
            .lines()
            .map(|line| {
                if line.starts_with('+') {
                    line.color(self.color_scheme.muted).to_string()
                } else if line.contains("failed") {
                    line.color(self.color_scheme.error).to_string()
                } else if line.contains("Worker") {
                    line.color(self.color_scheme.header).bold().to_string()
                } else {
                    line.to_string()
                }
            })
            .collect();

        Ok(lines.join("\n"))
    }

    fn format_failed_workers(&self, report: &RunReport) -> Result<String> {
        let mut output = String::new();

        for outcome in report.outcomes.iter().filter(|o| o.is_failed()) {
            if let Some(error) = &outcome.error {
                writeln!(
                    output,
                    "{} {} failed after {} iterations: {}",
                    "✗".color(self.color_scheme.error),
                    format!("worker {}", outcome.report.worker_id).bold(),
                    outcome.report.iterations_completed,
                    error.to_string().color(self.color_scheme.warning)
                )
                .map_err(|e| AppError::internal(format!("Formatting error: {}", e)))?;
            }
        }

        Ok(output.trim_end().to_string())
    }

    fn format_header(&self, title: &str) -> Result<String> {
        Ok(format!(
            "{}\n{}",
            title.color(self.color_scheme.header).bold(),
            "═".repeat(title.chars().count()).color(self.color_scheme.muted)
        ))
    }
}
