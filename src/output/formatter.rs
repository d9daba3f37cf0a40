//! Core formatting traits and the plain text implementation

use crate::{
    error::{AppError, Result},
    models::RunReport,
};
use std::fmt::Write as _;

/// Main trait for output formatting
pub trait OutputFormatter {
    /// The one-line pass/fail verdict
    fn format_summary(&self, report: &RunReport) -> Result<String>;

    /// Table of per-worker counters
    fn format_worker_table(&self, report: &RunReport) -> Result<String>;

    /// Workers that ended with an error; empty when there are none
    fn format_failed_workers(&self, report: &RunReport) -> Result<String>;

    fn format_header(&self, title: &str) -> Result<String>;
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    pub enable_color: bool,
    /// Show the per-worker table
    pub verbose_mode: bool,
    pub table_borders: bool,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            verbose_mode: false,
            table_borders: true,
        }
    }
}

/// Column definition for table formatting
#[derive(Debug, Clone)]
pub struct Column {
    pub header: String,
    pub alignment: Alignment,
}

impl Column {
    pub fn new(header: &str, alignment: Alignment) -> Self {
        Self {
            header: header.to_string(),
            alignment,
        }
    }
}

/// Text alignment options
#[derive(Debug, Clone, Copy)]
pub enum Alignment {
    Left,
    Right,
}

/// Row data for table formatting
pub type RowData = Vec<String>;

/// Verdict text shared by every formatter
///
/// Success requires both zero mismatches and zero failed workers. A run whose
/// only problem is failed workers gets its own verdict, since the mismatch
/// count says nothing about the iterations those workers never ran.
pub fn summary_text(report: &RunReport) -> String {
    if report.is_success() {
        "test success!".to_string()
    } else if report.failures == 0 {
        format!(
            "test incomplete: {} of {} workers failed (no mismatches in completed iterations)",
            report.failed_workers(),
            report.outcomes.len()
        )
    } else {
        format!(
            "test fail: {} count (probably server problem. check server code.)",
            report.failures
        )
    }
}

pub(crate) fn worker_columns() -> Vec<Column> {
    vec![
        Column::new("Worker", Alignment::Right),
        Column::new("Status", Alignment::Left),
        Column::new("Iterations", Alignment::Right),
        Column::new("Mismatches", Alignment::Right),
        Column::new("Bytes Sent", Alignment::Right),
        Column::new("Bytes Received", Alignment::Right),
    ]
}

pub(crate) fn worker_rows(report: &RunReport) -> Vec<RowData> {
    report
        .outcomes
        .iter()
        .map(|outcome| {
            let r = &outcome.report;
            vec![
                r.worker_id.to_string(),
                if outcome.is_failed() { "failed" } else { "ok" }.to_string(),
                r.iterations_completed.to_string(),
                r.mismatches.to_string(),
                r.bytes_sent.to_string(),
                r.bytes_received.to_string(),
            ]
        })
        .collect()
}

/// Lay out `rows` under `columns`
pub fn create_table(columns: &[Column], rows: &[RowData], borders: bool) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(idx, col)| {
            rows.iter()
                .filter_map(|row| row.get(idx))
                .map(|cell| cell.len())
                .max()
                .unwrap_or(0)
                .max(col.header.len())
        })
        .collect();

    let mut output = String::new();
    let border = horizontal_border(&widths);

    if borders {
        output.push_str(&border);
        output.push('\n');
    }

    let headers: Vec<String> = columns.iter().map(|c| c.header.clone()).collect();
    output.push_str(&create_row(&headers, &widths, columns, borders));
    output.push('\n');

    if borders {
        output.push_str(&border);
        output.push('\n');
    }

    for row in rows {
        output.push_str(&create_row(row, &widths, columns, borders));
        output.push('\n');
    }

    if borders {
        output.push_str(&border);
    }

    output.trim_end().to_string()
}

fn create_row(data: &[String], widths: &[usize], columns: &[Column], borders: bool) -> String {
    let mut row = String::new();

    if borders {
        row.push('|');
    }

    for ((cell, &width), column) in data.iter().zip(widths.iter()).zip(columns.iter()) {
        let padded = match column.alignment {
            Alignment::Left => format!("{:<width$}", cell, width = width),
            Alignment::Right => format!("{:>width$}", cell, width = width),
        };

        if borders {
            row.push(' ');
            row.push_str(&padded);
            row.push_str(" |");
        } else {
            row.push_str(&padded);
            row.push_str("  ");
        }
    }

    row.trim_end().to_string()
}

fn horizontal_border(widths: &[usize]) -> String {
    let mut border = String::from("+");
    for &width in widths {
        border.push_str(&"-".repeat(width + 2));
        border.push('+');
    }
    border
}

/// Plain text formatter implementation
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }
}

impl OutputFormatter for PlainFormatter {
    fn format_summary(&self, report: &RunReport) -> Result<String> {
        Ok(summary_text(report))
    }

    fn format_worker_table(&self, report: &RunReport) -> Result<String> {
        Ok(create_table(&worker_columns(), &worker_rows(report), self.options.table_borders))
    }

    fn format_failed_workers(&self, report: &RunReport) -> Result<String> {
        let mut output = String::new();

        for outcome in report.outcomes.iter().filter(|o| o.is_failed()) {
            if let Some(error) = &outcome.error {
                writeln!(
                    output,
                    "worker {} failed after {} iterations: {}",
                    outcome.report.worker_id, outcome.report.iterations_completed, error
                )
                .map_err(|e| AppError::internal(format!("Formatting error: {}", e)))?;
            }
        }

        Ok(output.trim_end().to_string())
    }

    fn format_header(&self, title: &str) -> Result<String> {
        Ok(format!("{}\n{}", title, "=".repeat(title.len())))
    }
}
