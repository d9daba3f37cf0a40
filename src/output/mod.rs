//! Output formatting and display system
//!
//! Renders a finished run: the one-line verdict, the failed workers and, in
//! verbose mode, a per-worker table. Colored and plain variants share the
//! same verdict text.

mod colored;
mod formatter;

pub use colored::{ColorScheme, ColoredFormatter};
pub use formatter::{
    create_table, summary_text, Alignment, Column, FormattingOptions, OutputFormatter,
    PlainFormatter, RowData,
};

use crate::{error::Result, models::RunReport};

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support and preferences
    pub fn create_formatter(enable_color: bool, verbose: bool) -> Box<dyn OutputFormatter> {
        let options = FormattingOptions {
            enable_color,
            verbose_mode: verbose,
            table_borders: true,
        };

        if enable_color {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }
}

/// Assembles the full report printed after a run
pub struct OutputCoordinator {
    formatter: Box<dyn OutputFormatter>,
    verbose: bool,
}

impl OutputCoordinator {
    pub fn new(formatter: Box<dyn OutputFormatter>, verbose: bool) -> Self {
        Self { formatter, verbose }
    }

    pub fn from_config(config: &crate::models::Config) -> Self {
        Self::new(
            OutputFormatterFactory::create_formatter(config.enable_color, config.verbose),
            config.verbose,
        )
    }

    /// Worker table (verbose only), failed workers, then the verdict on the last line
    pub fn display_results(&self, report: &RunReport) -> Result<String> {
        let mut sections = Vec::new();

        if self.verbose {
            sections.push(self.formatter.format_header("Echo Test Workers")?);
            sections.push(self.formatter.format_worker_table(report)?);
        }

        let failed = self.formatter.format_failed_workers(report)?;
        if !failed.is_empty() {
            sections.push(failed);
        }

        sections.push(self.formatter.format_summary(report)?);

        Ok(sections.join("\n"))
    }
}
