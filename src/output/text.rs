//! Human-readable run summary.
//!
//! ```text
//! Organized /data/downloads
//!   Unique:     12
//!   Duplicates: 3
//!   Skipped:    4 (hidden: 2, no-extension: 2)
//!   Errors:     0
//!   Moved:      48.2 MiB
//! ```
//!
//! Dry runs are headed `Dry run: /data/downloads` and list every planned
//! move first. Colors come from `yansi` and follow its global switch.

use std::io::{self, Write};

use bytesize::ByteSize;
use yansi::Paint;

use crate::organizer::audit::format_record;
use crate::organizer::RunReport;

/// Text formatter for a [`RunReport`].
pub struct TextOutput<'a> {
    report: &'a RunReport,
}

impl<'a> TextOutput<'a> {
    /// Create a formatter over `report`.
    #[must_use]
    pub fn new(report: &'a RunReport) -> Self {
        Self { report }
    }

    /// Write the summary (and, for dry runs, the planned moves).
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the writer.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let report = self.report;
        let stats = &report.stats;

        if report.dry_run {
            writeln!(
                writer,
                "{} {}",
                "Dry run:".yellow().bold(),
                report.root.display()
            )?;
            for record in &report.records {
                writeln!(writer, "  {}", format_record(record))?;
            }
            if !report.records.is_empty() {
                writeln!(writer)?;
            }
        } else {
            writeln!(
                writer,
                "{} {}",
                "Organized".green().bold(),
                report.root.display()
            )?;
        }

        writeln!(writer, "  Unique:     {}", stats.unique.green())?;
        writeln!(writer, "  Duplicates: {}", stats.duplicate.cyan())?;
        writeln!(writer, "  Skipped:    {}{}", stats.skipped, self.skip_breakdown())?;
        if stats.has_errors() {
            writeln!(writer, "  Errors:     {}", stats.errors.red().bold())?;
        } else {
            writeln!(writer, "  Errors:     {}", stats.errors)?;
        }
        let moved_label = if report.dry_run { "Would move" } else { "Moved" };
        writeln!(
            writer,
            "  {:<11} {}",
            format!("{moved_label}:"),
            ByteSize::b(stats.bytes_moved)
        )?;

        for error in &report.errors {
            writeln!(
                writer,
                "  {} {}",
                format!("[{}]", error.stage).red(),
                error.message
            )?;
        }

        if stats.interrupted {
            writeln!(
                writer,
                "{}",
                "Interrupted before all files were processed.".yellow()
            )?;
        }
        Ok(())
    }

    fn skip_breakdown(&self) -> String {
        let parts: Vec<String> = self
            .report
            .stats
            .skipped_by_reason
            .iter()
            .map(|(reason, count)| format!("{reason}: {count}"))
            .collect();
        if parts.is_empty() {
            String::new()
        } else {
            format!(" ({})", parts.join(", "))
        }
    }
}
