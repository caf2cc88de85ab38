//! Audit list of completed moves.
//!
//! One line per [`MoveRecord`], in processing order:
//!
//! ```text
//! /data/a.txt -> /data/FILE_TYPE_TXT/a.txt
//! /data/b.txt -> /data/DUPLICATES_TXT/b.txt (DUPLICATE)
//! ```
//!
//! A dry-run audit starts with a `# dry run` comment line so it can never be
//! mistaken for a record of real moves.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::engine::RunReport;
use super::mover::MoveRecord;

/// Comment line heading a dry-run audit.
pub const DRY_RUN_HEADER: &str = "# dry run";

/// Suffix marking records that went to a duplicate bucket.
pub const DUPLICATE_MARKER: &str = " (DUPLICATE)";

/// Errors that can occur while writing the audit file.
#[derive(thiserror::Error, Debug)]
pub enum AuditError {
    /// The audit file could not be created or written.
    #[error("failed to write audit file {path}: {source}")]
    Io {
        /// Audit file path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Format one record as an audit line, without the trailing newline.
#[must_use]
pub fn format_record(record: &MoveRecord) -> String {
    let marker = if record.is_duplicate() {
        DUPLICATE_MARKER
    } else {
        ""
    };
    format!(
        "{} -> {}{}",
        record.source.display(),
        record.destination.display(),
        marker
    )
}

/// Write every record of `report` to `writer`.
///
/// # Errors
///
/// Returns any I/O error from the writer.
pub fn write_audit<W: Write>(writer: &mut W, report: &RunReport) -> io::Result<()> {
    if report.dry_run {
        writeln!(writer, "{DRY_RUN_HEADER}")?;
    }
    for record in &report.records {
        writeln!(writer, "{}", format_record(record))?;
    }
    writer.flush()
}

/// Create (or truncate) `path` and write the audit list of `report` to it.
///
/// # Errors
///
/// Returns [`AuditError::Io`] if the file cannot be created or written.
pub fn write_audit_file(path: &Path, report: &RunReport) -> Result<(), AuditError> {
    let to_error = |source| AuditError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(to_error)?;
    let mut writer = BufWriter::new(file);
    write_audit(&mut writer, report).map_err(to_error)?;
    log::info!(
        "Wrote {} audit record(s) to {}",
        report.records.len(),
        path.display()
    );
    Ok(())
}
