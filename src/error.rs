//! Structured error handling and exit codes.

use serde::Serialize;

use crate::organizer::RunStatistics;

/// Exit codes for the sortdupe application.
///
/// - 0: Success (every eligible file organized, or nothing to do)
/// - 1: General error (configuration, I/O, unexpected failure)
/// - 2: Directory not found (the root is missing or not a directory)
/// - 3: Partial success (run completed, at least one file failed)
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: the run completed without per-file errors.
    Success = 0,
    /// General error: an unexpected error occurred.
    GeneralError = 1,
    /// Directory not found: the root could not be organized.
    DirectoryNotFound = 2,
    /// Partial success: the run completed but some files failed.
    PartialSuccess = 3,
    /// Interrupted: the run was stopped by the user (Ctrl+C).
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "SD000",
            Self::GeneralError => "SD001",
            Self::DirectoryNotFound => "SD002",
            Self::PartialSuccess => "SD003",
            Self::Interrupted => "SD130",
        }
    }

    /// Exit code for a completed run.
    ///
    /// Interruption wins over per-file errors.
    #[must_use]
    pub fn from_stats(stats: &RunStatistics) -> Self {
        if stats.interrupted {
            Self::Interrupted
        } else if stats.has_errors() {
            Self::PartialSuccess
        } else {
            Self::Success
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "SD001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}
