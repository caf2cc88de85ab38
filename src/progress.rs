//! Progress reporting using indicatif.
//!
//! [`Progress`] implements [`OrganizeObserver`] and drives a single bar over
//! the enumerated entries: every skip, move or error advances it by one.
//! When quiet, no bar is ever drawn.

use std::sync::Mutex;

use bytesize::ByteSize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::organizer::{FileError, MoveRecord, OrganizeObserver, RunStatistics};
use crate::scanner::{FileCandidate, SkipReason};

/// Progress bar observer for an organizer run.
pub struct Progress {
    bar: Mutex<Option<ProgressBar>>,
    bytes: Mutex<u64>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, no progress bar will be displayed.
    ///
    /// # Examples
    ///
    /// ```
    /// use sortdupe::progress::Progress;
    ///
    /// let progress = Progress::new(true);
    /// assert!(progress.is_quiet());
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            bar: Mutex::new(None),
            bytes: Mutex::new(0),
            quiet,
        }
    }

    /// Whether the bar is suppressed.
    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    fn style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }

    fn advance(&self, message: Option<String>) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(pb) = guard.as_ref() {
                pb.inc(1);
                if let Some(msg) = message {
                    pb.set_message(msg);
                }
            }
        }
    }
}

impl OrganizeObserver for Progress {
    fn on_start(&self, total: usize) {
        if self.quiet {
            return;
        }
        let pb = ProgressBar::new(total as u64);
        pb.set_style(Self::style());
        pb.set_message("Organizing");
        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(pb);
        }
    }

    fn on_skipped(&self, _candidate: &FileCandidate, _reason: SkipReason) {
        self.advance(None);
    }

    fn on_moved(&self, record: &MoveRecord, bytes: u64) {
        let total = match self.bytes.lock() {
            Ok(mut moved) => {
                *moved += bytes;
                *moved
            }
            Err(_) => 0,
        };
        let name = record
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.advance(Some(format!(
            "{} ({})",
            truncate_name(&name, 30),
            ByteSize::b(total)
        )));
    }

    fn on_error(&self, _error: &FileError) {
        self.advance(None);
    }

    fn on_complete(&self, stats: &RunStatistics) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(pb) = guard.take() {
                let message = if stats.interrupted {
                    "Interrupted"
                } else {
                    "Done"
                };
                pb.finish_with_message(message);
            }
        }
    }
}

/// Shorten a file name for display, keeping its tail.
fn truncate_name(name: &str, max_chars: usize) -> String {
    let count = name.chars().count();
    if count <= max_chars {
        return name.to_string();
    }
    let tail: String = name.chars().skip(count - max_chars + 3).collect();
    format!("...{tail}")
}
