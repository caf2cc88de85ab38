//! Run statistics.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::scanner::SkipReason;

/// Per-file outcome fed to the collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Moved to a unique bucket.
    Unique {
        /// File size in bytes
        bytes: u64,
    },
    /// Moved to a duplicate bucket.
    Duplicate {
        /// File size in bytes
        bytes: u64,
    },
    /// Left in place by the path filter.
    Skipped(SkipReason),
    /// Hashing, resolution, moving or traversal failed.
    Error,
}

/// Accumulates counters during a run. Counters only ever grow.
#[derive(Debug, Default)]
pub struct StatisticsCollector {
    unique: usize,
    duplicate: usize,
    skipped: BTreeMap<SkipReason, usize>,
    errors: usize,
    bytes_moved: u64,
    interrupted: bool,
}

impl StatisticsCollector {
    /// Create a collector with all counters at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one outcome.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Unique { bytes } => {
                self.unique += 1;
                self.bytes_moved += bytes;
            }
            Outcome::Duplicate { bytes } => {
                self.duplicate += 1;
                self.bytes_moved += bytes;
            }
            Outcome::Skipped(reason) => {
                *self.skipped.entry(reason).or_insert(0) += 1;
            }
            Outcome::Error => self.errors += 1,
        }
    }

    /// Note that the run stopped early on request.
    pub fn mark_interrupted(&mut self) {
        self.interrupted = true;
    }

    /// Immutable view of the current counters.
    #[must_use]
    pub fn snapshot(&self) -> RunStatistics {
        RunStatistics {
            unique: self.unique,
            duplicate: self.duplicate,
            skipped: self.skipped.values().sum(),
            skipped_by_reason: self.skipped.clone(),
            errors: self.errors,
            bytes_moved: self.bytes_moved,
            interrupted: self.interrupted,
        }
    }
}

/// Final counters of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStatistics {
    /// Files moved to unique buckets
    pub unique: usize,
    /// Files moved to duplicate buckets
    pub duplicate: usize,
    /// Files left in place by the path filter
    pub skipped: usize,
    /// Skip counts keyed by reason
    pub skipped_by_reason: BTreeMap<SkipReason, usize>,
    /// Files that failed to hash, resolve or move, plus traversal errors
    pub errors: usize,
    /// Total size of unique and duplicate files
    pub bytes_moved: u64,
    /// Whether the run stopped early
    pub interrupted: bool,
}

impl RunStatistics {
    /// Number of files skipped for `reason`.
    #[must_use]
    pub fn skipped_by(&self, reason: SkipReason) -> usize {
        self.skipped_by_reason.get(&reason).copied().unwrap_or(0)
    }

    /// Files moved (unique + duplicate).
    #[must_use]
    pub fn moved(&self) -> usize {
        self.unique + self.duplicate
    }

    /// Every outcome recorded.
    #[must_use]
    pub fn total_processed(&self) -> usize {
        self.moved() + self.skipped + self.errors
    }

    /// Whether any per-file error occurred.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}
