//! The organizing pass.
//!
//! # Overview
//!
//! [`Organizer::run`] enumerates the tree once, then takes every file to
//! completion before looking at the next:
//!
//! 1. build a [`FileCandidate`]
//! 2. apply the [`PathFilter`]; skipped files stay put
//! 3. hash the content; unreadable files stay put
//! 4. look up `(extension, digest)` in the [`DedupLedger`] to pick the
//!    unique or duplicate bucket
//! 5. resolve a collision-free destination
//! 6. register a first occurrence in the ledger, before the move
//! 7. move the file and record the outcome
//!
//! Registering before moving means a failed move of a canonical file still
//! sends later copies to the duplicate bucket.
//!
//! All run state lives in a [`RunContext`] created per call and returned
//! as a [`RunReport`]; nothing survives between runs.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use super::ledger::{DedupKey, DedupLedger, Registration};
use super::mover::{relocate, MoveError, MoveKind, MoveRecord};
use super::resolver::{DestinationResolver, ResolveError};
use super::stats::{Outcome, RunStatistics, StatisticsCollector};
use crate::config::{BucketKind, RunConfig};
use crate::scanner::{
    Eligibility, FileCandidate, HashError, Hasher, PathFilter, ScanError, SkipReason, Walker,
    WalkerConfig,
};

/// Fatal preconditions that stop a run before any file is touched.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The root directory does not exist.
    #[error("directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// The root exists but is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// A per-file failure. The file is left where it was and the run continues.
#[derive(Debug, Clone, Error)]
pub enum FileError {
    /// A directory or entry could not be read during traversal.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// The file content could not be read.
    #[error(transparent)]
    Hash(#[from] HashError),

    /// No destination could be chosen.
    #[error("{path}: {source}")]
    Resolve {
        /// File being organized
        path: PathBuf,
        /// Resolver failure
        #[source]
        source: ResolveError,
    },

    /// The relocation failed.
    #[error(transparent)]
    Move(#[from] MoveError),
}

impl FileError {
    /// Path of the affected file or directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Scan(e) => e.path(),
            Self::Hash(e) => e.path(),
            Self::Resolve { path, .. } => path,
            Self::Move(e) => e.source_path(),
        }
    }

    /// Short name of the stage that failed.
    #[must_use]
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Scan(_) => "scan",
            Self::Hash(_) => "hash",
            Self::Resolve { .. } => "resolve",
            Self::Move(_) => "move",
        }
    }
}

/// Serializable form of a [`FileError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorRecord {
    /// Affected path
    pub path: PathBuf,
    /// Failing stage (`scan`, `hash`, `resolve`, `move`)
    pub stage: &'static str,
    /// Human-readable message
    pub message: String,
}

impl From<&FileError> for ErrorRecord {
    fn from(error: &FileError) -> Self {
        Self {
            path: error.path().to_path_buf(),
            stage: error.stage(),
            message: error.to_string(),
        }
    }
}

/// Everything a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Root that was organized
    pub root: PathBuf,
    /// Whether this was a dry run
    pub dry_run: bool,
    /// Completed (or planned) moves, in processing order
    pub records: Vec<MoveRecord>,
    /// Per-file failures, in processing order
    pub errors: Vec<ErrorRecord>,
    /// Final counters
    pub stats: RunStatistics,
}

/// Receives per-file events while a run is in progress.
///
/// All methods default to no-ops.
pub trait OrganizeObserver {
    /// Called once the enumeration is complete.
    fn on_start(&self, _total: usize) {}

    /// Called when the path filter leaves a file in place.
    fn on_skipped(&self, _candidate: &FileCandidate, _reason: SkipReason) {}

    /// Called after each successful (or planned) move.
    fn on_moved(&self, _record: &MoveRecord, _bytes: u64) {}

    /// Called for every per-file failure.
    fn on_error(&self, _error: &FileError) {}

    /// Called once with the final counters.
    fn on_complete(&self, _stats: &RunStatistics) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl OrganizeObserver for NoopObserver {}

/// Mutable state of one run.
struct RunContext {
    ledger: DedupLedger,
    resolver: DestinationResolver,
    stats: StatisticsCollector,
    records: Vec<MoveRecord>,
    errors: Vec<ErrorRecord>,
}

impl RunContext {
    fn new(dry_run: bool) -> Self {
        Self {
            ledger: DedupLedger::new(),
            resolver: DestinationResolver::new(dry_run),
            stats: StatisticsCollector::new(),
            records: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn fail<O: OrganizeObserver + ?Sized>(&mut self, error: FileError, observer: &O) {
        log::warn!("{} failed: {}", error.stage(), error);
        self.stats.record(Outcome::Error);
        self.errors.push(ErrorRecord::from(&error));
        observer.on_error(&error);
    }

    fn into_report(self, root: &Path, dry_run: bool) -> RunReport {
        RunReport {
            root: root.to_path_buf(),
            dry_run,
            records: self.records,
            errors: self.errors,
            stats: self.stats.snapshot(),
        }
    }
}

/// Drives the organizing pass for one configuration.
#[derive(Debug, Clone)]
pub struct Organizer {
    config: RunConfig,
    hasher: Hasher,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Organizer {
    /// Create an organizer for the given configuration.
    #[must_use]
    pub fn new(config: RunConfig) -> Self {
        let hasher = Hasher::new(config.hash_algorithm);
        Self {
            config,
            hasher,
            shutdown_flag: None,
        }
    }

    /// Stop between files once `flag` is set.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// The run configuration.
    #[must_use]
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Organize `root` without reporting events.
    ///
    /// # Errors
    ///
    /// Returns [`OrganizeError`] if `root` is missing or not a directory.
    pub fn run(&self, root: &Path) -> Result<RunReport, OrganizeError> {
        self.run_with_observer(root, &NoopObserver)
    }

    /// Organize `root`, reporting every event to `observer`.
    ///
    /// # Errors
    ///
    /// Returns [`OrganizeError`] if `root` is missing or not a directory.
    /// Per-file failures are reported through the observer and the report.
    pub fn run_with_observer<O: OrganizeObserver + ?Sized>(
        &self,
        root: &Path,
        observer: &O,
    ) -> Result<RunReport, OrganizeError> {
        if !root.exists() {
            log::error!("Directory not found: {}", root.display());
            return Err(OrganizeError::DirectoryNotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            log::error!("Not a directory: {}", root.display());
            return Err(OrganizeError::NotADirectory(root.to_path_buf()));
        }

        let mut ctx = RunContext::new(self.config.dry_run);

        // Enumerate first so bucket folders created below are never walked.
        let mut walker = Walker::new(root, WalkerConfig::new(self.config.max_depth));
        if let Some(flag) = &self.shutdown_flag {
            walker = walker.with_shutdown_flag(Arc::clone(flag));
        }
        let entries: Vec<_> = walker.walk().collect();

        log::info!(
            "Organizing {} ({} entries{})",
            root.display(),
            entries.len(),
            if self.config.dry_run { ", dry run" } else { "" }
        );
        observer.on_start(entries.len());

        let filter = PathFilter::new(&self.config);
        for entry in entries {
            if self.is_shutdown_requested() {
                log::info!("Shutdown requested, stopping before the next file");
                ctx.stats.mark_interrupted();
                break;
            }

            match entry {
                Ok(candidate) => self.process(&mut ctx, root, &filter, &candidate, observer),
                Err(e) => ctx.fail(FileError::Scan(e), observer),
            }
        }

        // The walker itself may have stopped early.
        if self.is_shutdown_requested() {
            ctx.stats.mark_interrupted();
        }

        let report = ctx.into_report(root, self.config.dry_run);
        log::info!(
            "Done: {} unique, {} duplicate, {} skipped, {} errors",
            report.stats.unique,
            report.stats.duplicate,
            report.stats.skipped,
            report.stats.errors
        );
        observer.on_complete(&report.stats);
        Ok(report)
    }

    fn process<O: OrganizeObserver + ?Sized>(
        &self,
        ctx: &mut RunContext,
        root: &Path,
        filter: &PathFilter<'_>,
        candidate: &FileCandidate,
        observer: &O,
    ) {
        let extension = match (filter.check(candidate), candidate.extension.as_deref()) {
            (Eligibility::Skipped(reason), _) => {
                log::debug!("Skipped ({}): {}", reason, candidate.path.display());
                ctx.stats.record(Outcome::Skipped(reason));
                observer.on_skipped(candidate, reason);
                return;
            }
            (Eligibility::Eligible, Some(ext)) => ext,
            // The filter never passes a file without an extension.
            (Eligibility::Eligible, None) => return,
        };

        let digest = match self.hasher.digest(&candidate.path) {
            Ok(digest) => digest,
            Err(e) => return ctx.fail(FileError::Hash(e), observer),
        };
        log::trace!("{} {}", digest, candidate.path.display());

        let key = DedupKey::new(extension, digest);
        let bucket = match ctx.ledger.get(&key) {
            Some(canonical) => {
                log::debug!(
                    "Duplicate of {}: {}",
                    canonical.display(),
                    candidate.path.display()
                );
                BucketKind::Duplicate
            }
            None => BucketKind::Unique,
        };
        let target_dir = root.join(self.config.bucket_name(bucket, extension));

        let resolution = match ctx.resolver.resolve(&target_dir, &candidate.file_name) {
            Ok(resolution) => resolution,
            Err(source) => {
                let error = FileError::Resolve {
                    path: candidate.path.clone(),
                    source,
                };
                return ctx.fail(error, observer);
            }
        };

        let kind = match bucket {
            BucketKind::Duplicate => MoveKind::Duplicate,
            BucketKind::Unique => {
                // Fixed before the move so a failed move still routes later copies.
                let registration = ctx.ledger.lookup_or_register(key, resolution.path.clone());
                debug_assert_eq!(registration, Registration::First);
                if resolution.renamed {
                    MoveKind::Renamed
                } else {
                    MoveKind::Unique
                }
            }
        };

        match relocate(&candidate.path, &resolution.path, kind, self.config.dry_run) {
            Ok(record) => {
                let outcome = if record.is_duplicate() {
                    Outcome::Duplicate {
                        bytes: candidate.size,
                    }
                } else {
                    Outcome::Unique {
                        bytes: candidate.size,
                    }
                };
                ctx.stats.record(outcome);
                observer.on_moved(&record, candidate.size);
                ctx.records.push(record);
            }
            Err(e) => ctx.fail(FileError::Move(e), observer),
        }
    }
}
