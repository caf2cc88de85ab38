//! Collision-free destination paths.
//!
//! # Overview
//!
//! [`DestinationResolver::resolve`] returns `target_dir/filename` when that
//! path is free, otherwise the first free `stem_N.ext` for `N = 1, 2, …`.
//! Names are handled as `OsStr`, so bytes that are not valid UTF-8 survive
//! the move unchanged.
//! Every candidate is checked individually: free slots are not assumed to
//! be contiguous, since several dedup keys can target the same bucket with
//! colliding names.
//!
//! A path counts as taken when it exists on disk (including dangling
//! symlinks) or was already handed out earlier in the same run. The second
//! check keeps dry runs, where nothing lands on disk, free of reused paths.
//! The search is bounded by [`MAX_COLLISION_ATTEMPTS`].

use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

/// Upper bound on numeric suffixes tried before giving up.
pub const MAX_COLLISION_ATTEMPTS: u32 = 10_000;

/// Errors raised while resolving a destination.
#[derive(Debug, Error, Clone)]
pub enum ResolveError {
    /// The target directory could not be created.
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        /// Directory that could not be created
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: Arc<io::Error>,
    },

    /// Every suffix up to the bound was taken.
    #[error("no free name for '{file_name}' in {dir} after {attempts} attempts")]
    TooManyCollisions {
        /// Target directory
        dir: PathBuf,
        /// Requested filename
        file_name: String,
        /// Number of suffixes tried
        attempts: u32,
    },
}

/// A resolved destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Final, unused destination path.
    pub path: PathBuf,
    /// Whether a numeric suffix had to be added.
    pub renamed: bool,
}

/// Hands out destination paths that are never reused within a run.
#[derive(Debug)]
pub struct DestinationResolver {
    dry_run: bool,
    max_attempts: u32,
    claimed: HashSet<PathBuf>,
}

impl DestinationResolver {
    /// Create a resolver. In dry-run mode directories are never created.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            max_attempts: MAX_COLLISION_ATTEMPTS,
            claimed: HashSet::new(),
        }
    }

    /// Override the suffix bound (minimum 1).
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Resolve a free path for `file_name` inside `target_dir`.
    ///
    /// Creates `target_dir` if it is missing, unless in dry-run mode.
    /// The returned path is recorded so it is never handed out again.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::CreateDir`] if the directory cannot be
    /// created, or [`ResolveError::TooManyCollisions`] once the bound is hit.
    pub fn resolve(
        &mut self,
        target_dir: &Path,
        file_name: &OsStr,
    ) -> Result<Resolution, ResolveError> {
        if !self.dry_run && !target_dir.is_dir() {
            fs::create_dir_all(target_dir).map_err(|e| ResolveError::CreateDir {
                path: target_dir.to_path_buf(),
                source: Arc::new(e),
            })?;
            log::debug!("Created directory {}", target_dir.display());
        }

        let direct = target_dir.join(file_name);
        if !self.is_taken(&direct) {
            return Ok(self.claim(direct, false));
        }

        let (stem, extension) = split_file_name(file_name);
        for counter in 1..=self.max_attempts {
            let candidate = target_dir.join(suffixed_name(stem, extension, counter));
            if !self.is_taken(&candidate) {
                log::trace!(
                    "Resolved collision for {} after {} attempt(s)",
                    direct.display(),
                    counter
                );
                return Ok(self.claim(candidate, true));
            }
        }

        log::warn!(
            "Giving up on {} after {} attempts",
            direct.display(),
            self.max_attempts
        );
        Err(ResolveError::TooManyCollisions {
            dir: target_dir.to_path_buf(),
            file_name: file_name.to_string_lossy().into_owned(),
            attempts: self.max_attempts,
        })
    }

    fn is_taken(&self, path: &Path) -> bool {
        self.claimed.contains(path) || fs::symlink_metadata(path).is_ok()
    }

    fn claim(&mut self, path: PathBuf, renamed: bool) -> Resolution {
        self.claimed.insert(path.clone());
        Resolution { path, renamed }
    }
}

/// Split a filename at its last `.` into stem and extension.
///
/// Dot-files and names ending in `.` have no extension.
///
/// ```
/// use sortdupe::organizer::resolver::split_file_name;
/// use std::ffi::OsStr;
///
/// let split = |s: &'static str| split_file_name(OsStr::new(s));
/// assert_eq!(split("report.pdf"), (OsStr::new("report"), Some(OsStr::new("pdf"))));
/// assert_eq!(split("a.tar.gz"), (OsStr::new("a.tar"), Some(OsStr::new("gz"))));
/// assert_eq!(split("Makefile"), (OsStr::new("Makefile"), None));
/// ```
#[must_use]
pub fn split_file_name(file_name: &OsStr) -> (&OsStr, Option<&OsStr>) {
    let path = Path::new(file_name);
    match (path.file_stem(), path.extension()) {
        (Some(stem), Some(ext)) if !ext.is_empty() => (stem, Some(ext)),
        _ => (file_name, None),
    }
}

fn suffixed_name(stem: &OsStr, extension: Option<&OsStr>, counter: u32) -> OsString {
    let mut name = stem.to_os_string();
    name.push(format!("_{counter}"));
    if let Some(ext) = extension {
        name.push(".");
        name.push(ext);
    }
    name
}
