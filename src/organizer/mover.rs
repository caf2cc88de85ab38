//! File relocation.
//!
//! # Overview
//!
//! [`relocate`] moves a file with a single `rename`, which keeps permission
//! bits and timestamps because the inode itself is not rewritten. There is
//! no copy-and-delete fallback: a rename across filesystems fails with
//! [`MoveError::CrossDevice`] and the source stays where it was.
//!
//! The rename never replaces an existing destination. On Linux this is
//! enforced by the kernel through `renameat2(RENAME_NOREPLACE)`; elsewhere,
//! or on filesystems that reject the flag, the destination is checked just
//! before a plain `rename`.
//!
//! In dry-run mode the record is produced without touching the filesystem.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

/// How a file was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveKind {
    /// Canonical copy placed under its own name.
    Unique,
    /// Later copy of already-seen content.
    Duplicate,
    /// Canonical copy placed under a suffixed name.
    Renamed,
}

impl MoveKind {
    /// Lowercase tag used in logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unique => "unique",
            Self::Duplicate => "duplicate",
            Self::Renamed => "renamed",
        }
    }
}

impl std::fmt::Display for MoveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One completed (or, in dry-run mode, planned) relocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    /// Original location.
    pub source: PathBuf,
    /// Final location.
    pub destination: PathBuf,
    /// Placement tag.
    pub kind: MoveKind,
}

impl MoveRecord {
    /// Create a new record.
    #[must_use]
    pub fn new(source: PathBuf, destination: PathBuf, kind: MoveKind) -> Self {
        Self {
            source,
            destination,
            kind,
        }
    }

    /// Whether the file went to a duplicate bucket.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        self.kind == MoveKind::Duplicate
    }
}

/// Error type for relocation.
#[derive(Debug, Error, Clone)]
pub enum MoveError {
    /// Source disappeared before the move.
    #[error("source not found: {0}")]
    SourceMissing(PathBuf),

    /// Something appeared at the destination after it was resolved.
    #[error("destination already exists: {destination}")]
    DestinationExists {
        /// File being moved
        source_path: PathBuf,
        /// Occupied destination
        destination: PathBuf,
    },

    /// The OS refused the rename.
    #[error("permission denied moving {source_path} to {destination}")]
    PermissionDenied {
        /// File being moved
        source_path: PathBuf,
        /// Intended destination
        destination: PathBuf,
    },

    /// Source and destination are on different filesystems.
    #[error("cannot move {source_path} to {destination} across filesystems")]
    CrossDevice {
        /// File being moved
        source_path: PathBuf,
        /// Intended destination
        destination: PathBuf,
    },

    /// Any other I/O failure.
    #[error("failed to move {source_path} to {destination}: {source}")]
    Io {
        /// File being moved
        source_path: PathBuf,
        /// Intended destination
        destination: PathBuf,
        /// The underlying I/O error
        #[source]
        source: Arc<io::Error>,
    },
}

impl MoveError {
    /// Path of the file that failed to move.
    #[must_use]
    pub fn source_path(&self) -> &Path {
        match self {
            Self::SourceMissing(p) => p,
            Self::DestinationExists { source_path, .. }
            | Self::PermissionDenied { source_path, .. }
            | Self::CrossDevice { source_path, .. }
            | Self::Io { source_path, .. } => source_path,
        }
    }
}

/// Move `source` to `destination`, or just describe the move when `dry_run`.
///
/// The destination's parent must already exist; the resolver creates it.
///
/// # Errors
///
/// - `SourceMissing` if the source vanished
/// - `DestinationExists` if the destination appeared since it was resolved
/// - `PermissionDenied`, `CrossDevice` or `Io` if the rename fails
pub fn relocate(
    source: &Path,
    destination: &Path,
    kind: MoveKind,
    dry_run: bool,
) -> Result<MoveRecord, MoveError> {
    let record = MoveRecord::new(source.to_path_buf(), destination.to_path_buf(), kind);

    if dry_run {
        log::debug!(
            "[dry run] would move {} -> {}",
            source.display(),
            destination.display()
        );
        return Ok(record);
    }

    rename_no_replace(source, destination).map_err(|e| classify(source, destination, e))?;

    log::info!(
        "Moved ({}): {} -> {}",
        kind,
        source.display(),
        destination.display()
    );

    Ok(record)
}

/// Rename `source` to `destination`, failing with `AlreadyExists` if the
/// destination is taken at the moment of the rename.
#[cfg(target_os = "linux")]
fn rename_no_replace(source: &Path, destination: &Path) -> io::Result<()> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let from = CString::new(source.as_os_str().as_bytes())?;
    let to = CString::new(destination.as_os_str().as_bytes())?;

    // SAFETY: both pointers come from live NUL-terminated CStrings.
    let rc = unsafe {
        libc::renameat2(
            libc::AT_FDCWD,
            from.as_ptr(),
            libc::AT_FDCWD,
            to.as_ptr(),
            libc::RENAME_NOREPLACE,
        )
    };
    if rc == 0 {
        return Ok(());
    }

    let error = io::Error::last_os_error();
    match error.raw_os_error() {
        // Kernel or filesystem without RENAME_NOREPLACE.
        Some(libc::EINVAL | libc::ENOSYS) => {
            log::debug!("renameat2 unsupported for {}, checking first", destination.display());
            checked_rename(source, destination)
        }
        _ => Err(error),
    }
}

#[cfg(not(target_os = "linux"))]
fn rename_no_replace(source: &Path, destination: &Path) -> io::Result<()> {
    checked_rename(source, destination)
}

fn checked_rename(source: &Path, destination: &Path) -> io::Result<()> {
    if fs::symlink_metadata(destination).is_ok() {
        return Err(io::Error::from(io::ErrorKind::AlreadyExists));
    }
    fs::rename(source, destination)
}

fn classify(source: &Path, destination: &Path, error: io::Error) -> MoveError {
    match error.kind() {
        io::ErrorKind::AlreadyExists => MoveError::DestinationExists {
            source_path: source.to_path_buf(),
            destination: destination.to_path_buf(),
        },
        io::ErrorKind::NotFound if fs::symlink_metadata(source).is_err() => {
            MoveError::SourceMissing(source.to_path_buf())
        }
        io::ErrorKind::PermissionDenied => MoveError::PermissionDenied {
            source_path: source.to_path_buf(),
            destination: destination.to_path_buf(),
        },
        io::ErrorKind::CrossesDevices => MoveError::CrossDevice {
            source_path: source.to_path_buf(),
            destination: destination.to_path_buf(),
        },
        _ => MoveError::Io {
            source_path: source.to_path_buf(),
            destination: destination.to_path_buf(),
            source: Arc::new(error),
        },
    }
}
