//! Scanner module for directory traversal, eligibility filtering and content hashing.
//!
//! This module provides functionality for:
//! - Sequential directory walking using walkdir
//! - Per-file eligibility rules (hidden, already organized, ignored folders,
//!   extension include/exclude, size range)
//! - Whole-file content hashing with a configurable algorithm
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and candidate discovery
//! - [`filter`]: The ordered eligibility rules
//! - [`hasher`]: Streaming content digests (SHA-256, SHA-512, BLAKE3)
//!
//! # Example
//!
//! ```no_run
//! use sortdupe::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("."), WalkerConfig::default());
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod filter;
pub mod hasher;
pub mod walker;

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

// Re-export main types
pub use filter::{eligible, Eligibility, PathFilter, SkipReason};
pub use hasher::{Digest, HashAlgorithm, Hasher};
pub use walker::Walker;

/// Filename prefix that marks a file as hidden.
pub const HIDDEN_MARKER: char = '.';

/// A discovered file together with the attributes the organizer needs.
///
/// Candidates are cheap to build and are recomputed for every file;
/// nothing about them outlives the processing of that file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    /// Path to the file as produced by the traversal (root-joined)
    pub path: PathBuf,
    /// Base filename, byte-for-byte as found on disk
    pub file_name: OsString,
    /// Uppercased extension, `None` when the name carries no extension
    pub extension: Option<String>,
    /// File size in bytes
    pub size: u64,
    /// First path component below the root, `None` for files directly in the root
    pub top_folder: Option<String>,
}

impl FileCandidate {
    /// Build a candidate for `path`, which must live below `root`.
    ///
    /// # Arguments
    ///
    /// * `root` - Root directory being organized
    /// * `path` - Path of the discovered file
    /// * `size` - File size in bytes
    #[must_use]
    pub fn new(root: &Path, path: PathBuf, size: u64) -> Self {
        let file_name = path.file_name().map(OsString::from).unwrap_or_default();
        let extension = extension_of(&file_name.to_string_lossy());
        let top_folder = top_folder_of(root, &path);

        Self {
            path,
            file_name,
            extension,
            size,
            top_folder,
        }
    }

    /// Whether the filename starts with the hidden-file marker.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.file_name.to_string_lossy().starts_with(HIDDEN_MARKER)
    }
}

/// Uppercased extension of a filename.
///
/// The extension is whatever follows the last `.`. Names without a `.`,
/// names ending in `.`, and dot-files without a second `.` have none.
///
/// ```
/// use sortdupe::scanner::extension_of;
///
/// assert_eq!(extension_of("report.pdf").as_deref(), Some("PDF"));
/// assert_eq!(extension_of("archive.tar.gz").as_deref(), Some("GZ"));
/// assert_eq!(extension_of("README"), None);
/// assert_eq!(extension_of(".env"), None);
/// ```
#[must_use]
pub fn extension_of(file_name: &str) -> Option<String> {
    let stem_and_ext = file_name.strip_prefix(HIDDEN_MARKER).unwrap_or(file_name);
    match stem_and_ext.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => Some(ext.to_uppercase()),
        _ => None,
    }
}

fn top_folder_of(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut components = relative.components();
    let first = components.next()?;
    // A file directly in the root has no folder component.
    components.next()?;
    match first {
        Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
        _ => None,
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug, Clone)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: Arc<std::io::Error>,
    },
}

impl ScanError {
    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::PermissionDenied(p) | Self::NotFound(p) | Self::Io { path: p, .. } => p,
        }
    }
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug, Clone)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: Arc<std::io::Error>,
    },
}

impl HashError {
    /// Classify an I/O error raised while reading `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: Arc::new(error),
            },
        }
    }

    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) | Self::Io { path: p, .. } => p,
        }
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Maximum traversal depth; files directly in the root are at depth 1.
    /// `None` walks the whole tree.
    pub max_depth: Option<usize>,
}

impl WalkerConfig {
    /// Create a configuration with the given depth bound.
    #[must_use]
    pub fn new(max_depth: Option<usize>) -> Self {
        Self { max_depth }
    }
}
