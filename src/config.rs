//! Application configuration management.
//!
//! Configuration is layered with figment, lowest priority first:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. A TOML file (`--config PATH`, else `config.toml` in the platform config dir)
//! 3. Environment variables prefixed `SORTDUPE_` (e.g. `SORTDUPE_MIN_FILE_SIZE=1024`)
//! 4. Explicit command-line flags
//!
//! The merged [`Config`] is validated exactly once by
//! [`Config::into_run_config`], producing the immutable [`RunConfig`] that
//! the organizer reads for the rest of the run.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone};
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Deserializer, Serialize};

use crate::scanner::HashAlgorithm;

/// Environment variable prefix for configuration keys.
pub const ENV_PREFIX: &str = "SORTDUPE_";

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An explicitly requested configuration file does not exist.
    #[error("configuration file not found: {0}")]
    MissingFile(PathBuf),

    /// A provider failed to parse or a value had the wrong type.
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    /// A bucket prefix is empty or contains a path separator.
    #[error("invalid folder prefix '{0}': must be non-empty and contain no path separators")]
    InvalidPrefix(String),

    /// Unique and duplicate prefixes are the same.
    #[error("unique and duplicate folder prefixes must differ (both are '{0}')")]
    SamePrefixes(String),

    /// Minimum size exceeds a non-zero maximum.
    #[error("min-file-size ({min}) is greater than max-file-size ({max})")]
    SizeRange {
        /// Configured minimum
        min: u64,
        /// Configured maximum
        max: u64,
    },

    /// A depth of zero would never reach any file.
    #[error("max-depth must be at least 1")]
    ZeroDepth,

    /// The date format is not a valid strftime pattern.
    #[error("invalid date format '{0}'")]
    InvalidDateFormat(String),

    /// The rendered timestamp would not be usable inside a folder name.
    #[error("date format '{format}' renders '{rendered}', which is not a valid folder name suffix")]
    InvalidTimestamp {
        /// The configured format
        format: String,
        /// What it rendered to
        rendered: String,
    },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Load(Box::new(err))
    }
}

/// Raw, user-facing configuration as read from files, environment and flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Restrict processing to these extensions (empty = all).
    #[serde(deserialize_with = "string_or_list")]
    pub include_extensions: Vec<String>,
    /// Always skip these extensions.
    #[serde(deserialize_with = "string_or_list")]
    pub exclude_extensions: Vec<String>,
    /// Minimum file size in bytes (0 = unbounded).
    pub min_file_size: u64,
    /// Maximum file size in bytes (0 = unbounded).
    pub max_file_size: u64,
    /// Append a formatted date to bucket folder names.
    pub use_timestamp: bool,
    /// strftime pattern for the bucket timestamp.
    pub date_format: String,
    /// Prefix of unique-file buckets.
    pub unique_folder_prefix: String,
    /// Prefix of duplicate-file buckets.
    pub duplicate_folder_prefix: String,
    /// Top-level folders that are never organized (case-insensitive).
    #[serde(deserialize_with = "string_or_list")]
    pub ignored_folders: Vec<String>,
    /// Maximum traversal depth (unbounded when absent).
    pub max_depth: Option<usize>,
    /// Skip the interactive confirmation.
    pub skip_confirmation: bool,
    /// Report decisions without touching the filesystem.
    pub dry_run: bool,
    /// Digest scheme for the dedup ledger.
    pub hash_algorithm: HashAlgorithm,
    /// Write a `SOURCE -> DESTINATION` list here after the run.
    pub audit_file: Option<PathBuf>,
    /// Write log records here instead of stderr.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            include_extensions: Vec::new(),
            exclude_extensions: to_strings(&[
                "TMP",
                "TEMP",
                "LOG",
                "BAK",
                "SWP",
                "PART",
                "CRDOWNLOAD",
                "CACHE",
            ]),
            min_file_size: 0,
            max_file_size: 0,
            use_timestamp: false,
            date_format: "%Y%m%d".to_string(),
            unique_folder_prefix: "FILE_TYPE".to_string(),
            duplicate_folder_prefix: "DUPLICATES".to_string(),
            ignored_folders: to_strings(&[
                ".git",
                ".svn",
                ".hg",
                "node_modules",
                "__pycache__",
                ".cache",
                ".idea",
                ".vscode",
                "target",
                "build",
                "dist",
                "venv",
                ".venv",
            ]),
            max_depth: None,
            skip_confirmation: false,
            dry_run: false,
            hash_algorithm: HashAlgorithm::default(),
            audit_file: None,
            log_file: None,
        }
    }
}

impl Config {
    /// Load defaults, then the config file (if any), then `SORTDUPE_*` variables.
    ///
    /// An explicit `config_file` must exist; the default platform file is
    /// used only when present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit file is missing or any layer
    /// fails to parse.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        match config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::MissingFile(path.to_path_buf()));
                }
                log::debug!("Loading configuration from {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
            None => {
                if let Some(path) = Self::default_path().filter(|p| p.exists()) {
                    log::debug!("Loading configuration from {}", path.display());
                    figment = figment.merge(Toml::file(path));
                }
            }
        }

        let config = figment.merge(Env::prefixed(ENV_PREFIX)).extract()?;
        Ok(config)
    }

    /// Default platform-specific configuration file path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "sortdupe", "sortdupe")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Validate and freeze this configuration for one run.
    ///
    /// `now` is the run start time; it is rendered into the bucket suffix
    /// once when `use_timestamp` is set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for empty or clashing prefixes, an inverted
    /// size range, a zero depth, or an unusable date format.
    pub fn into_run_config<Tz>(self, now: &DateTime<Tz>) -> Result<RunConfig, ConfigError>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        validate_prefix(&self.unique_folder_prefix)?;
        validate_prefix(&self.duplicate_folder_prefix)?;
        if self.unique_folder_prefix == self.duplicate_folder_prefix {
            return Err(ConfigError::SamePrefixes(self.unique_folder_prefix));
        }

        if self.max_file_size > 0 && self.min_file_size > self.max_file_size {
            return Err(ConfigError::SizeRange {
                min: self.min_file_size,
                max: self.max_file_size,
            });
        }

        if self.max_depth == Some(0) {
            return Err(ConfigError::ZeroDepth);
        }

        let timestamp = if self.use_timestamp {
            Some(render_timestamp(&self.date_format, now)?)
        } else {
            None
        };

        Ok(RunConfig {
            include_extensions: normalize_extensions(&self.include_extensions),
            exclude_extensions: normalize_extensions(&self.exclude_extensions),
            min_file_size: self.min_file_size,
            max_file_size: self.max_file_size,
            ignored_folders: normalize_folders(&self.ignored_folders),
            max_depth: self.max_depth,
            unique_prefix: self.unique_folder_prefix,
            duplicate_prefix: self.duplicate_folder_prefix,
            timestamp,
            hash_algorithm: self.hash_algorithm,
            dry_run: self.dry_run,
        })
    }
}

/// Which kind of bucket a file is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BucketKind {
    /// The first file seen with a given content and extension.
    Unique,
    /// Every later file with the same content and extension.
    Duplicate,
}

/// Validated, immutable configuration for one organizer run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Uppercased extensions to restrict processing to (empty = all).
    pub include_extensions: BTreeSet<String>,
    /// Uppercased extensions that are always skipped.
    pub exclude_extensions: BTreeSet<String>,
    /// Minimum file size in bytes (0 = unbounded).
    pub min_file_size: u64,
    /// Maximum file size in bytes (0 = unbounded).
    pub max_file_size: u64,
    /// Lowercased ignored top-level folder names.
    pub ignored_folders: BTreeSet<String>,
    /// Maximum traversal depth.
    pub max_depth: Option<usize>,
    /// Prefix of unique-file buckets.
    pub unique_prefix: String,
    /// Prefix of duplicate-file buckets.
    pub duplicate_prefix: String,
    /// Run-scoped timestamp appended to bucket names.
    pub timestamp: Option<String>,
    /// Digest scheme for the whole run.
    pub hash_algorithm: HashAlgorithm,
    /// Report decisions without touching the filesystem.
    pub dry_run: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        let defaults = Config::default();
        Self {
            include_extensions: BTreeSet::new(),
            exclude_extensions: normalize_extensions(&defaults.exclude_extensions),
            min_file_size: 0,
            max_file_size: 0,
            ignored_folders: normalize_folders(&defaults.ignored_folders),
            max_depth: None,
            unique_prefix: defaults.unique_folder_prefix,
            duplicate_prefix: defaults.duplicate_folder_prefix,
            timestamp: None,
            hash_algorithm: defaults.hash_algorithm,
            dry_run: false,
        }
    }
}

impl RunConfig {
    /// Bucket folder name for an (uppercased) extension.
    ///
    /// ```
    /// use sortdupe::config::{BucketKind, RunConfig};
    ///
    /// let config = RunConfig::default();
    /// assert_eq!(config.bucket_name(BucketKind::Unique, "TXT"), "FILE_TYPE_TXT");
    /// assert_eq!(config.bucket_name(BucketKind::Duplicate, "TXT"), "DUPLICATES_TXT");
    /// ```
    #[must_use]
    pub fn bucket_name(&self, kind: BucketKind, extension: &str) -> String {
        let prefix = match kind {
            BucketKind::Unique => &self.unique_prefix,
            BucketKind::Duplicate => &self.duplicate_prefix,
        };
        match &self.timestamp {
            Some(ts) => format!("{prefix}_{extension}_{ts}"),
            None => format!("{prefix}_{extension}"),
        }
    }

    /// Whether a top-level folder name is one of this run's bucket folders
    /// (or a bucket left by an earlier run with a different timestamp).
    #[must_use]
    pub fn is_bucket_folder(&self, folder: &str) -> bool {
        [&self.unique_prefix, &self.duplicate_prefix]
            .iter()
            .any(|prefix| {
                folder
                    .strip_prefix(prefix.as_str())
                    .is_some_and(|rest| rest.starts_with('_'))
            })
    }

    /// Whether a top-level folder name is ignored (case-insensitive).
    #[must_use]
    pub fn is_ignored_folder(&self, folder: &str) -> bool {
        self.ignored_folders.contains(&folder.to_lowercase())
    }

    /// Replace the include set.
    #[must_use]
    pub fn with_include_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.include_extensions = normalize_extensions(extensions);
        self
    }

    /// Replace the exclude set.
    #[must_use]
    pub fn with_exclude_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exclude_extensions = normalize_extensions(extensions);
        self
    }

    /// Replace the ignored-folder set.
    #[must_use]
    pub fn with_ignored_folders<I, S>(mut self, folders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ignored_folders = normalize_folders(folders);
        self
    }

    /// Set the minimum size.
    #[must_use]
    pub fn with_min_file_size(mut self, bytes: u64) -> Self {
        self.min_file_size = bytes;
        self
    }

    /// Set the maximum size.
    #[must_use]
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    /// Set the traversal depth bound.
    #[must_use]
    pub fn with_max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the bucket timestamp suffix.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: Option<String>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Set the digest algorithm.
    #[must_use]
    pub fn with_hash_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.hash_algorithm = algorithm;
        self
    }

    /// Enable or disable dry-run mode.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn normalize_extensions<I, S>(extensions: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    extensions
        .into_iter()
        .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_uppercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}

fn normalize_folders<I, S>(folders: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    folders
        .into_iter()
        .map(|f| f.as_ref().trim().to_lowercase())
        .filter(|f| !f.is_empty())
        .collect()
}

fn validate_prefix(prefix: &str) -> Result<(), ConfigError> {
    if prefix.trim().is_empty() || prefix.contains(['/', '\\']) {
        return Err(ConfigError::InvalidPrefix(prefix.to_string()));
    }
    Ok(())
}

fn render_timestamp<Tz>(format: &str, now: &DateTime<Tz>) -> Result<String, ConfigError>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(ConfigError::InvalidDateFormat(format.to_string()));
    }

    let rendered = now.format(format).to_string();
    if rendered.trim().is_empty() || rendered.contains(['/', '\\']) {
        return Err(ConfigError::InvalidTimestamp {
            format: format.to_string(),
            rendered,
        });
    }
    Ok(rendered)
}

/// Accept either a list or a comma-separated string.
fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrList {
        String(String),
        List(Vec<String>),
    }

    Ok(match StringOrList::deserialize(deserializer)? {
        StringOrList::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        StringOrList::List(list) => list,
    })
}
