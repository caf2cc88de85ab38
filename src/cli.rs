//! Command-line interface definitions for sortdupe.
//!
//! Every organizing option is optional on the command line: a flag that is
//! not given leaves the value from defaults, config file or `SORTDUPE_*`
//! environment in place (see [`Cli::apply_overrides`]).
//!
//! # Example
//!
//! ```bash
//! # Preview what would happen in ~/Downloads
//! sortdupe --dry-run ~/Downloads
//!
//! # Only photos above 100 KiB, timestamped buckets, no prompt
//! sortdupe --include-ext jpg,png,heic --min-size 100KiB --use-timestamp -y ~/Pictures
//!
//! # JSON report plus an audit list
//! sortdupe -y --output json --audit-file moves.txt ~/Downloads
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::Config;
use crate::scanner::HashAlgorithm;

/// Organize files into per-extension folders and separate duplicates.
///
/// Every file below PATH is moved into `<PREFIX>_<EXT>` next to it; files whose
/// content already appeared with the same extension go to the duplicate bucket.
#[derive(Debug, Parser)]
#[command(name = "sortdupe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to organize
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Only organize these extensions (comma-separated, repeatable)
    #[arg(long = "include-ext", value_name = "EXT", value_delimiter = ',')]
    pub include_ext: Vec<String>,

    /// Never organize these extensions (comma-separated, repeatable)
    ///
    /// Replaces the default exclusion list (TMP, TEMP, LOG, BAK, ...).
    #[arg(long = "exclude-ext", value_name = "EXT", value_delimiter = ',')]
    pub exclude_ext: Vec<String>,

    /// Minimum file size (e.g., 1KB, 1MB, 1GB)
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub min_size: Option<u64>,

    /// Maximum file size (e.g., 1KB, 1MB, 1GB); 0 means unbounded
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub max_size: Option<u64>,

    /// Append the run date to bucket folder names
    #[arg(long)]
    pub use_timestamp: bool,

    /// strftime pattern for the bucket date suffix
    #[arg(long, value_name = "FORMAT")]
    pub date_format: Option<String>,

    /// Prefix of unique-file folders
    #[arg(long, value_name = "PREFIX")]
    pub unique_prefix: Option<String>,

    /// Prefix of duplicate-file folders
    #[arg(long, value_name = "PREFIX")]
    pub duplicate_prefix: Option<String>,

    /// Top-level folder to leave alone (repeatable)
    ///
    /// Replaces the default ignored-folder list (.git, node_modules, ...).
    #[arg(long = "ignore-folder", value_name = "NAME")]
    pub ignore_folder: Vec<String>,

    /// Maximum directory depth to descend (1 = only files directly in PATH)
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Show what would be moved without touching anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Content hash used to detect duplicates
    #[arg(long, value_enum, value_name = "ALGORITHM")]
    pub hash_algorithm: Option<HashAlgorithm>,

    /// Write a `SOURCE -> DESTINATION` list of moves to this file
    #[arg(long, value_name = "PATH")]
    pub audit_file: Option<PathBuf>,

    /// Write log records to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Configuration file (default: platform config dir, sortdupe/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Format of the end-of-run report
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Do not draw a progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print fatal errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,
}

impl Cli {
    /// Apply every flag that was actually given on top of `config`.
    pub fn apply_overrides(&self, config: &mut Config) {
        if !self.include_ext.is_empty() {
            config.include_extensions.clone_from(&self.include_ext);
        }
        if !self.exclude_ext.is_empty() {
            config.exclude_extensions.clone_from(&self.exclude_ext);
        }
        if let Some(min) = self.min_size {
            config.min_file_size = min;
        }
        if let Some(max) = self.max_size {
            config.max_file_size = max;
        }
        if self.use_timestamp {
            config.use_timestamp = true;
        }
        if let Some(format) = &self.date_format {
            config.date_format.clone_from(format);
        }
        if let Some(prefix) = &self.unique_prefix {
            config.unique_folder_prefix.clone_from(prefix);
        }
        if let Some(prefix) = &self.duplicate_prefix {
            config.duplicate_folder_prefix.clone_from(prefix);
        }
        if !self.ignore_folder.is_empty() {
            config.ignored_folders.clone_from(&self.ignore_folder);
        }
        if self.max_depth.is_some() {
            config.max_depth = self.max_depth;
        }
        if self.yes {
            config.skip_confirmation = true;
        }
        if self.dry_run {
            config.dry_run = true;
        }
        if let Some(algorithm) = self.hash_algorithm {
            config.hash_algorithm = algorithm;
        }
        if self.audit_file.is_some() {
            config.audit_file.clone_from(&self.audit_file);
        }
        if self.log_file.is_some() {
            config.log_file.clone_from(&self.log_file);
        }
    }

    /// Whether a progress bar should be drawn for this invocation.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        !(self.quiet || self.no_progress || self.output == OutputFormat::Json)
    }
}

/// Format of the end-of-run report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    Text,
    /// Serialized run report
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Parse a human-readable size string into bytes.
///
/// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
/// Case-insensitive. Numbers without suffix are treated as bytes.
///
/// # Examples
///
/// ```
/// use sortdupe::cli::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("1KB").unwrap(), 1000);
/// assert_eq!(parse_size("1KiB").unwrap(), 1024);
/// assert_eq!(parse_size("1MiB").unwrap(), 1_048_576);
/// ```
///
/// # Errors
///
/// Returns an error if the string is empty, contains an invalid number,
/// a negative number, or an unknown size suffix.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    if num < 0.0 {
        return Err("Size cannot be negative".to_string());
    }

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        "TB" | "T" => 1_000_000_000_000,
        "TIB" => 1_099_511_627_776,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    Ok((num * multiplier as f64) as u64)
}
