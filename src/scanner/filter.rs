//! Eligibility rules deciding which discovered files get organized.
//!
//! # Overview
//!
//! [`PathFilter`] applies an ordered list of rules to a [`FileCandidate`];
//! the first rule that matches decides the skip reason:
//!
//! 1. hidden filename
//! 2. top-level folder is an unique/duplicate bucket (already organized)
//! 3. top-level folder is in the ignored-folder set (case-insensitive)
//! 4. no extension
//! 5. extension excluded
//! 6. include set configured and extension not in it
//! 7. below the minimum size
//! 8. above the maximum size
//!
//! Exclusion is checked before inclusion, so an extension present in both
//! sets is always excluded. The filter is a pure predicate.

use serde::Serialize;

use super::FileCandidate;
use crate::config::RunConfig;

/// Why a file was left in place without being organized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    /// Filename starts with the hidden-file marker.
    Hidden,
    /// File already lives in a bucket folder.
    AlreadyOrganized,
    /// File lives under an ignored folder.
    IgnoredFolder,
    /// Filename has no extension.
    NoExtension,
    /// Extension is in the exclude set.
    ExcludedExtension,
    /// An include set is configured and the extension is not in it.
    NotIncluded,
    /// File is smaller than the configured minimum.
    TooSmall,
    /// File is larger than the configured maximum.
    TooLarge,
}

impl SkipReason {
    /// Every reason, in rule order.
    pub const ALL: [SkipReason; 8] = [
        SkipReason::Hidden,
        SkipReason::AlreadyOrganized,
        SkipReason::IgnoredFolder,
        SkipReason::NoExtension,
        SkipReason::ExcludedExtension,
        SkipReason::NotIncluded,
        SkipReason::TooSmall,
        SkipReason::TooLarge,
    ];

    /// Stable reason code used in logs and reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hidden => "hidden",
            Self::AlreadyOrganized => "already-organized",
            Self::IgnoredFolder => "ignored-folder",
            Self::NoExtension => "no-extension",
            Self::ExcludedExtension => "excluded-extension",
            Self::NotIncluded => "not-included",
            Self::TooSmall => "too-small",
            Self::TooLarge => "too-large",
        }
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of running a candidate through the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    /// The file should be hashed and organized.
    Eligible,
    /// The file stays where it is.
    Skipped(SkipReason),
}

impl Eligibility {
    /// Whether the candidate passed every rule.
    #[must_use]
    pub fn is_eligible(self) -> bool {
        matches!(self, Self::Eligible)
    }
}

/// Applies the eligibility rules of one run configuration.
#[derive(Debug, Clone, Copy)]
pub struct PathFilter<'a> {
    config: &'a RunConfig,
}

impl<'a> PathFilter<'a> {
    /// Create a filter over the given configuration.
    #[must_use]
    pub fn new(config: &'a RunConfig) -> Self {
        Self { config }
    }

    /// Decide whether `candidate` is eligible, returning the first matching skip reason otherwise.
    #[must_use]
    pub fn check(&self, candidate: &FileCandidate) -> Eligibility {
        match self.skip_reason(candidate) {
            Some(reason) => Eligibility::Skipped(reason),
            None => Eligibility::Eligible,
        }
    }

    fn skip_reason(&self, candidate: &FileCandidate) -> Option<SkipReason> {
        let config = self.config;

        if candidate.is_hidden() {
            return Some(SkipReason::Hidden);
        }

        if let Some(folder) = candidate.top_folder.as_deref() {
            if config.is_bucket_folder(folder) {
                return Some(SkipReason::AlreadyOrganized);
            }
            if config.is_ignored_folder(folder) {
                return Some(SkipReason::IgnoredFolder);
            }
        }

        let Some(extension) = candidate.extension.as_deref() else {
            return Some(SkipReason::NoExtension);
        };

        if config.exclude_extensions.contains(extension) {
            return Some(SkipReason::ExcludedExtension);
        }

        if !config.include_extensions.is_empty() && !config.include_extensions.contains(extension)
        {
            return Some(SkipReason::NotIncluded);
        }

        if config.min_file_size > 0 && candidate.size < config.min_file_size {
            return Some(SkipReason::TooSmall);
        }

        if config.max_file_size > 0 && candidate.size > config.max_file_size {
            return Some(SkipReason::TooLarge);
        }

        None
    }
}

/// Shorthand for `PathFilter::new(config).check(candidate)`.
#[must_use]
pub fn eligible(candidate: &FileCandidate, config: &RunConfig) -> Eligibility {
    PathFilter::new(config).check(candidate)
}
