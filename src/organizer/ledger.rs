//! Run-scoped dedup ledger.
//!
//! Maps each [`DedupKey`] to the destination chosen for the first file that
//! carried it. Entries are created once and never overwritten; the ledger
//! is owned by a single run and dropped with it.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::scanner::Digest;

/// Content identity for deduplication: same extension and same digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DedupKey {
    extension: String,
    digest: Digest,
}

impl DedupKey {
    /// Build a key from an uppercased extension and a content digest.
    #[must_use]
    pub fn new(extension: impl Into<String>, digest: Digest) -> Self {
        Self {
            extension: extension.into(),
            digest,
        }
    }

    /// The uppercased extension.
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// The content digest.
    #[must_use]
    pub fn digest(&self) -> &Digest {
        &self.digest
    }
}

/// Outcome of [`DedupLedger::lookup_or_register`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// The key was new; the proposed destination is now canonical.
    First,
    /// The key was already registered with this canonical destination.
    AlreadySeen(PathBuf),
}

/// Mapping from dedup key to canonical destination.
#[derive(Debug, Default)]
pub struct DedupLedger {
    entries: HashMap<DedupKey, PathBuf>,
}

impl DedupLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical destination registered for `key`, if any.
    #[must_use]
    pub fn get(&self, key: &DedupKey) -> Option<&Path> {
        self.entries.get(key).map(PathBuf::as_path)
    }

    /// Whether `key` has been registered.
    #[must_use]
    pub fn contains(&self, key: &DedupKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Register `proposed` as canonical for `key` unless the key is already known.
    ///
    /// The first call for a key stores `proposed` and returns
    /// [`Registration::First`]; later calls leave the entry untouched and
    /// return the stored destination.
    pub fn lookup_or_register(&mut self, key: DedupKey, proposed: PathBuf) -> Registration {
        match self.entries.entry(key) {
            Entry::Occupied(entry) => Registration::AlreadySeen(entry.get().clone()),
            Entry::Vacant(entry) => {
                entry.insert(proposed);
                Registration::First
            }
        }
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no key has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
