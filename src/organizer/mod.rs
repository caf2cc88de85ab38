//! Organizing files into per-extension buckets.
//!
//! # Overview
//!
//! Every eligible file is moved into `<root>/<PREFIX>_<EXT>[_<timestamp>]`:
//! the first file seen with a given content and extension lands in the
//! unique bucket, later copies in the duplicate bucket.
//!
//! - [`ledger`]: run-scoped map from `(extension, digest)` to canonical destination
//! - [`resolver`]: collision-free destination paths
//! - [`mover`]: rename-based relocation
//! - [`stats`]: run counters
//! - [`engine`]: the per-file pipeline tying the pieces together
//! - [`audit`]: the `SOURCE -> DESTINATION` audit list
//!
//! # Example
//!
//! ```no_run
//! use sortdupe::config::RunConfig;
//! use sortdupe::organizer::Organizer;
//! use std::path::Path;
//!
//! let report = Organizer::new(RunConfig::default().with_dry_run(true))
//!     .run(Path::new("/data/downloads"))
//!     .unwrap();
//!
//! for record in &report.records {
//!     println!("{} -> {}", record.source.display(), record.destination.display());
//! }
//! ```

pub mod audit;
pub mod engine;
pub mod ledger;
pub mod mover;
pub mod resolver;
pub mod stats;

pub use audit::{write_audit, write_audit_file, AuditError};
pub use engine::{
    ErrorRecord, FileError, NoopObserver, OrganizeError, OrganizeObserver, Organizer, RunReport,
};
pub use ledger::{DedupKey, DedupLedger, Registration};
pub use mover::{relocate, MoveError, MoveKind, MoveRecord};
pub use resolver::{DestinationResolver, Resolution, ResolveError};
pub use stats::{Outcome, RunStatistics, StatisticsCollector};
