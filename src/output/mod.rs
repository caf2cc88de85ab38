//! End-of-run report rendering.
//!
//! - [`text`]: colored human-readable summary
//! - [`json`]: the serialized [`RunReport`](crate::organizer::RunReport)
//!
//! # Example
//!
//! ```no_run
//! use sortdupe::config::RunConfig;
//! use sortdupe::organizer::Organizer;
//! use sortdupe::output::TextOutput;
//! use std::path::Path;
//!
//! let report = Organizer::new(RunConfig::default().with_dry_run(true))
//!     .run(Path::new("."))
//!     .unwrap();
//! TextOutput::new(&report).write_to(&mut std::io::stdout()).unwrap();
//! ```

pub mod json;
pub mod text;

pub use json::{JsonOutput, JsonOutputError};
pub use text::TextOutput;
