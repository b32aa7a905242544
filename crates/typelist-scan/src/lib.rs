//! Directory walking and content classification for typelist.
//!
//! This crate drives a single-threaded, depth-first, physical walk over one
//! or more roots and fills a [`TypeIndex`] with every recorded entry.
//!
//! # Overview
//!
//! - [`TypeScanner`] walks the roots in order and reports per-node problems
//!   as warnings.
//! - [`EntryPolicy`] decides per node: skip it, prune its subtree, record it
//!   under a fixed label, or classify it.
//! - [`Classifier`] resolves labels for regular non-empty files;
//!   [`SignatureClassifier`] is the built-in implementation.
//!
//! Empty files are recorded as `inode/x-empty; charset=binary` and symbolic
//! links as `inode/symlink` without calling the classifier.
//!
//! # Example
//!
//! ```rust,no_run
//! use typelist_scan::{Emitter, ListConfig, SignatureClassifier, TypeScanner};
//!
//! let config = ListConfig::new(["/path/to/scan"]);
//! let scanner = TypeScanner::new(SignatureClassifier::new());
//! let report = scanner.scan(&config).unwrap();
//!
//! Emitter::from_config(&config)
//!     .emit(&report.index, std::io::stdout().lock())
//!     .unwrap();
//! ```

mod classify;
mod policy;
mod scanner;
mod stats;

pub use classify::{Classifier, SignatureClassifier};
pub use policy::{Action, EntryKind, EntryPolicy, Visit};
pub use scanner::{ScanReport, TypeScanner};
pub use stats::ScanStats;

// Re-export core types for convenience
pub use typelist_core::{
    Bucket, BucketOrder, ClassifyError, Emitter, Label, LineTerminator, ListConfig, OutputFormat,
    ScanError, ScanWarning, TypeIndex, WarningKind,
};
