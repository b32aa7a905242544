//! Core types for typelist.
//!
//! This crate provides the data structures shared by the scanner and the
//! command-line tool: content-type labels, the label-ordered type index,
//! listing configuration, errors, and the emitter that prints an index.

mod config;
mod emit;
mod error;
mod index;
mod label;

pub use config::{BucketOrder, LineTerminator, ListConfig, ListConfigBuilder, OutputFormat};
pub use emit::Emitter;
pub use error::{ClassifyError, ScanError, ScanWarning, WarningKind};
pub use index::{Bucket, TypeIndex};
pub use label::{EMPTY_FILE_LABEL, Label, SYMLINK_LABEL};
