//! Listing configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::ScanError;

/// How each listed entry is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `<path>`
    #[default]
    Name,
    /// `<label>: <path>`
    Labeled,
    /// A JSON array of `{ "label", "paths" }` groups.
    Json,
}

/// Byte written after every output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineTerminator {
    #[default]
    Newline,
    Nul,
}

impl LineTerminator {
    /// The terminator byte.
    pub fn as_byte(self) -> u8 {
        match self {
            Self::Newline => b'\n',
            Self::Nul => 0,
        }
    }
}

/// Order of the paths inside one label group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BucketOrder {
    /// Most recently discovered entry first.
    #[default]
    NewestFirst,
    /// The order the walk discovered the entries in.
    Discovery,
}

/// Configuration for a listing run.
///
/// Resolved once before the walk starts and read-only afterwards.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ListConfig {
    /// Root paths, walked in order.
    #[builder(default = "default_roots()")]
    #[serde(default = "default_roots")]
    pub roots: Vec<PathBuf>,

    /// Output line format.
    #[builder(default)]
    #[serde(default)]
    pub format: OutputFormat,

    /// Output line terminator.
    #[builder(default)]
    #[serde(default)]
    pub terminator: LineTerminator,

    /// Include entries whose name starts with `.`.
    #[builder(default = "false")]
    #[serde(default)]
    pub include_hidden: bool,

    /// Warn about a root that cannot be opened instead of failing.
    #[builder(default = "false")]
    #[serde(default)]
    pub ignore_inaccessible: bool,

    /// Order of paths within a label group.
    #[builder(default)]
    #[serde(default)]
    pub bucket_order: BucketOrder,
}

fn default_roots() -> Vec<PathBuf> {
    vec![PathBuf::from(".")]
}

impl ListConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref roots) = self.roots {
            if roots.iter().any(|root| root.as_os_str().is_empty()) {
                return Err("Root path cannot be empty".to_string());
            }
        }
        Ok(())
    }
}

impl From<ListConfigBuilderError> for ScanError {
    fn from(err: ListConfigBuilderError) -> Self {
        Self::InvalidConfig {
            message: err.to_string(),
        }
    }
}

impl ListConfig {
    /// Create a new config builder.
    pub fn builder() -> ListConfigBuilder {
        ListConfigBuilder::default()
    }

    /// Create a default config listing the given roots.
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            roots: default_roots(),
            format: OutputFormat::default(),
            terminator: LineTerminator::default(),
            include_hidden: false,
            ignore_inaccessible: false,
            bucket_order: BucketOrder::default(),
        }
    }
}
