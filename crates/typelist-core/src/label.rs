//! Content-type labels.

use std::borrow::Borrow;
use std::fmt;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Label given to zero-length regular files without classifying them.
pub const EMPTY_FILE_LABEL: &str = "inode/x-empty; charset=binary";

/// Label given to symbolic links. Links are never dereferenced.
pub const SYMLINK_LABEL: &str = "inode/symlink";

/// A content-type label such as `text/plain; charset=us-ascii`.
///
/// Labels are the grouping key of the [`TypeIndex`](crate::TypeIndex) and
/// order byte-lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(CompactString);

impl Label {
    /// Create a label from any string.
    pub fn new(label: impl Into<CompactString>) -> Self {
        Self(label.into())
    }

    /// The fixed label for empty regular files.
    pub fn empty_file() -> Self {
        Self::new(EMPTY_FILE_LABEL)
    }

    /// The fixed label for symbolic links.
    pub fn symlink() -> Self {
        Self::new(SYMLINK_LABEL)
    }

    /// Build a `<mime>; charset=<charset>` label.
    pub fn with_charset(mime: &str, charset: &str) -> Self {
        Self(compact_str::format_compact!("{mime}; charset={charset}"))
    }

    /// Get the label as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Label {
    fn borrow(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for Label {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for Label {
    fn from(label: String) -> Self {
        Self::new(label)
    }
}
