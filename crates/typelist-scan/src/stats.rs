//! Walk counters.

use serde::{Deserialize, Serialize};

use crate::policy::{EntryKind, Visit};

/// Counters collected while walking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Roots walked to completion.
    pub roots_scanned: u64,
    /// Roots skipped because they could not be opened.
    pub roots_skipped: u64,
    /// Directories walked into.
    pub dirs_visited: u64,
    /// Files handed to the classifier.
    pub files_classified: u64,
    /// Empty files recorded without classification.
    pub empty_files: u64,
    /// Symbolic links recorded.
    pub symlinks: u64,
    /// Hidden files and links left out, plus pruned hidden directories.
    pub hidden_skipped: u64,
    /// Devices, sockets and FIFOs left out.
    pub other_skipped: u64,
}

impl ScanStats {
    /// Create zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a node that was skipped.
    ///
    /// Files and links are only ever skipped for being hidden.
    pub(crate) fn record_skip(&mut self, visit: &Visit<'_>) {
        match visit.kind {
            EntryKind::Directory => self.dirs_visited += 1,
            EntryKind::Other => self.other_skipped += 1,
            EntryKind::File { .. } | EntryKind::Symlink => self.hidden_skipped += 1,
        }
    }

    /// Count a node recorded under a fixed label.
    pub(crate) fn record_fixed(&mut self, visit: &Visit<'_>) {
        match visit.kind {
            EntryKind::Symlink => self.symlinks += 1,
            _ => self.empty_files += 1,
        }
    }

    /// Total nodes recorded in the index.
    pub fn recorded(&self) -> u64 {
        self.files_classified + self.empty_files + self.symlinks
    }
}
