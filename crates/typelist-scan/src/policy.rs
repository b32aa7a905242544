//! Per-entry decisions made during the walk.

use std::ffi::OsStr;
use std::path::Path;

use typelist_core::Label;

/// What the walk observed about a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file of the given size.
    File { size: u64 },
    /// Symbolic link (never followed).
    Symlink,
    /// Directory.
    Directory,
    /// Device, socket, FIFO or anything else.
    Other,
}

/// One visited filesystem node.
#[derive(Debug, Clone, Copy)]
pub struct Visit<'a> {
    /// Path as produced by the walk (root joined with the relative path).
    pub path: &'a Path,
    /// Base name of the node.
    pub name: &'a OsStr,
    /// Node type.
    pub kind: EntryKind,
}

impl<'a> Visit<'a> {
    /// Create a visit record.
    pub fn new(path: &'a Path, name: &'a OsStr, kind: EntryKind) -> Self {
        Self { path, name, kind }
    }

    /// Base name starts with a dot.
    pub fn is_hidden(&self) -> bool {
        self.name.as_encoded_bytes().first() == Some(&b'.')
    }

    /// Base name is exactly `.` or `..`.
    pub fn is_dot_ref(&self) -> bool {
        matches!(self.name.as_encoded_bytes(), b"." | b"..")
    }
}

/// Outcome for a single visited node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Do nothing and continue the walk.
    Skip,
    /// Do not descend into this directory.
    SkipSubtree,
    /// Ask the classifier for a label, then record the node.
    Classify,
    /// Record the node under a fixed label.
    Record(Label),
}

/// Decides what happens to each visited node.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntryPolicy {
    include_hidden: bool,
}

impl EntryPolicy {
    /// Create a policy. Hidden entries are skipped unless `include_hidden`.
    pub fn new(include_hidden: bool) -> Self {
        Self { include_hidden }
    }

    /// Decide the action for a node.
    pub fn decide(&self, visit: &Visit<'_>) -> Action {
        // `.` and `..` only show up as roots; walk into them.
        if visit.is_dot_ref() {
            return Action::Skip;
        }

        if !self.include_hidden && visit.is_hidden() {
            return match visit.kind {
                EntryKind::Directory => Action::SkipSubtree,
                _ => Action::Skip,
            };
        }

        match visit.kind {
            EntryKind::File { size: 0 } => Action::Record(Label::empty_file()),
            EntryKind::File { .. } => Action::Classify,
            EntryKind::Symlink => Action::Record(Label::symlink()),
            EntryKind::Directory | EntryKind::Other => Action::Skip,
        }
    }
}
