//! Depth-first directory walker that fills the type index.

use std::ffi::OsStr;
use std::fs;
use std::path::{Component, Path};
use std::time::{Duration, Instant};

use walkdir::{DirEntry, WalkDir};

use typelist_core::{ListConfig, ScanError, ScanWarning, TypeIndex};

use crate::classify::Classifier;
use crate::policy::{Action, EntryKind, EntryPolicy, Visit};
use crate::stats::ScanStats;

/// Result of walking every root.
#[derive(Debug)]
pub struct ScanReport {
    /// Recorded entries grouped by label.
    pub index: TypeIndex,
    /// Non-fatal problems met during the walk.
    pub warnings: Vec<ScanWarning>,
    /// Walk counters.
    pub stats: ScanStats,
    /// Wall time spent walking.
    pub duration: Duration,
}

/// Single-threaded physical walker.
///
/// Roots are walked one after the other, each depth-first without following
/// symbolic links. Every node goes through the [`EntryPolicy`]; regular
/// non-empty files are handed to the classifier exactly once.
pub struct TypeScanner<C> {
    classifier: C,
}

impl<C: Classifier> TypeScanner<C> {
    /// Create a scanner using the given classifier.
    pub fn new(classifier: C) -> Self {
        Self { classifier }
    }

    /// Get the classifier.
    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Walk every root of `config`.
    ///
    /// Fails on the first classification error, and on a root that cannot
    /// be opened unless `ignore_inaccessible` is set. Returns the populated
    /// index; an empty index is not an error here.
    pub fn scan(&self, config: &ListConfig) -> Result<ScanReport, ScanError> {
        let start = Instant::now();
        let policy = EntryPolicy::new(config.include_hidden);

        let mut index = TypeIndex::new();
        let mut stats = ScanStats::new();
        let mut warnings = Vec::new();

        for root in &config.roots {
            self.scan_root(root, config, &policy, &mut index, &mut stats, &mut warnings)?;
        }

        let duration = start.elapsed();
        tracing::debug!(
            recorded = stats.recorded(),
            labels = index.label_count(),
            classified = stats.files_classified,
            warnings = warnings.len(),
            "scan finished in {:.3}s",
            duration.as_secs_f64()
        );

        Ok(ScanReport {
            index,
            warnings,
            stats,
            duration,
        })
    }

    /// Walk a single root.
    fn scan_root(
        &self,
        root: &Path,
        config: &ListConfig,
        policy: &EntryPolicy,
        index: &mut TypeIndex,
        stats: &mut ScanStats,
        warnings: &mut Vec<ScanWarning>,
    ) -> Result<(), ScanError> {
        tracing::debug!("scanning {}", root.display());

        let mut walker = WalkDir::new(root)
            .follow_links(false)
            .follow_root_links(false)
            .into_iter();
        let mut root_opened = false;

        while let Some(entry_result) = walker.next() {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(err) if !root_opened => {
                    // The root itself could not be opened.
                    let source = into_io(err);
                    if !config.ignore_inaccessible {
                        return Err(ScanError::root(root, source));
                    }
                    let warning = ScanWarning::inaccessible_root(root, &source);
                    tracing::warn!("{}", warning.message);
                    warnings.push(warning);
                    stats.roots_skipped += 1;
                    return Ok(());
                }
                Err(err) => {
                    let path = err.path().unwrap_or(root).to_path_buf();
                    let source = into_io(err);
                    let warning = ScanWarning::from_io(path, &source);
                    tracing::warn!("{}", warning.message);
                    warnings.push(warning);
                    continue;
                }
            };
            root_opened = true;

            let kind = match entry_kind(&entry) {
                Ok(kind) => kind,
                Err(source) => {
                    let warning = ScanWarning::metadata_error(entry.path(), &source);
                    tracing::warn!("{}", warning.message);
                    warnings.push(warning);
                    continue;
                }
            };

            let visit = Visit::new(entry.path(), base_name(&entry), kind);
            match policy.decide(&visit) {
                Action::Skip => stats.record_skip(&visit),
                Action::SkipSubtree => {
                    // Skipping drops the pending read error, so check readability first.
                    if let Err(source) = fs::read_dir(visit.path) {
                        let warning = ScanWarning::from_io(visit.path, &source);
                        tracing::warn!("{}", warning.message);
                        warnings.push(warning);
                    }
                    stats.hidden_skipped += 1;
                    walker.skip_current_dir();
                }
                Action::Classify => {
                    let label = self.classifier.classify(visit.path)?;
                    stats.files_classified += 1;
                    index.insert(label, entry.into_path());
                }
                Action::Record(label) => {
                    stats.record_fixed(&visit);
                    index.insert(label, entry.into_path());
                }
            }
        }

        stats.roots_scanned += 1;
        Ok(())
    }
}

/// Base name of a walked node.
///
/// A root spelled `./`, `../` or `sub/..` has no file name of its own; it
/// is named after its last component.
fn base_name(entry: &DirEntry) -> &OsStr {
    if entry.depth() == 0 {
        if let Some(name) = dot_ref_name(entry.path()) {
            return name;
        }
    }
    entry.file_name()
}

fn dot_ref_name(path: &Path) -> Option<&'static OsStr> {
    match path.components().next_back()? {
        Component::CurDir => Some(OsStr::new(".")),
        Component::ParentDir => Some(OsStr::new("..")),
        _ => None,
    }
}

/// Classify a walk entry without following links.
///
/// Only regular files need a stat call, for their size.
fn entry_kind(entry: &DirEntry) -> std::io::Result<EntryKind> {
    let file_type = entry.file_type();
    let kind = if file_type.is_symlink() {
        EntryKind::Symlink
    } else if file_type.is_dir() {
        EntryKind::Directory
    } else if file_type.is_file() {
        let metadata = entry.metadata().map_err(into_io)?;
        EntryKind::File {
            size: metadata.len(),
        }
    } else {
        EntryKind::Other
    };
    Ok(kind)
}

/// Unwrap the OS error behind a walk error.
fn into_io(err: walkdir::Error) -> std::io::Error {
    let message = err.to_string();
    err.into_io_error()
        .unwrap_or_else(|| std::io::Error::other(message))
}
