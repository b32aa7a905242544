//! The type index: paths grouped by content-type label.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::path::{Path, PathBuf};

use itertools::Either;

use crate::config::BucketOrder;
use crate::label::Label;

/// All paths sharing one label, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bucket {
    paths: Vec<PathBuf>,
}

impl Bucket {
    fn push(&mut self, path: PathBuf) {
        self.paths.push(path);
    }

    /// Number of paths in the bucket.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if the bucket holds no paths.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Paths in the order they were inserted.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Iterate paths in the requested order.
    pub fn ordered(&self, order: BucketOrder) -> impl Iterator<Item = &Path> + '_ {
        let iter = match order {
            BucketOrder::Discovery => Either::Left(self.paths.iter()),
            BucketOrder::NewestFirst => Either::Right(self.paths.iter().rev()),
        };
        iter.map(PathBuf::as_path)
    }
}

/// Ordered map from label to bucket.
///
/// Labels are unique keys and iterate in ascending byte order, so a full
/// walk yields sorted output without a separate sort pass. Buckets are
/// created on the first insert of a label and never removed.
#[derive(Debug, Clone, Default)]
pub struct TypeIndex {
    buckets: BTreeMap<Label, Bucket>,
    entries: usize,
}

impl TypeIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `path` under `label`.
    ///
    /// Returns `true` if this created the label's bucket.
    pub fn insert(&mut self, label: Label, path: impl Into<PathBuf>) -> bool {
        self.entries += 1;
        match self.buckets.entry(label) {
            Entry::Occupied(mut bucket) => {
                bucket.get_mut().push(path.into());
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(Bucket::default()).push(path.into());
                true
            }
        }
    }

    /// Visit every label and its bucket in ascending label order.
    pub fn ordered_walk<F>(&self, mut visitor: F)
    where
        F: FnMut(&Label, &Bucket),
    {
        for (label, bucket) in &self.buckets {
            visitor(label, bucket);
        }
    }

    /// Iterate labels and buckets in ascending label order.
    pub fn iter(&self) -> impl Iterator<Item = (&Label, &Bucket)> + '_ {
        self.buckets.iter()
    }

    /// Labels in ascending order.
    pub fn labels(&self) -> impl Iterator<Item = &Label> + '_ {
        self.buckets.keys()
    }

    /// Look up the bucket for a label.
    pub fn get(&self, label: &str) -> Option<&Bucket> {
        self.buckets.get(label)
    }

    /// Total number of recorded paths.
    pub fn len(&self) -> usize {
        self.entries
    }

    /// Number of distinct labels.
    pub fn label_count(&self) -> usize {
        self.buckets.len()
    }

    /// Check if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }
}
