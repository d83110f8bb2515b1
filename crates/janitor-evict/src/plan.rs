//! Removal plans: a borrowed selection of scanned files.

use std::path::Path;
use std::time::Duration;

use crate::record::FileRecord;

/// Files selected for removal by one age window.
///
/// Borrowed from the [`crate::ScanResult`] it was filtered from, so it can
/// never reference more data than the scan found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalPlan<'a> {
    max_age: Duration,
    files: Vec<&'a FileRecord>,
    total_bytes: u64,
}

impl<'a> RemovalPlan<'a> {
    pub(crate) fn new(max_age: Duration, files: Vec<&'a FileRecord>) -> Self {
        let total_bytes = files.iter().map(|r| r.size_bytes).sum();
        Self {
            max_age,
            files,
            total_bytes,
        }
    }

    /// A plan that removes nothing.
    pub fn empty() -> Self {
        Self::new(Duration::ZERO, Vec::new())
    }

    /// The age window this plan was computed with.
    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    pub fn files(&self) -> &[&'a FileRecord] {
        &self.files
    }

    pub fn paths(&self) -> impl Iterator<Item = &'a Path> + '_ {
        self.files.iter().map(|r| r.path.as_path())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }
}
