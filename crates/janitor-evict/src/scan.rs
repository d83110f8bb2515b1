//! Directory scanner
//!
//! Walks the cache root exactly once. The start time is snapshotted before the
//! walk and every age comparison made afterwards (filtering, searching) is
//! relative to that single instant, so results stay self-consistent even if
//! the scan itself takes minutes.
//!
//! Files whose timestamp is at or after the snapshot are left out: the cache
//! may be populated while we scan and those files are never candidates.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use walkdir::WalkDir;

use crate::error::{EvictError, EvictResult};
use crate::plan::RemovalPlan;
use crate::record::{AgeMetric, FileRecord, InvalidRecord};

/// Everything learned from one walk of the cache root.
#[derive(Debug, Clone)]
pub struct ScanResult {
    root: PathBuf,
    metric: AgeMetric,
    start_time: SystemTime,
    files_scanned: usize,
    skipped_recent: usize,
    total_bytes: u64,
    files: Vec<FileRecord>,
    invalid: Vec<InvalidRecord>,
}

/// Scan `root`, classifying every regular file by `metric`.
///
/// Unreadable entries become [`InvalidRecord`]s. Only a root that is missing,
/// not a directory, or cannot be listed fails the scan.
pub fn scan(root: &Path, metric: AgeMetric) -> EvictResult<ScanResult> {
    match fs::metadata(root) {
        Ok(meta) if !meta.is_dir() => return Err(EvictError::NotADirectory(root.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(EvictError::NotADirectory(root.to_path_buf()));
        }
        Err(source) => {
            return Err(EvictError::RootUnreadable {
                path: root.to_path_buf(),
                source,
            });
        }
        Ok(_) => {}
    }
    fs::read_dir(root).map_err(|source| EvictError::RootUnreadable {
        path: root.to_path_buf(),
        source,
    })?;

    let start_time = SystemTime::now();
    let mut result = ScanResult::empty(root, metric, start_time);

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                // Unreadable subdirectory: keep walking the rest of the tree.
                let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                result.invalid.push(InvalidRecord {
                    path,
                    error: err.to_string(),
                });
                continue;
            }
        };

        let file_type = entry.file_type();
        if file_type.is_dir() {
            continue;
        }

        // Symlinks are judged by their target, so a dangling link is invalid
        // and a link to a directory is not a file at all.
        let meta = if file_type.is_symlink() {
            match fs::metadata(entry.path()) {
                Ok(meta) if meta.is_dir() => continue,
                other => other,
            }
        } else {
            entry.metadata().map_err(io::Error::from)
        };

        let meta = match meta {
            Ok(meta) => meta,
            Err(err) => {
                result.files_scanned += 1;
                result.invalid.push(InvalidRecord {
                    path: entry.into_path(),
                    error: err.to_string(),
                });
                continue;
            }
        };
        if !meta.is_file() {
            continue;
        }
        result.files_scanned += 1;

        match metric.timestamp(&meta) {
            Ok(timestamp) => result.admit(FileRecord {
                path: entry.into_path(),
                size_bytes: meta.len(),
                timestamp,
            }),
            Err(err) => result.invalid.push(InvalidRecord {
                path: entry.into_path(),
                error: err.to_string(),
            }),
        }
    }

    Ok(result)
}

impl ScanResult {
    fn empty(root: &Path, metric: AgeMetric, start_time: SystemTime) -> Self {
        Self {
            root: root.to_path_buf(),
            metric,
            start_time,
            files_scanned: 0,
            skipped_recent: 0,
            total_bytes: 0,
            files: Vec::new(),
            invalid: Vec::new(),
        }
    }

    /// Build a result from an inventory gathered elsewhere.
    ///
    /// Records at or after `start_time` are dropped exactly as [`scan`] would
    /// drop them.
    pub fn from_records(
        root: impl Into<PathBuf>,
        metric: AgeMetric,
        start_time: SystemTime,
        files: Vec<FileRecord>,
        invalid: Vec<InvalidRecord>,
    ) -> Self {
        let root = root.into();
        let mut result = Self::empty(&root, metric, start_time);
        result.files_scanned = files.len() + invalid.len();
        result.invalid = invalid;
        for record in files {
            result.admit(record);
        }
        result
    }

    fn admit(&mut self, record: FileRecord) {
        if record.timestamp >= self.start_time {
            self.skipped_recent += 1;
            return;
        }
        self.total_bytes += record.size_bytes;
        self.files.push(record);
    }

    /// Select every file whose age is at least `max_age`.
    ///
    /// Pure: calling it again with any window leaves `self` untouched.
    pub fn filter(&self, max_age: Duration) -> RemovalPlan<'_> {
        let files: Vec<&FileRecord> = self
            .files
            .iter()
            .filter(|record| self.age_of(record) >= max_age)
            .collect();
        RemovalPlan::new(max_age, files)
    }

    /// Age of `record` relative to the scan start.
    pub fn age_of(&self, record: &FileRecord) -> Duration {
        self.start_time
            .duration_since(record.timestamp)
            .unwrap_or(Duration::ZERO)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn metric(&self) -> AgeMetric {
        self.metric
    }

    pub fn start_time(&self) -> SystemTime {
        self.start_time
    }

    /// Number of non-directory entries examined, invalid ones included.
    pub fn files_scanned(&self) -> usize {
        self.files_scanned
    }

    /// Files excluded because they were touched at or after the start time.
    pub fn skipped_recent(&self) -> usize {
        self.skipped_recent
    }

    /// Total size of every eligible file.
    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    pub fn invalid(&self) -> &[InvalidRecord] {
        &self.invalid
    }
}
