//! Remover
//!
//! Every path in a plan is attempted exactly once. A failure (most often the
//! file was already removed by an overlapping run) is recorded and the batch
//! keeps going.

use std::fs;
use std::path::PathBuf;

use serde::Serialize;

use crate::plan::RemovalPlan;
use crate::report::Reporter;

/// A path that could not be removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedRemoval {
    pub path: PathBuf,
    pub error: String,
}

/// What happened when a plan was executed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalOutcome {
    /// True when nothing was touched
    pub dry_run: bool,
    /// Paths attempted (0 on dry run)
    pub attempted: usize,
    /// Paths actually removed
    pub removed: usize,
    /// Bytes freed by the removed paths
    pub bytes_removed: u64,
    pub failed: Vec<FailedRemoval>,
}

impl RemovalOutcome {
    pub fn is_partial_failure(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Delete every file in `plan` unless `dry_run` is set.
///
/// Progress is reported on the first file and then roughly every tenth of
/// the plan so a long run visibly stays alive in a logfile.
pub fn remove(plan: &RemovalPlan<'_>, dry_run: bool, reporter: &mut dyn Reporter) -> RemovalOutcome {
    let mut outcome = RemovalOutcome {
        dry_run,
        ..Default::default()
    };
    if dry_run {
        return outcome;
    }

    let total = plan.len();
    let checkpoint = total / 10 + 1;
    for (index, record) in plan.files().iter().enumerate() {
        if index % checkpoint == 0 {
            reporter.progress(index, total);
        }
        outcome.attempted += 1;
        match fs::remove_file(&record.path) {
            Ok(()) => {
                outcome.removed += 1;
                outcome.bytes_removed += record.size_bytes;
            }
            Err(e) => outcome.failed.push(FailedRemoval {
                path: record.path.clone(),
                error: e.to_string(),
            }),
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{AgeMetric, FileRecord};
    use crate::scan::ScanResult;
    use std::path::Path;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    #[derive(Default)]
    struct Checkpoints(Vec<(usize, usize)>);

    impl Reporter for Checkpoints {
        fn progress(&mut self, index: usize, total: usize) {
            self.0.push((index, total));
        }
    }

    fn scan_of(dir: &Path, count: usize) -> ScanResult {
        let start = SystemTime::now();
        let records = (0..count)
            .map(|i| {
                let path = dir.join(format!("file-{i:02}"));
                fs::write(&path, vec![1u8; 10]).unwrap();
                FileRecord {
                    path,
                    size_bytes: 10,
                    timestamp: start - Duration::from_secs(3600),
                }
            })
            .collect();
        ScanResult::from_records(dir, AgeMetric::Modified, start, records, Vec::new())
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let scan = scan_of(temp_dir.path(), 3);
        let plan = scan.filter(Duration::ZERO);

        let outcome = remove(&plan, true, &mut Checkpoints::default());
        assert!(outcome.dry_run);
        assert_eq!(outcome.attempted, 0);
        assert_eq!(outcome.removed, 0);
        for record in scan.files() {
            assert!(record.path.exists(), "dry run must not delete");
        }
    }

    #[test]
    fn test_missing_file_does_not_abort_batch() {
        let temp_dir = TempDir::new().unwrap();
        let scan = scan_of(temp_dir.path(), 10);
        let plan = scan.filter(Duration::ZERO);
        fs::remove_file(&scan.files()[4].path).unwrap();

        let outcome = remove(&plan, false, &mut Checkpoints::default());
        assert_eq!(outcome.attempted, 10);
        assert_eq!(outcome.removed, 9);
        assert_eq!(outcome.bytes_removed, 90);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].path, scan.files()[4].path);
        assert!(outcome.is_partial_failure());
        for record in scan.files() {
            assert!(!record.path.exists());
        }
    }

    #[test]
    fn test_progress_checkpoints() {
        let temp_dir = TempDir::new().unwrap();
        let scan = scan_of(temp_dir.path(), 25);
        let plan = scan.filter(Duration::ZERO);

        let mut checkpoints = Checkpoints::default();
        remove(&plan, false, &mut checkpoints);
        // 25 / 10 + 1 = 3
        let indices: Vec<usize> = checkpoints.0.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![0, 3, 6, 9, 12, 15, 18, 21, 24]);
        assert!(checkpoints.0.iter().all(|(_, total)| *total == 25));
    }

    #[test]
    fn test_empty_plan() {
        let outcome = remove(&RemovalPlan::empty(), false, &mut Checkpoints::default());
        assert_eq!(outcome.attempted, 0);
        assert!(!outcome.is_partial_failure());
    }
}
