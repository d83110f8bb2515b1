//! End-to-end eviction tests against real directory trees.

use std::collections::HashSet;
use std::fs::{self, File, FileTimes};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tempfile::TempDir;

use janitor_evict::{
    remove, scan, search_threshold, AgeMetric, DiskSnapshot, NullReporter, Reporter,
    SearchPolicy, SearchStatus, WindowTrial,
};

const HOUR: Duration = Duration::from_secs(60 * 60);

fn write_aged(path: &Path, size: usize, age: Duration) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, vec![0u8; size]).unwrap();
    let when = SystemTime::now() - age;
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_times(FileTimes::new().set_accessed(when).set_modified(when))
        .unwrap();
}

/// A cache tree with files spread across a few days.
fn populate(root: &Path) -> Vec<(PathBuf, Duration)> {
    let layout = [
        ("ac/0a/entry-1", 100, 90 * HOUR),
        ("ac/0b/entry-2", 200, 60 * HOUR),
        ("cas/1c/blob-3", 400, 40 * HOUR),
        ("cas/1d/blob-4", 800, 20 * HOUR),
        ("cas/1e/blob-5", 1600, 6 * HOUR),
        ("cas/1f/blob-6", 3200, HOUR),
    ];
    layout
        .iter()
        .map(|(rel, size, age)| {
            let path = root.join(rel);
            write_aged(&path, *size, *age);
            (path, *age)
        })
        .collect()
}

fn paths(plan: &janitor_evict::RemovalPlan<'_>) -> HashSet<PathBuf> {
    plan.paths().map(Path::to_path_buf).collect()
}

// =============================================================================
// Filter properties
// =============================================================================

#[test]
fn test_larger_window_never_selects_more() {
    let temp_dir = TempDir::new().unwrap();
    populate(temp_dir.path());
    let result = scan(temp_dir.path(), AgeMetric::Modified).unwrap();

    let windows: Vec<Duration> = (0..=100).map(|h| h * HOUR).collect();
    for pair in windows.windows(2) {
        let (smaller, larger) = (pair[0], pair[1]);
        let narrow = paths(&result.filter(larger));
        let wide = paths(&result.filter(smaller));
        assert!(narrow.is_subset(&wide), "filter({larger:?}) must be within filter({smaller:?})");
    }
}

#[test]
fn test_filter_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    populate(temp_dir.path());
    let result = scan(temp_dir.path(), AgeMetric::Access).unwrap();

    let first = result.filter(30 * HOUR);
    let _unrelated = result.filter(5 * HOUR);
    let second = result.filter(30 * HOUR);
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
    assert_eq!(first.total_bytes(), 700);
}

#[test]
fn test_plan_bytes_never_exceed_scan_total() {
    let temp_dir = TempDir::new().unwrap();
    populate(temp_dir.path());
    let result = scan(temp_dir.path(), AgeMetric::Modified).unwrap();

    assert_eq!(result.total_bytes(), 6300);
    for hours in 0..100 {
        assert!(result.filter(hours * HOUR).total_bytes() <= result.total_bytes());
    }
}

// =============================================================================
// Scan -> search -> remove
// =============================================================================

#[test]
fn test_auto_flow_removes_oldest_files_first() {
    let temp_dir = TempDir::new().unwrap();
    let files = populate(temp_dir.path());
    let result = scan(temp_dir.path(), AgeMetric::Modified).unwrap();

    // 10_000 bytes total, 9_000 used; 87.5% needs at least 250 bytes freed.
    let disk = DiskSnapshot::new(10_000, 9_000);
    let search =
        search_threshold(&result, disk, 87.5, &SearchPolicy::default(), &mut NullReporter).unwrap();
    assert_eq!(search.status, SearchStatus::Satisfied);
    // At 48h entry-1 and entry-2 (300 bytes) already qualify.
    assert_eq!(search.plan.max_age(), 48 * HOUR);
    assert_eq!(search.trials.len(), 1);

    let outcome = remove(&search.plan, false, &mut NullReporter);
    assert_eq!(outcome.removed, 2);
    assert!(outcome.failed.is_empty());

    for (path, age) in files {
        assert_eq!(path.exists(), age < 48 * HOUR, "{}", path.display());
    }
}

#[test]
fn test_dry_run_flow_keeps_everything() {
    let temp_dir = TempDir::new().unwrap();
    let files = populate(temp_dir.path());
    let result = scan(temp_dir.path(), AgeMetric::Modified).unwrap();

    let plan = result.filter(Duration::ZERO);
    assert_eq!(plan.len(), 6);
    let outcome = remove(&plan, true, &mut NullReporter);
    assert_eq!(outcome.attempted, 0);
    assert!(files.iter().all(|(path, _)| path.exists()));
}

#[test]
fn test_overlapping_run_already_removed_files() {
    let temp_dir = TempDir::new().unwrap();
    populate(temp_dir.path());
    let first = scan(temp_dir.path(), AgeMetric::Modified).unwrap();
    let second = scan(temp_dir.path(), AgeMetric::Modified).unwrap();

    let outcome = remove(&first.filter(10 * HOUR), false, &mut NullReporter);
    assert_eq!(outcome.removed, 4);

    // The second run's plan points at files the first run deleted.
    let late = remove(&second.filter(10 * HOUR), false, &mut NullReporter);
    assert_eq!(late.attempted, 4);
    assert_eq!(late.removed, 0);
    assert_eq!(late.failed.len(), 4);
}

#[test]
fn test_trials_reach_reporter_in_window_order() {
    struct Windows(Vec<Duration>);
    impl Reporter for Windows {
        fn trial(&mut self, trial: &WindowTrial) {
            self.0.push(trial.window);
        }
    }

    let temp_dir = TempDir::new().unwrap();
    populate(temp_dir.path());
    let result = scan(temp_dir.path(), AgeMetric::Modified).unwrap();
    let policy = SearchPolicy {
        initial_window: 100 * HOUR,
        step: 10 * HOUR,
    };

    let mut windows = Windows(Vec::new());
    // Need 1_500 bytes freed: first reached at 20h (1_500 bytes).
    let search =
        search_threshold(&result, DiskSnapshot::new(10_000, 9_000), 75.0, &policy, &mut windows)
            .unwrap();
    assert_eq!(search.plan.max_age(), 20 * HOUR);
    assert!(windows.0.windows(2).all(|w| w[0] > w[1]));
    assert_eq!(windows.0.first(), Some(&(100 * HOUR)));
    assert_eq!(windows.0.last(), Some(&(20 * HOUR)));
}
