//! Auto-threshold search
//!
//! The operator asks for a utilization target, not an age window, and we know
//! nothing about the age distribution up front. So the search walks the window
//! down from a generous default in fixed steps, simulating each removal with
//! [`ScanResult::filter`], and commits to the first window whose simulated
//! utilization is at or below the target.
//!
//! If the window runs out before the target is met, the smallest window tried
//! is committed anyway and a warning is reported. Freeing what we can beats
//! leaving the volume full; alerting on the remaining usage is the disk usage
//! monitor's job.

use std::time::Duration;

use crate::error::{EvictError, EvictResult};
use crate::plan::RemovalPlan;
use crate::report::Reporter;
use crate::scan::ScanResult;

/// Default first window tried: 2 days.
pub const DEFAULT_INITIAL_WINDOW: Duration = Duration::from_secs(2 * 24 * 60 * 60);

/// Default decrement between windows: 15 minutes.
pub const DEFAULT_STEP: Duration = Duration::from_secs(15 * 60);

/// Utilization counters for the volume holding the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskSnapshot {
    pub total: u64,
    pub used: u64,
}

impl DiskSnapshot {
    pub fn new(total: u64, used: u64) -> Self {
        Self { total, used }
    }

    pub fn percent_used(&self) -> f64 {
        percent_of(self.used, self.total)
    }

    /// Utilization if `bytes` were freed.
    pub fn percent_after_freeing(&self, bytes: u64) -> f64 {
        percent_of(self.used.saturating_sub(bytes), self.total)
    }
}

/// `used / total` as a percentage. Zero when `total` is zero.
pub fn percent_of(used: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    used as f64 / total as f64 * 100.0
}

/// Shape of the window search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchPolicy {
    /// First (largest) window tried
    pub initial_window: Duration,
    /// Amount the window shrinks per iteration
    pub step: Duration,
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            initial_window: DEFAULT_INITIAL_WINDOW,
            step: DEFAULT_STEP,
        }
    }
}

impl SearchPolicy {
    pub fn validate(&self) -> EvictResult<()> {
        if self.initial_window.is_zero() || self.step.is_zero() {
            return Err(EvictError::InvalidWindow {
                initial: self.initial_window,
                step: self.step,
            });
        }
        Ok(())
    }
}

/// One evaluated window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowTrial {
    pub window: Duration,
    pub files: usize,
    pub bytes: u64,
    /// Utilization if this window's files were removed
    pub simulated_percent: f64,
}

/// How the search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// Already at or below target; nothing to remove.
    UnderTarget,
    /// Stopped at the first window meeting the target.
    Satisfied,
    /// Ran out of window without meeting the target; committed the last one.
    Exhausted,
}

/// The committed plan plus how the search got there.
#[derive(Debug, Clone)]
pub struct ThresholdSearch<'a> {
    pub status: SearchStatus,
    /// Utilization before any removal
    pub current_percent: f64,
    pub plan: RemovalPlan<'a>,
    /// Every window tried, largest first
    pub trials: Vec<WindowTrial>,
}

impl ThresholdSearch<'_> {
    /// Simulated utilization of the committed plan.
    pub fn achieved_percent(&self) -> f64 {
        self.trials
            .last()
            .map(|t| t.simulated_percent)
            .unwrap_or(self.current_percent)
    }
}

/// Find the largest window whose removal brings `disk` to `target_percent`.
///
/// Fails without a plan when the disk reports zero capacity, the target is
/// outside (0, 100), the policy is degenerate, or removing every scanned file
/// still would not reach the target.
pub fn search_threshold<'a>(
    scan: &'a ScanResult,
    disk: DiskSnapshot,
    target_percent: f64,
    policy: &SearchPolicy,
    reporter: &mut dyn Reporter,
) -> EvictResult<ThresholdSearch<'a>> {
    if disk.total == 0 {
        return Err(EvictError::ZeroCapacity);
    }
    if !(target_percent > 0.0 && target_percent < 100.0) {
        return Err(EvictError::InvalidTarget(target_percent));
    }
    policy.validate()?;

    let current_percent = disk.percent_used();
    if current_percent <= target_percent {
        return Ok(ThresholdSearch {
            status: SearchStatus::UnderTarget,
            current_percent,
            plan: RemovalPlan::empty(),
            trials: Vec::new(),
        });
    }

    let best = disk.percent_after_freeing(scan.total_bytes());
    if best > target_percent {
        return Err(EvictError::UnreachableTarget {
            target: target_percent,
            best,
            used: disk.used,
            total: disk.total,
            eligible: scan.total_bytes(),
        });
    }

    let mut trials = Vec::new();
    let mut plan = RemovalPlan::empty();
    let mut status = SearchStatus::Exhausted;
    let mut window = policy.initial_window;

    while !window.is_zero() {
        plan = scan.filter(window);
        let trial = WindowTrial {
            window,
            files: plan.len(),
            bytes: plan.total_bytes(),
            simulated_percent: disk.percent_after_freeing(plan.total_bytes()),
        };
        reporter.trial(&trial);
        trials.push(trial);

        if trial.simulated_percent <= target_percent {
            status = SearchStatus::Satisfied;
            break;
        }
        window = window.saturating_sub(policy.step);
    }

    if status == SearchStatus::Exhausted {
        let achieved = trials
            .last()
            .map(|t| t.simulated_percent)
            .unwrap_or(current_percent);
        reporter.warning(&format!(
            "window exhausted at {:?} without reaching {}% (would achieve {:.2}%), \
             removing the smallest window's files anyway",
            plan.max_age(),
            target_percent,
            achieved
        ));
    }

    Ok(ThresholdSearch {
        status,
        current_percent,
        plan,
        trials,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{AgeMetric, FileRecord};
    use crate::report::NullReporter;
    use std::path::PathBuf;
    use std::time::SystemTime;

    const GB: u64 = 1_000_000_000;
    const HOUR: Duration = Duration::from_secs(60 * 60);
    const MINUTE: Duration = Duration::from_secs(60);

    #[derive(Default)]
    struct Recording {
        trials: Vec<WindowTrial>,
        warnings: Vec<String>,
    }

    impl Reporter for Recording {
        fn trial(&mut self, trial: &WindowTrial) {
            self.trials.push(*trial);
        }

        fn warning(&mut self, message: &str) {
            self.warnings.push(message.to_string());
        }
    }

    fn inventory(files: &[(&str, u64, Duration)]) -> ScanResult {
        let start = SystemTime::now();
        let records = files
            .iter()
            .map(|(name, size, age)| FileRecord {
                path: PathBuf::from(name),
                size_bytes: *size,
                timestamp: start - *age,
            })
            .collect();
        ScanResult::from_records("/cache", AgeMetric::Access, start, records, Vec::new())
    }

    #[test]
    fn test_policy_default() {
        let policy = SearchPolicy::default();
        assert_eq!(policy.initial_window, 48 * HOUR);
        assert_eq!(policy.step, 15 * MINUTE);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_policy_rejects_zero_step() {
        let policy = SearchPolicy {
            initial_window: HOUR,
            step: Duration::ZERO,
        };
        assert!(matches!(policy.validate(), Err(EvictError::InvalidWindow { .. })));
    }

    #[test]
    fn test_percent_of_zero_total() {
        assert_eq!(percent_of(10, 0), 0.0);
        assert_eq!(percent_of(25, 100), 25.0);
    }

    #[test]
    fn test_under_target_returns_empty_plan() {
        let scan = inventory(&[("a", 10 * GB, 72 * HOUR)]);
        let mut reporter = Recording::default();
        let search = search_threshold(
            &scan,
            DiskSnapshot::new(100 * GB, 60 * GB),
            70.0,
            &SearchPolicy::default(),
            &mut reporter,
        )
        .unwrap();

        assert_eq!(search.status, SearchStatus::UnderTarget);
        assert!(search.plan.is_empty());
        assert!(search.trials.is_empty());
        assert!(reporter.trials.is_empty());
    }

    #[test]
    fn test_unreachable_target_reports_best_percent() {
        let scan = inventory(&[("a", 2 * GB, 72 * HOUR)]);
        let err = search_threshold(
            &scan,
            DiskSnapshot::new(100 * GB, 95 * GB),
            50.0,
            &SearchPolicy::default(),
            &mut NullReporter,
        )
        .unwrap_err();

        match err {
            EvictError::UnreachableTarget { best, target, .. } => {
                assert!((best - 93.0).abs() < 1e-9);
                assert_eq!(target, 50.0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_commits_largest_satisfying_window() {
        // 80 of 100 GB used, 50 GB eligible, target 70%.
        let scan = inventory(&[
            ("oldest", 5 * GB, 72 * HOUR),
            ("middle", 10 * GB, 30 * HOUR),
            ("newest", 35 * GB, HOUR),
        ]);
        let mut reporter = Recording::default();
        let search = search_threshold(
            &scan,
            DiskSnapshot::new(100 * GB, 80 * GB),
            70.0,
            &SearchPolicy::default(),
            &mut reporter,
        )
        .unwrap();

        assert_eq!(search.status, SearchStatus::Satisfied);
        assert_eq!(search.plan.max_age(), 30 * HOUR);
        assert_eq!(search.plan.len(), 2);
        assert_eq!(search.plan.total_bytes(), 15 * GB);
        assert!((search.achieved_percent() - 65.0).abs() < 1e-9);

        // 48h down to 30h in 15 minute steps.
        assert_eq!(search.trials.len(), 73);
        assert_eq!(search.trials[0].window, 48 * HOUR);
        let (last, earlier) = search.trials.split_last().unwrap();
        assert!(last.simulated_percent <= 70.0);
        assert!(earlier.iter().all(|t| t.simulated_percent > 70.0));
        assert_eq!(reporter.trials, search.trials);
        assert!(reporter.warnings.is_empty());
    }

    #[test]
    fn test_exhausted_window_commits_anyway_with_warning() {
        // Only a five minute old file could satisfy the target, but the
        // smallest window tried is one step (15 minutes).
        let scan = inventory(&[("old", GB, 72 * HOUR), ("fresh", 50 * GB, 5 * MINUTE)]);
        let mut reporter = Recording::default();
        let search = search_threshold(
            &scan,
            DiskSnapshot::new(100 * GB, 80 * GB),
            70.0,
            &SearchPolicy::default(),
            &mut reporter,
        )
        .unwrap();

        assert_eq!(search.status, SearchStatus::Exhausted);
        assert_eq!(search.plan.max_age(), 15 * MINUTE);
        assert_eq!(search.plan.len(), 1);
        assert_eq!(search.trials.len(), 192);
        assert_eq!(reporter.warnings.len(), 1);
        assert!(search.achieved_percent() > 70.0);
    }

    #[test]
    fn test_search_is_deterministic() {
        let scan = inventory(&[
            ("a", 3 * GB, 40 * HOUR),
            ("b", 4 * GB, 20 * HOUR),
            ("c", 9 * GB, 10 * HOUR),
        ]);
        let disk = DiskSnapshot::new(100 * GB, 90 * GB);
        let policy = SearchPolicy::default();
        let first = search_threshold(&scan, disk, 80.0, &policy, &mut NullReporter).unwrap();
        let second = search_threshold(&scan, disk, 80.0, &policy, &mut NullReporter).unwrap();
        assert_eq!(first.plan, second.plan);
        assert_eq!(first.trials, second.trials);
    }

    #[test]
    fn test_rejects_zero_capacity_and_bad_target() {
        let scan = inventory(&[]);
        let policy = SearchPolicy::default();
        assert!(matches!(
            search_threshold(&scan, DiskSnapshot::new(0, 0), 70.0, &policy, &mut NullReporter),
            Err(EvictError::ZeroCapacity)
        ));
        for target in [0.0, 100.0, -5.0, f64::NAN] {
            assert!(matches!(
                search_threshold(&scan, DiskSnapshot::new(10, 9), target, &policy, &mut NullReporter),
                Err(EvictError::InvalidTarget(_))
            ));
        }
    }
}
