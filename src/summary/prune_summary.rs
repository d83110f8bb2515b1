//! Prune summary (`--json` output)

use chrono::{DateTime, Utc};
use janitor_evict::{
    AgeMetric, FailedRemoval, InvalidRecord, RemovalOutcome, RemovalPlan, ScanResult,
    ThresholdSearch, WindowTrial,
};
use serde::{Deserialize, Serialize};

use super::failure::Status;

/// Schema version for the prune summary
pub const PRUNE_SUMMARY_SCHEMA_VERSION: u32 = 1;

/// Schema identifier for the prune summary
pub const PRUNE_SUMMARY_SCHEMA_ID: &str = "cache-janitor/prune_summary@1";

/// Which removal strategy a run used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Auto,
    Manual,
}

/// A path with an error message (invalid file or failed removal)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathError {
    pub path: String,
    pub error: String,
}

impl From<&InvalidRecord> for PathError {
    fn from(record: &InvalidRecord) -> Self {
        Self {
            path: record.path.display().to_string(),
            error: record.error.clone(),
        }
    }
}

impl From<&FailedRemoval> for PathError {
    fn from(failed: &FailedRemoval) -> Self {
        Self {
            path: failed.path.display().to_string(),
            error: failed.error.clone(),
        }
    }
}

/// One window tried by the auto search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub window_seconds: u64,
    pub files: usize,
    pub bytes: u64,
    pub simulated_percent: f64,
}

impl From<&WindowTrial> for TrialRecord {
    fn from(trial: &WindowTrial) -> Self {
        Self {
            window_seconds: trial.window.as_secs(),
            files: trial.files,
            bytes: trial.bytes,
            simulated_percent: trial.simulated_percent,
        }
    }
}

/// Structured record of one prune run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PruneSummary {
    pub schema_version: u32,
    pub schema_id: String,
    pub run_id: String,
    pub created_at: DateTime<Utc>,

    pub root: String,
    pub metric: AgeMetric,
    pub strategy: StrategyKind,
    pub dry_run: bool,

    /// Every non-directory entry examined
    pub files_scanned: usize,
    /// Bytes held by eligible files
    pub bytes_found: u64,
    /// Files ignored because they were touched during the scan
    pub skipped_recent: usize,
    pub files_selected: usize,
    pub bytes_selected: u64,
    /// Window of the committed plan
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_seconds: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_percent: Option<f64>,
    /// Simulated utilization after the committed plan (auto mode)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub achieved_percent: Option<f64>,
    /// Best achievable utilization (unreachable targets only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_percent: Option<f64>,

    pub invalid_files: Vec<PathError>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trials: Vec<TrialRecord>,

    pub status: Status,
    pub removed: usize,
    pub bytes_removed: u64,
    pub failures: Vec<PathError>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_digest: Option<String>,
}

impl PruneSummary {
    /// Start a summary from a finished scan. Status starts as `no_op`
    /// until a plan is attached.
    pub fn from_scan(
        run_id: impl Into<String>,
        scan: &ScanResult,
        strategy: StrategyKind,
        dry_run: bool,
    ) -> Self {
        Self {
            schema_version: PRUNE_SUMMARY_SCHEMA_VERSION,
            schema_id: PRUNE_SUMMARY_SCHEMA_ID.to_string(),
            run_id: run_id.into(),
            created_at: Utc::now(),
            root: scan.root().display().to_string(),
            metric: scan.metric(),
            strategy,
            dry_run,
            files_scanned: scan.files_scanned(),
            bytes_found: scan.total_bytes(),
            skipped_recent: scan.skipped_recent(),
            files_selected: 0,
            bytes_selected: 0,
            window_seconds: None,
            target_percent: None,
            current_percent: None,
            achieved_percent: None,
            best_percent: None,
            invalid_files: scan.invalid().iter().map(PathError::from).collect(),
            trials: Vec::new(),
            status: Status::NoOp,
            removed: 0,
            bytes_removed: 0,
            failures: Vec::new(),
            config_digest: None,
        }
    }

    pub fn with_config_digest(mut self, digest: Option<&str>) -> Self {
        self.config_digest = digest.map(str::to_string);
        self
    }

    /// Record the committed plan.
    pub fn record_plan(&mut self, plan: &RemovalPlan<'_>) {
        self.files_selected = plan.len();
        self.bytes_selected = plan.total_bytes();
        self.window_seconds = Some(plan.max_age().as_secs());
        self.status = Status::Success;
    }

    /// Record an auto search, including its committed plan.
    pub fn record_search(&mut self, search: &ThresholdSearch<'_>, target_percent: f64) {
        self.target_percent = Some(target_percent);
        self.current_percent = Some(search.current_percent);
        self.trials = search.trials.iter().map(TrialRecord::from).collect();
        if search.trials.is_empty() {
            self.status = Status::NoOp;
        } else {
            self.record_plan(&search.plan);
            self.achieved_percent = Some(search.achieved_percent());
        }
    }

    /// Record a target that cannot be reached.
    pub fn record_unreachable(&mut self, target_percent: f64, current: f64, best: f64) {
        self.target_percent = Some(target_percent);
        self.current_percent = Some(current);
        self.best_percent = Some(best);
        self.status = Status::Unreachable;
    }

    /// Record what the remover did.
    pub fn record_outcome(&mut self, outcome: &RemovalOutcome) {
        self.removed = outcome.removed;
        self.bytes_removed = outcome.bytes_removed;
        self.failures = outcome.failed.iter().map(PathError::from).collect();
        if outcome.is_partial_failure() {
            self.status = Status::PartialFailure;
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
