//! Prune command: scan, pick a plan, remove, summarize.

use std::path::PathBuf;
use std::time::Duration;

use janitor_evict::{
    remove, scan, search_threshold, AgeMetric, EvictError, Reporter, ScanResult, SearchPolicy,
    SearchStatus,
};
use log::{info, warn};

use crate::disk::DiskProbe;
use crate::error::{JanitorError, JanitorResult};
use crate::logging::{human_bytes, humanize_window};
use crate::summary::{ExitCode, PruneSummary, StrategyKind};

/// How the removal window is chosen
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strategy {
    /// Search for the window reaching `target_percent` utilization
    Auto { target_percent: f64 },
    /// Remove everything older than `window`
    Manual { window: Duration },
}

impl Strategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Auto { .. } => StrategyKind::Auto,
            Strategy::Manual { .. } => StrategyKind::Manual,
        }
    }
}

/// Everything a prune run needs
#[derive(Debug, Clone)]
pub struct PruneRequest {
    pub root: PathBuf,
    pub metric: AgeMetric,
    pub strategy: Strategy,
    pub dry_run: bool,
    /// Tolerate deletion failures from overlapping runs
    pub cooperative: bool,
    pub policy: SearchPolicy,
}

/// Result of a prune run
#[derive(Debug, Clone)]
pub struct PruneReport {
    pub summary: PruneSummary,
    pub exit_code: ExitCode,
}

/// Run one prune.
///
/// Unreachable targets come back as a report with status `unreachable` so
/// the caller can still print the statistics; every other engine error is
/// returned as-is.
pub fn run_prune(
    request: &PruneRequest,
    probe: &dyn DiskProbe,
    reporter: &mut dyn Reporter,
    run_id: &str,
    config_digest: Option<&str>,
) -> JanitorResult<PruneReport> {
    info!("Age strategy:   {}", request.metric);
    match request.strategy {
        Strategy::Auto { target_percent } => info!("Target usage:   {}%", target_percent),
        Strategy::Manual { window } => info!("Time delta max: {}", humanize_window(window)),
    }
    if request.dry_run {
        info!("NOTE: dry run, (no files will be removed).");
    }

    let scan = scan(&request.root, request.metric)?;
    let mut summary = PruneSummary::from_scan(run_id, &scan, request.strategy.kind(), request.dry_run)
        .with_config_digest(config_digest);

    let plan = match request.strategy {
        Strategy::Manual { window } => {
            let plan = scan.filter(window);
            summary.record_plan(&plan);
            log_statistics(&scan);
            log_selection(plan.len(), plan.total_bytes());
            plan
        }
        Strategy::Auto { target_percent } => {
            let usage = probe
                .usage(&request.root)
                .map_err(|source| JanitorError::DiskUsage {
                    path: request.root.clone(),
                    source,
                })?;
            if usage.total == 0 {
                return Err(JanitorError::ZeroCapacity {
                    what: "cache_dir",
                    path: request.root.clone(),
                });
            }

            log_statistics(&scan);
            info!("Scanning for window to achieve <= {}% utilization:", target_percent);

            match search_threshold(&scan, usage.snapshot(), target_percent, &request.policy, reporter) {
                Ok(search) => {
                    summary.record_search(&search, target_percent);
                    match search.status {
                        SearchStatus::UnderTarget => {
                            info!(
                                "Disk usage for {} is currently at {:.2}%, which is beneath the \
                                 requested threshold of {}%.",
                                request.root.display(),
                                search.current_percent,
                                target_percent
                            );
                            info!("No files to remove.");
                        }
                        SearchStatus::Satisfied | SearchStatus::Exhausted => {
                            info!("DONE: {}", humanize_window(search.plan.max_age()));
                        }
                    }
                    search.plan
                }
                Err(err @ EvictError::UnreachableTarget { .. }) => {
                    warn!("{}", err);
                    let best = usage.snapshot().percent_after_freeing(scan.total_bytes());
                    summary.record_unreachable(target_percent, usage.percent_used(), best);
                    return Ok(PruneReport {
                        exit_code: summary.status.exit_code(request.cooperative),
                        summary,
                    });
                }
                Err(e) => return Err(e.into()),
            }
        }
    };

    if !plan.is_empty() && !request.dry_run {
        let outcome = remove(&plan, false, reporter);
        info!("DONE.");
        summary.record_outcome(&outcome);

        if outcome.is_partial_failure() {
            if request.cooperative {
                info!(
                    "{} file(s) could not be removed, tolerated in cooperative mode.",
                    outcome.failed.len()
                );
            } else {
                warn!("Errors found deleting files:");
                for failed in &outcome.failed {
                    warn!("- {}: {}", failed.path.display(), failed.error);
                }
            }
        }
    }

    let exit_code = summary.status.exit_code(request.cooperative);
    Ok(PruneReport { summary, exit_code })
}

fn log_invalid_files(scan: &ScanResult) {
    if scan.invalid().is_empty() {
        return;
    }
    info!("--- INVALID FILES:");
    for record in scan.invalid() {
        info!("INVALID: {}: {}", record.path.display(), record.error);
    }
    info!("--- END INVALID FILES ({} total)", scan.invalid().len());
}

fn log_found(scan: &ScanResult) {
    info!("Found: {} total files.", scan.files_scanned());
    info!("       {} total data.", human_bytes(scan.total_bytes()));
    if scan.skipped_recent() > 0 {
        info!("       {} file(s) newer than the scan start ignored.", scan.skipped_recent());
    }
}

fn log_selection(files: usize, bytes: u64) {
    info!("Found: {} file(s) to remove.", files);
    info!("       {} disk space eligible for removal.", human_bytes(bytes));
}

/// Invalid files first, the numbers operators look for last.
fn log_statistics(scan: &ScanResult) {
    log_invalid_files(scan);
    info!("==> {}", scan.root().display());
    log_found(scan);
}
