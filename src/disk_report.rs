//! `disk-usage` command: report a mount's utilization and alert past a threshold.

use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Serialize;

use crate::config::{validate_alert_threshold, ConfigError};
use crate::disk::{DiskProbe, DiskUsage};
use crate::error::{JanitorError, JanitorResult};
use crate::logging::log_block;
use crate::summary::ExitCode;

const GIB: f64 = (1u64 << 30) as f64;

/// Result of one disk usage check
#[derive(Debug, Clone, Serialize)]
pub struct DiskReport {
    pub mount: PathBuf,
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub free_bytes: u64,
    pub percent_used: f64,
    pub threshold: f64,
    pub alert: bool,
}

impl DiskReport {
    pub fn exit_code(&self) -> ExitCode {
        if self.alert {
            ExitCode::Failure
        } else {
            ExitCode::Success
        }
    }
}

/// Check the volume holding `mount` against `threshold` percent.
pub fn run_disk_usage(
    mount: &Path,
    threshold: f64,
    probe: &dyn DiskProbe,
) -> JanitorResult<DiskReport> {
    if !mount.is_dir() {
        return Err(ConfigError::NotADirectory {
            what: "mount_point",
            path: mount.to_path_buf(),
        }
        .into());
    }
    validate_alert_threshold(threshold)?;

    let usage = probe
        .usage(mount)
        .map_err(|source| JanitorError::DiskUsage {
            path: mount.to_path_buf(),
            source,
        })?;
    if usage.total == 0 {
        return Err(JanitorError::ZeroCapacity {
            what: "mount_point",
            path: mount.to_path_buf(),
        });
    }

    let report = build_report(mount, usage, threshold);
    log_report(&report);
    Ok(report)
}

fn build_report(mount: &Path, usage: DiskUsage, threshold: f64) -> DiskReport {
    let percent_used = usage.percent_used();
    DiskReport {
        mount: mount.to_path_buf(),
        total_bytes: usage.total,
        used_bytes: usage.used,
        free_bytes: usage.free,
        percent_used,
        threshold,
        alert: percent_used >= threshold,
    }
}

fn log_report(report: &DiskReport) {
    info!("Mount:  {}", report.mount.display());
    info!("Used:   {:.4} GiB", report.used_bytes as f64 / GIB);
    info!("Free:   {:.4} GiB", report.free_bytes as f64 / GIB);
    info!("Total:  {:.4} GiB", report.total_bytes as f64 / GIB);
    info!("%Used:  {:.2}%", report.percent_used);

    if report.alert {
        warn!("ALERT: disk usage is at or above {}%", report.threshold);
        log_block(&format!(
            "Disk usage for {} is at {:.2}%, which meets or exceeds the\n\
             alert threshold of {}%. Free space on this volume before builds\n\
             and cache writes start failing.",
            report.mount.display(),
            report.percent_used,
            report.threshold
        ));
    }
}
