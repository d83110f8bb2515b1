//! Cache Janitor - age-based cache directory pruning
//!
//! Removes files from a shared cache directory (build caches, CI scratch)
//! once they are older than a window. The window is either given directly or
//! searched for so the volume ends up at or below a target utilization.
//! The eviction engine lives in the `janitor-evict` crate; this crate adds
//! configuration, disk probing, logging, run summaries and the CLI.

pub mod config;
pub mod disk;
pub mod disk_report;
pub mod error;
pub mod logging;
pub mod privilege;
pub mod prune;
pub mod summary;

pub use config::{ConfigError, JanitorConfig};
pub use disk::{DiskProbe, DiskUsage, FixedProbe, StatvfsProbe};
pub use disk_report::{run_disk_usage, DiskReport};
pub use error::{JanitorError, JanitorResult};
pub use prune::{run_prune, PruneReport, PruneRequest, Strategy};
pub use summary::{ExitCode, PruneSummary, Status};
