//! Cache directory eviction engine
//!
//! Scans a cache directory once, classifies every regular file by age, and
//! removes old files either with a fixed age window (manual mode) or with the
//! window found by [`search_threshold`] to bring the volume under a target
//! utilization (auto mode).
//!
//! ## Flow
//!
//! 1. [`scan`] walks the tree and snapshots the start time.
//! 2. [`ScanResult::filter`] answers "what would a window of N remove?" as
//!    many times as needed, without touching the filesystem.
//! 3. [`search_threshold`] drives `filter` from the largest window down.
//! 4. [`remove`] deletes the committed [`RemovalPlan`].
//!
//! The engine never logs. Everything observable during a run goes through the
//! [`Reporter`] passed in by the caller.

mod error;
mod plan;
mod record;
mod remove;
mod report;
mod scan;
mod search;

pub use error::{ErrorKind, EvictError, EvictResult};
pub use plan::RemovalPlan;
pub use record::{AgeMetric, FileRecord, InvalidRecord};
pub use remove::{remove, FailedRemoval, RemovalOutcome};
pub use report::{NullReporter, Reporter};
pub use scan::{scan, ScanResult};
pub use search::{
    percent_of, search_threshold, DiskSnapshot, SearchPolicy, SearchStatus, ThresholdSearch,
    WindowTrial,
};
