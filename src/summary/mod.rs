//! Run summaries and exit status
//!
//! Every prune run ends in a [`PruneSummary`] (printed with `--json`) and a
//! stable [`ExitCode`].

mod failure;
mod prune_summary;

pub use failure::{ExitCode, Status};
pub use prune_summary::{
    PathError, PruneSummary, StrategyKind, TrialRecord, PRUNE_SUMMARY_SCHEMA_ID,
    PRUNE_SUMMARY_SCHEMA_VERSION,
};
