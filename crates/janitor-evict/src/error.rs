//! Errors from scanning and threshold search.
//!
//! Per-file problems never show up here: unreadable files land in
//! [`crate::ScanResult::invalid`] and failed deletions in
//! [`crate::RemovalOutcome::failed`].

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result type for engine operations
pub type EvictResult<T> = Result<T, EvictError>;

/// Errors that abort an eviction run before anything is deleted.
#[derive(Debug, Error)]
pub enum EvictError {
    #[error("the provided cache directory '{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("cannot read cache directory '{}': {source}", path.display())]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("the volume holding the cache reports zero total size")]
    ZeroCapacity,

    #[error("threshold {0}% invalid, must be in the open range (0, 100)")]
    InvalidTarget(f64),

    #[error("invalid search window: initial={initial:?} step={step:?}")]
    InvalidWindow { initial: Duration, step: Duration },

    #[error(
        "cannot trim to {target}% usage: {used} / {total} bytes used and only \
         {eligible} bytes eligible for removal, the best achievable is {best:.2}%"
    )]
    UnreachableTarget {
        target: f64,
        best: f64,
        used: u64,
        total: u64,
        eligible: u64,
    },
}

/// Coarse classification used to pick an exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad operator input; rerunning with the same arguments fails the same way.
    Config,
    /// The environment could not be read at all.
    Fatal,
}

impl EvictError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EvictError::NotADirectory(_)
            | EvictError::InvalidTarget(_)
            | EvictError::InvalidWindow { .. }
            | EvictError::UnreachableTarget { .. } => ErrorKind::Config,
            EvictError::RootUnreadable { .. } | EvictError::ZeroCapacity => ErrorKind::Fatal,
        }
    }
}
