//! Top-level error type and its exit status.

use std::path::PathBuf;

use janitor_evict::{ErrorKind, EvictError};
use thiserror::Error;

use crate::config::ConfigError;
use crate::summary::ExitCode;

pub type JanitorResult<T> = Result<T, JanitorError>;

#[derive(Debug, Error)]
pub enum JanitorError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Evict(#[from] EvictError),

    #[error("error collecting disk usage on '{}': {source}", path.display())]
    DiskUsage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("the provided {what}='{}' has zero total size", path.display())]
    ZeroCapacity { what: &'static str, path: PathBuf },

    #[error("this command must be run as root")]
    NotRoot,

    #[error("failed to serialize summary: {0}")]
    Summary(#[from] serde_json::Error),
}

impl JanitorError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            JanitorError::Config(_) | JanitorError::NotRoot => ExitCode::Config,
            JanitorError::Evict(e) => match e.kind() {
                ErrorKind::Config => ExitCode::Config,
                ErrorKind::Fatal => ExitCode::Fatal,
            },
            JanitorError::DiskUsage { .. } | JanitorError::ZeroCapacity { .. } => ExitCode::Fatal,
            JanitorError::Summary(_) => ExitCode::Failure,
        }
    }
}
