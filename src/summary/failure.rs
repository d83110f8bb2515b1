//! Run status and stable exit codes

use serde::{Deserialize, Serialize};

/// Final outcome of a prune run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Plan executed (or dry-run reported) without deletion failures
    Success,
    /// Already under the target utilization; nothing selected
    NoOp,
    /// Target cannot be reached even by removing every scanned file
    Unreachable,
    /// Some deletions failed
    PartialFailure,
}

impl Status {
    /// Exit code for this status. `cooperative` runs tolerate deletion
    /// failures since an overlapping run may already have removed the files.
    pub fn exit_code(&self, cooperative: bool) -> ExitCode {
        match self {
            Status::Success | Status::NoOp => ExitCode::Success,
            Status::Unreachable => ExitCode::Config,
            Status::PartialFailure if cooperative => ExitCode::Success,
            Status::PartialFailure => ExitCode::Failure,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::NoOp => "no_op",
            Status::Unreachable => "unreachable",
            Status::PartialFailure => "partial_failure",
        }
    }
}

/// Stable process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum ExitCode {
    /// Success or nothing to do
    #[default]
    Success = 0,
    /// Deletion failures, or disk usage over the alert threshold
    Failure = 1,
    /// Bad input: arguments, config file, unreachable target
    Config = 2,
    /// The environment could not be read (root, disk counters)
    Fatal = 3,
}

impl ExitCode {
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExitCode::Success)
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code.as_u8())
    }
}
