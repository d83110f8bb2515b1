//! Records captured during a scan.

use std::fmt;
use std::fs::Metadata;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// Which timestamp decides a file's age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeMetric {
    /// Time of last access (`st_atime`)
    #[default]
    Access,
    /// Time of last modification (`st_mtime`)
    Modified,
}

impl AgeMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Modified => "modified",
        }
    }

    /// Read this metric's timestamp from file metadata.
    pub fn timestamp(&self, meta: &Metadata) -> io::Result<SystemTime> {
        match self {
            Self::Access => meta.accessed(),
            Self::Modified => meta.modified(),
        }
    }
}

impl FromStr for AgeMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "access" | "atime" => Ok(Self::Access),
            "modified" | "mtime" => Ok(Self::Modified),
            other => Err(format!("unknown age metric '{}' (expected access or modified)", other)),
        }
    }
}

impl fmt::Display for AgeMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A regular file found under the cache root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: PathBuf,
    pub size_bytes: u64,
    /// Access or modification time, depending on the scan's [`AgeMetric`]
    pub timestamp: SystemTime,
}

/// A file whose metadata could not be read (broken symlink, permissions).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidRecord {
    pub path: PathBuf,
    pub error: String,
}
