//! TOML configuration file (layer 2)
//!
//! ```toml
//! require_root = true
//!
//! [prune]
//! metric = "access"
//! threshold = 70.0
//! cooperative = false
//! initial_window_hours = 48.0
//! step_minutes = 15.0
//! default_days = 2.0
//!
//! [disk_usage]
//! threshold = 85.0
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use janitor_evict::{AgeMetric, SearchPolicy};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::defaults::BuiltinDefaults;
use super::window::{validate_alert_threshold, validate_auto_threshold};

/// Errors from loading or validating configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("the provided {what}='{}' is not a directory", path.display())]
    NotADirectory { what: &'static str, path: PathBuf },
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Where a loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigSource {
    pub path: PathBuf,
    /// SHA-256 of the raw file bytes
    pub digest: String,
}

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JanitorConfig {
    /// Refuse to run unless the effective uid is 0
    #[serde(default)]
    pub require_root: bool,

    #[serde(default)]
    pub prune: PruneConfig,

    #[serde(default)]
    pub disk_usage: DiskUsageConfig,

    /// Set when loaded from a file
    #[serde(skip)]
    pub source: Option<ConfigSource>,
}

/// `[prune]` table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PruneConfig {
    /// Which timestamp decides a file's age
    #[serde(default)]
    pub metric: AgeMetric,

    /// Auto mode target utilization percent
    #[serde(default = "default_auto_threshold")]
    pub threshold: f64,

    /// Tolerate deletion failures (another run may have removed the files)
    #[serde(default)]
    pub cooperative: bool,

    #[serde(default = "default_initial_window_hours")]
    pub initial_window_hours: f64,

    #[serde(default = "default_step_minutes")]
    pub step_minutes: f64,

    /// Manual mode days when `--days` is not given
    #[serde(default = "default_manual_days")]
    pub default_days: f64,
}

/// `[disk_usage]` table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiskUsageConfig {
    /// Alert when usage is at or above this percent
    #[serde(default = "default_alert_threshold")]
    pub threshold: f64,
}

fn default_auto_threshold() -> f64 {
    BuiltinDefaults::AUTO_THRESHOLD
}

fn default_initial_window_hours() -> f64 {
    BuiltinDefaults::INITIAL_WINDOW_HOURS
}

fn default_step_minutes() -> f64 {
    BuiltinDefaults::STEP_MINUTES
}

fn default_manual_days() -> f64 {
    BuiltinDefaults::MANUAL_DAYS
}

fn default_alert_threshold() -> f64 {
    BuiltinDefaults::ALERT_THRESHOLD
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            require_root: false,
            prune: PruneConfig::default(),
            disk_usage: DiskUsageConfig::default(),
            source: None,
        }
    }
}

impl Default for PruneConfig {
    fn default() -> Self {
        Self {
            metric: AgeMetric::default(),
            threshold: default_auto_threshold(),
            cooperative: false,
            initial_window_hours: default_initial_window_hours(),
            step_minutes: default_step_minutes(),
            default_days: default_manual_days(),
        }
    }
}

impl Default for DiskUsageConfig {
    fn default() -> Self {
        Self {
            threshold: default_alert_threshold(),
        }
    }
}

impl JanitorConfig {
    /// Load built-in defaults, overlaid with `path` when given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Load and validate a TOML file, recording its digest.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let bytes = fs::read(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let digest = hex::encode(Sha256::digest(&bytes));
        let contents = String::from_utf8(bytes)
            .map_err(|e| ConfigError::invalid("config", format!("invalid UTF-8: {}", e)))?;

        let mut config = Self::from_toml_str(&contents)?;
        config.source = Some(ConfigSource {
            path: path.to_path_buf(),
            digest,
        });
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_auto_threshold(self.prune.threshold)?;
        validate_alert_threshold(self.disk_usage.threshold)?;
        self.prune.search_policy()?;
        if !(self.prune.default_days >= 0.0) {
            return Err(ConfigError::invalid(
                "prune.default_days",
                "must be greater than or equal to 0",
            ));
        }
        Ok(())
    }

    /// Digest of the file this came from, if any.
    pub fn digest(&self) -> Option<&str> {
        self.source.as_ref().map(|s| s.digest.as_str())
    }
}

impl PruneConfig {
    /// Search policy described by `initial_window_hours` and `step_minutes`.
    pub fn search_policy(&self) -> Result<SearchPolicy, ConfigError> {
        let initial_window = positive_duration(
            "prune.initial_window_hours",
            self.initial_window_hours * 3600.0,
        )?;
        let step = positive_duration("prune.step_minutes", self.step_minutes * 60.0)?;
        Ok(SearchPolicy { initial_window, step })
    }
}

fn positive_duration(field: &str, seconds: f64) -> Result<Duration, ConfigError> {
    match Duration::try_from_secs_f64(seconds) {
        Ok(duration) if !duration.is_zero() => Ok(duration),
        Ok(_) => Err(ConfigError::invalid(field, "must be greater than 0")),
        Err(e) => Err(ConfigError::invalid(field, e.to_string())),
    }
}
