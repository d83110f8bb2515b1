//! Built-in defaults (layer 1)
//!
//! These match what the cron jobs on the cache servers have always run with.

/// Built-in default configuration values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuiltinDefaults;

impl BuiltinDefaults {
    /// Auto mode target utilization (70% used, 30% free)
    pub const AUTO_THRESHOLD: f64 = 70.0;

    /// Disk usage alert threshold
    pub const ALERT_THRESHOLD: f64 = 85.0;

    /// First window tried by the auto search, in hours (2 days)
    pub const INITIAL_WINDOW_HOURS: f64 = 48.0;

    /// Auto search step, in minutes
    pub const STEP_MINUTES: f64 = 15.0;

    /// Manual mode `--days` default; hours and minutes default to zero
    pub const MANUAL_DAYS: f64 = 2.0;

    /// Inclusive bounds accepted for the auto threshold
    pub const AUTO_THRESHOLD_RANGE: (f64, f64) = (1.0, 99.0);
}
