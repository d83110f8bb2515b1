//! Validation of operator-supplied windows and thresholds.

use std::time::Duration;

use super::defaults::BuiltinDefaults;
use super::file::ConfigError;

/// Combine manual mode `--days/--hours/--minutes` into one window.
///
/// Every component must be non-negative; the error names all offenders.
pub fn manual_window(days: f64, hours: f64, minutes: f64) -> Result<Duration, ConfigError> {
    let parts = [("days", days), ("hours", hours), ("minutes", minutes)];
    let bad: Vec<(&str, f64)> = parts
        .into_iter()
        .filter(|(_, value)| !(*value >= 0.0))
        .collect();
    if !bad.is_empty() {
        let plural = if bad.len() > 1 { "s" } else { "" };
        let names: Vec<&str> = bad.iter().map(|(name, _)| *name).collect();
        let pairs: Vec<String> = bad
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        return Err(ConfigError::invalid(
            names.join(", "),
            format!(
                "the following argument{} must be greater than or equal to 0: {}",
                plural,
                pairs.join(", ")
            ),
        ));
    }

    let seconds = days * 86_400.0 + hours * 3_600.0 + minutes * 60.0;
    Duration::try_from_secs_f64(seconds).map_err(|e| ConfigError::invalid("window", e.to_string()))
}

/// Auto mode target must be in [1, 99] inclusive.
pub fn validate_auto_threshold(threshold: f64) -> Result<(), ConfigError> {
    let (low, high) = BuiltinDefaults::AUTO_THRESHOLD_RANGE;
    if !(low..=high).contains(&threshold) {
        return Err(ConfigError::invalid(
            "threshold",
            format!("{}% invalid, must be in [{},{}]", threshold, low, high),
        ));
    }
    Ok(())
}

/// Alert threshold must be in the open range (0, 100).
pub fn validate_alert_threshold(threshold: f64) -> Result<(), ConfigError> {
    if !(threshold > 0.0 && threshold < 100.0) {
        return Err(ConfigError::invalid(
            "threshold",
            format!("{}% invalid, must be in the exclusive range (0, 100)", threshold),
        ));
    }
    Ok(())
}
