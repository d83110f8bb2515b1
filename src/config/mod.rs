//! Configuration layers
//!
//! Values are resolved in three layers, later ones winning:
//! 1. Built-in defaults
//! 2. Optional TOML file (`--config path`)
//! 3. CLI flags
//!
//! Only the first two live here; `main.rs` applies flags on top of the
//! loaded [`JanitorConfig`].

mod defaults;
mod file;
mod window;

pub use defaults::BuiltinDefaults;
pub use file::{ConfigError, ConfigSource, DiskUsageConfig, JanitorConfig, PruneConfig};
pub use window::{manual_window, validate_auto_threshold, validate_alert_threshold};
