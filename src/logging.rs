//! Logging setup and the engine's log-backed reporter.
//!
//! Output goes to stdout because cron redirects it into a logfile, unless
//! stdout is reserved for `--json`. Every line carries a timestamp and a short
//! run id so overlapping runs can be told apart in the same file.

use std::io::Write;

use bytesize::ByteSize;
use chrono::Local;
use janitor_evict::{Reporter, WindowTrial};
use log::{info, warn, LevelFilter};

/// Install the global logger. Later calls are ignored.
pub fn init(verbose: bool, run_id: &str, to_stderr: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let tag = short_run_id(run_id).to_string();
    let target = if to_stderr {
        env_logger::Target::Stderr
    } else {
        env_logger::Target::Stdout
    };

    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .target(target)
        .format(move |buf, record| {
            writeln!(
                buf,
                "{} :: [{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                tag,
                record.args()
            )
        })
        .try_init();
}

/// Last eight characters of a ULID: the random part, enough to disambiguate.
pub fn short_run_id(run_id: &str) -> &str {
    let start = run_id.len().saturating_sub(8);
    run_id.get(start..).unwrap_or(run_id)
}

/// Log every line of `message` on its own so each gets a timestamp.
pub fn log_block(message: &str) {
    for line in message.lines() {
        info!("{}", line);
    }
}

/// Separator between runs in a shared logfile.
pub fn log_separator() {
    info!("{}", "=".repeat(80));
}

/// Human readable size in binary units (KiB, MiB, GiB).
pub fn human_bytes(bytes: u64) -> String {
    ByteSize(bytes).to_string_as(true)
}

/// Forwards engine reports to the `log` facade.
#[derive(Debug, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn trial(&mut self, trial: &WindowTrial) {
        info!("{}:", humanize_window(trial.window));
        info!("Found: {} file(s) to remove.", trial.files);
        info!("       {} disk space eligible for removal.", human_bytes(trial.bytes));
        info!("==> would achieve {:.2}%", trial.simulated_percent);
    }

    fn progress(&mut self, index: usize, total: usize) {
        let width = total.to_string().len();
        info!("Removing file [{:>width$} / {}] ...", index + 1, total, width = width);
    }

    fn warning(&mut self, message: &str) {
        warn!("{}", message);
    }
}

/// Render a window as `Nd HH:MM:SS`.
pub fn humanize_window(window: std::time::Duration) -> String {
    let total = window.as_secs();
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;
    if days > 0 {
        format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}
