//! Cache Janitor CLI
//!
//! Entry point for the `cache-janitor` command-line tool.

use std::path::PathBuf;

use cache_janitor::config::{manual_window, validate_auto_threshold, JanitorConfig};
use cache_janitor::logging::{self, LogReporter};
use cache_janitor::privilege::ensure_root;
use cache_janitor::{
    run_disk_usage, run_prune, ExitCode, JanitorResult, PruneRequest, StatvfsProbe, Strategy,
};
use clap::{Parser, Subcommand};
use janitor_evict::AgeMetric;
use log::error;
use ulid::Ulid;

#[derive(Parser)]
#[command(name = "cache-janitor")]
#[command(about = "Age-based cache directory pruning", version)]
struct Cli {
    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Print a JSON summary to stdout (logs move to stderr)
    #[arg(long, global = true)]
    json: bool,

    /// Refuse to run unless the effective user is root
    #[arg(long, global = true)]
    require_root: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Remove old files from a cache directory
    Prune {
        /// Timestamp used for file age: access or modified
        #[arg(long = "mode", short = 'm')]
        metric: Option<AgeMetric>,

        /// Report what would be removed without removing anything
        #[arg(long = "dry-run", short = 'n', alias = "dry_run")]
        dry_run: bool,

        /// Treat removal failures as files already removed by another run
        #[arg(long)]
        cooperative: bool,

        #[command(subcommand)]
        strategy: StrategyCommands,
    },

    /// Report disk usage of a mount point and alert past a threshold
    DiskUsage {
        /// Alert threshold percent, in (0, 100)
        #[arg(long, short = 't')]
        threshold: Option<f64>,

        /// Directory on the volume to check
        mount_point: PathBuf,
    },
}

#[derive(Subcommand)]
enum StrategyCommands {
    /// Find the window that brings usage down to a target percent
    Auto {
        /// Target usage percent, in [1, 99]
        #[arg(long, short = 't')]
        threshold: Option<f64>,

        cache_dir: PathBuf,
    },

    /// Remove files older than a fixed window
    Manual {
        #[arg(long, allow_negative_numbers = true)]
        days: Option<f64>,

        #[arg(long, allow_negative_numbers = true)]
        hours: Option<f64>,

        #[arg(long, allow_negative_numbers = true)]
        minutes: Option<f64>,

        cache_dir: PathBuf,
    },
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let run_id = Ulid::new().to_string();

    logging::init(cli.verbose, &run_id, cli.json);
    logging::log_separator();

    let code = match run(cli, &run_id) {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            e.exit_code()
        }
    };
    code.into()
}

fn run(cli: Cli, run_id: &str) -> JanitorResult<ExitCode> {
    let config = JanitorConfig::load(cli.config.as_deref())?;
    if cli.require_root || config.require_root {
        ensure_root()?;
    }

    match cli.command {
        Commands::Prune {
            metric,
            dry_run,
            cooperative,
            strategy,
        } => {
            let (strategy, root) = match strategy {
                StrategyCommands::Auto {
                    threshold,
                    cache_dir,
                } => {
                    let target_percent = threshold.unwrap_or(config.prune.threshold);
                    validate_auto_threshold(target_percent)?;
                    (Strategy::Auto { target_percent }, cache_dir)
                }
                StrategyCommands::Manual {
                    days,
                    hours,
                    minutes,
                    cache_dir,
                } => {
                    let window = manual_window(
                        days.unwrap_or(config.prune.default_days),
                        hours.unwrap_or(0.0),
                        minutes.unwrap_or(0.0),
                    )?;
                    (Strategy::Manual { window }, cache_dir)
                }
            };

            let request = PruneRequest {
                root,
                metric: metric.unwrap_or(config.prune.metric),
                strategy,
                dry_run,
                cooperative: cooperative || config.prune.cooperative,
                policy: config.prune.search_policy()?,
            };
            let report = run_prune(
                &request,
                &StatvfsProbe,
                &mut LogReporter,
                run_id,
                config.digest(),
            )?;
            if cli.json {
                println!("{}", report.summary.to_json()?);
            }
            Ok(report.exit_code)
        }
        Commands::DiskUsage {
            threshold,
            mount_point,
        } => {
            let threshold = threshold.unwrap_or(config.disk_usage.threshold);
            let report = run_disk_usage(&mount_point, threshold, &StatvfsProbe)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            Ok(report.exit_code())
        }
    }
}
