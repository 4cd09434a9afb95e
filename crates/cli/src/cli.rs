//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Beacon Scanner - correlate beacon detections with the device's compass heading
#[derive(Parser, Debug)]
#[command(
    name = "beacon-scanner",
    author,
    version,
    about = "Beacon detection and compass heading correlator",
    long_about = "Records which way the device was pointing whenever an allowlisted beacon is heard.\n\n\
                  Fuses motion sensors into a compass heading, tags every detection with it, \n\
                  optionally reports each record to a remote collector and exports the \n\
                  session as CSV when the scan stops."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "BEACON_SCANNER_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "BEACON_SCANNER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one scan session against simulated sensors
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display the effective configuration
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON); built-in defaults when omitted
    #[arg(short, long, env = "BEACON_SCANNER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Scan duration in seconds (0 = until Ctrl+C)
    #[arg(long, default_value = "10", env = "BEACON_SCANNER_DURATION")]
    pub duration: u64,

    /// Session name; the export is written to `<output-dir>/<name>.csv`
    #[arg(short = 'n', long, env = "BEACON_SCANNER_SESSION")]
    pub session_name: Option<String>,

    /// Override the collector endpoint (enables remote reporting)
    #[arg(long, env = "BEACON_SCANNER_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Override the identifier sent as `localDeviceId`
    #[arg(long, env = "BEACON_SCANNER_DEVICE_ID")]
    pub device_id: Option<String>,

    /// Override the export directory
    #[arg(long, env = "BEACON_SCANNER_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Simulated turn rate of the device (degrees per second)
    #[arg(long, default_value = "20.0", allow_negative_numbers = true)]
    pub turn_rate: f64,

    /// Simulated detections per second
    #[arg(long, default_value = "4.0")]
    pub detection_rate: f64,

    /// Number of simulated beacons outside the allowlist
    #[arg(long, default_value = "2")]
    pub foreign_beacons: usize,

    /// Validate configuration and exit without scanning
    #[arg(long)]
    pub dry_run: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "BEACON_SCANNER_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "scanner.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file; built-in defaults when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the full allowlist instead of a count
    #[arg(long)]
    pub devices: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
