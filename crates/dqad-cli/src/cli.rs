//! CLI argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "dqad",
    version,
    about = "Claims data-quality validation and anomaly tiering",
    long_about = "Validate a batch of healthcare claims against data-quality rules,\n\
                  score clean claims against their procedure-code peers, and route\n\
                  every claim to the GOLD, SILVER or QUARANTINE tier."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow member and provider identifiers in trace-level logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Evaluate a claims CSV and write tiered outputs.
    Run(RunArgs),

    /// Write a synthetic claims CSV.
    Generate(GenerateArgs),

    /// List the data-quality rule catalogue.
    Rules,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Claims CSV to evaluate.
    #[arg(value_name = "CLAIMS_CSV")]
    pub input: PathBuf,

    /// Output directory for tier files and metrics (default: ./dq-output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Evaluate and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Thresholds file (TOML). Keys not present keep their defaults.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Z-score above which a clean claim is quarantined.
    #[arg(long = "z-threshold", value_name = "Z")]
    pub z_threshold: Option<f64>,

    /// Amounts above this are flagged EXCESSIVE_AMOUNT.
    #[arg(long = "max-amount", value_name = "AMOUNT")]
    pub max_amount: Option<f64>,

    /// Amounts below this are flagged NEGATIVE_AMOUNT.
    #[arg(long = "min-amount", value_name = "AMOUNT", allow_hyphen_values = true)]
    pub min_amount: Option<f64>,

    /// Reference date for date rules (default: today, UTC).
    #[arg(long = "as-of", value_name = "YYYY-MM-DD")]
    pub as_of: Option<NaiveDate>,

    /// Number of issue codes to show in the summary.
    #[arg(long = "top-issues", value_name = "N", default_value_t = 10)]
    pub top_issues: usize,

    /// Exit with status 2 when any claim lands in SILVER or QUARANTINE.
    #[arg(long = "fail-on-anomalies")]
    pub fail_on_anomalies: bool,
}

#[derive(Parser)]
pub struct GenerateArgs {
    /// Destination CSV file.
    #[arg(value_name = "OUTPUT_CSV")]
    pub output: PathBuf,

    /// Number of claims to generate.
    #[arg(long = "count", default_value_t = 1000)]
    pub count: usize,

    /// Random seed; the same seed and date give the same file.
    #[arg(long = "seed", default_value_t = 42)]
    pub seed: u64,

    /// Fraction of claims with an injected anomaly (0.0-1.0).
    #[arg(long = "anomaly-rate", default_value_t = 0.2)]
    pub anomaly_rate: f64,

    /// Date generated service dates are relative to (default: today, UTC).
    #[arg(long = "as-of", value_name = "YYYY-MM-DD")]
    pub as_of: Option<NaiveDate>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
