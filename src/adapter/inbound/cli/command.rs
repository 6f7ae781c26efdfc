//! Command-line interface definitions.
//!
//! Defines the CLI structure for fundwatch using `clap`: one-shot scans,
//! a periodic watch loop, the predicted-funding snapshot and configuration
//! utilities.

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

use crate::infrastructure::config::scan::ScanOverrides;
use crate::infrastructure::config::DEFAULT_CONFIG_PATH;

/// Cross-venue perpetual funding-rate monitor
#[derive(Parser, Debug)]
#[command(name = "fundwatch")]
#[command(version)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Forced color setting, or `None` to follow terminal detection.
    #[must_use]
    pub const fn forced(self) -> Option<bool> {
        match self {
            Self::Auto => None,
            Self::Always => Some(true),
            Self::Never => Some(false),
        }
    }
}

/// Top-level subcommands for the fundwatch CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch, align and rank funding rates once
    Scan(ScanArgs),

    /// Refresh on an interval and print one line per cycle
    Watch(WatchArgs),

    /// Show predicted next-settlement funding
    Predicted(PredictedArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),
}

/// Subcommands for `fundwatch config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Generate a new configuration file from template.
    Init(ConfigInitArgs),
}

/// Subcommands for `fundwatch check`.
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate the configuration file syntax and semantics.
    Config(ConfigPathArg),
}

/// Shared argument for commands that only need a config path.
#[derive(Args, Debug)]
pub struct ConfigPathArg {
    /// Path to the configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
}

/// Query flags overriding the `[scan]` section.
#[derive(Args, Debug, Default)]
pub struct QueryArgs {
    /// Asset key from `[instruments]` (e.g. BTC).
    #[arg(long)]
    pub asset: Option<String>,

    /// Days of history to fetch.
    #[arg(long)]
    pub lookback_days: Option<u32>,

    /// Grid step (e.g. 1h, 30m, 1d).
    #[arg(long)]
    pub resample: Option<String>,

    /// Spread threshold in percent.
    #[arg(long)]
    pub threshold_pct: Option<Decimal>,
}

impl QueryArgs {
    #[must_use]
    pub fn overrides(&self) -> ScanOverrides {
        ScanOverrides {
            asset: self.asset.as_ref().map(|a| a.trim().to_ascii_uppercase()),
            lookback_days: self.lookback_days,
            resample: self.resample.clone(),
            threshold_pct: self.threshold_pct,
        }
    }
}

/// Arguments for the `scan` subcommand.
#[derive(Parser, Debug)]
pub struct ScanArgs {
    #[command(flatten)]
    pub config: ConfigPathArg,

    #[command(flatten)]
    pub query: QueryArgs,

    /// Rows in the top-spread ranking.
    #[arg(long, default_value_t = 5)]
    pub top: usize,

    /// Print the most recent aligned rows.
    #[arg(long)]
    pub rows: Option<usize>,
}

/// Arguments for the `watch` subcommand.
#[derive(Parser, Debug)]
pub struct WatchArgs {
    #[command(flatten)]
    pub config: ConfigPathArg,

    #[command(flatten)]
    pub query: QueryArgs,

    /// Seconds between refreshes; overrides `[monitor].refresh_interval_secs`.
    #[arg(long)]
    pub interval_secs: Option<u64>,

    /// Stop after this many refreshes.
    #[arg(long)]
    pub cycles: Option<u64>,
}

/// Arguments for the `predicted` subcommand.
#[derive(Parser, Debug)]
pub struct PredictedArgs {
    #[command(flatten)]
    pub config: ConfigPathArg,

    /// Only show this asset (e.g. BTC).
    #[arg(long)]
    pub asset: Option<String>,
}

/// Arguments for `config init`.
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Output path for the generated configuration file.
    #[arg(default_value = DEFAULT_CONFIG_PATH)]
    pub path: PathBuf,
    /// Overwrite the file if it already exists.
    #[arg(long)]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_scan_defaults() {
        let cli = Cli::try_parse_from(["fundwatch", "scan"]).unwrap();
        if let Commands::Scan(args) = cli.command {
            assert_eq!(args.config.config, PathBuf::from(DEFAULT_CONFIG_PATH));
            assert_eq!(args.top, 5);
            assert!(args.rows.is_none());
            assert_eq!(args.query.overrides(), ScanOverrides::default());
        } else {
            panic!("Expected Scan command");
        }
    }

    #[test]
    fn test_scan_query_overrides() {
        let cli = Cli::try_parse_from([
            "fundwatch",
            "scan",
            "--asset",
            "eth",
            "--lookback-days",
            "3",
            "--resample",
            "4h",
            "--threshold-pct",
            "0.05",
            "-c",
            "custom.toml",
        ])
        .unwrap();
        if let Commands::Scan(args) = cli.command {
            let overrides = args.query.overrides();
            assert_eq!(overrides.asset.as_deref(), Some("ETH"));
            assert_eq!(overrides.lookback_days, Some(3));
            assert_eq!(overrides.resample.as_deref(), Some("4h"));
            assert_eq!(overrides.threshold_pct, Some(dec!(0.05)));
            assert_eq!(args.config.config, PathBuf::from("custom.toml"));
        } else {
            panic!("Expected Scan command");
        }
    }

    #[test]
    fn test_invalid_threshold_type() {
        let result = Cli::try_parse_from(["fundwatch", "scan", "--threshold-pct", "lots"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_watch_command() {
        let cli = Cli::try_parse_from([
            "fundwatch",
            "watch",
            "--interval-secs",
            "30",
            "--cycles",
            "2",
        ])
        .unwrap();
        if let Commands::Watch(args) = cli.command {
            assert_eq!(args.interval_secs, Some(30));
            assert_eq!(args.cycles, Some(2));
        } else {
            panic!("Expected Watch command");
        }
    }

    #[test]
    fn test_predicted_command() {
        let cli = Cli::try_parse_from(["fundwatch", "predicted", "--asset", "BTC"]).unwrap();
        if let Commands::Predicted(args) = cli.command {
            assert_eq!(args.asset.as_deref(), Some("BTC"));
        } else {
            panic!("Expected Predicted command");
        }
    }

    #[test]
    fn test_config_init_with_force() {
        let cli = Cli::try_parse_from(["fundwatch", "config", "init", "--force"]).unwrap();
        if let Commands::Config(ConfigCommand::Init(args)) = cli.command {
            assert!(args.force);
            assert_eq!(args.path, PathBuf::from(DEFAULT_CONFIG_PATH));
        } else {
            panic!("Expected Config Init command");
        }
    }

    #[test]
    fn test_check_config_command() {
        let cli = Cli::try_parse_from(["fundwatch", "check", "config", "-c", "x.toml"]).unwrap();
        if let Commands::Check(CheckCommand::Config(arg)) = cli.command {
            assert_eq!(arg.config, PathBuf::from("x.toml"));
        } else {
            panic!("Expected Check Config command");
        }
    }

    #[test]
    fn test_unknown_command_fails() {
        assert!(Cli::try_parse_from(["fundwatch", "unknown"]).is_err());
    }

    #[test]
    fn test_missing_subcommand() {
        assert!(Cli::try_parse_from(["fundwatch"]).is_err());
    }

    #[test]
    fn test_color_choice() {
        let cli = Cli::try_parse_from(["fundwatch", "--color", "never", "scan"]).unwrap();
        assert_eq!(cli.color.forced(), Some(false));
        assert!(Cli::try_parse_from(["fundwatch", "--color", "invalid", "scan"]).is_err());
    }

    #[test]
    fn test_global_flags_after_command() {
        let cli = Cli::try_parse_from(["fundwatch", "scan", "--json", "--quiet", "-vv"]).unwrap();
        assert!(cli.json);
        assert!(cli.quiet);
        assert_eq!(cli.verbose, 2);
    }
}
