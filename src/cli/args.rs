//! CLI argument definitions for `degreeplanner`

use chrono::NaiveDate;
use clap::{builder::BoolishValueParser, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use degree_planner::config::ConfigOverrides;
use degree_planner::core::report::ReportFormat;
use degree_planner::logger::Level;

/// CLI log level argument
///
/// Represents log levels that can be passed via CLI arguments. Converts to lowercase
/// strings for config storage and to `Level` for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

/// Report format argument
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum FormatArg {
    /// camelCase JSON
    #[default]
    Json,
    /// Markdown tables
    #[value(alias = "md")]
    Markdown,
}

impl From<FormatArg> for ReportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => Self::Json,
            FormatArg::Markdown => Self::Markdown,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `max_credits_per_term`, `data_dir`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

/// Arguments selecting one timeline of a dataset
#[derive(Debug, Args)]
pub struct TimelineArgs {
    /// Path to the JSON dataset (defaults to `dataset.json` in the configured `data_dir`)
    #[arg(value_name = "DATASET")]
    pub dataset: Option<PathBuf>,

    /// Timeline to load
    #[arg(short, long, value_name = "ID")]
    pub timeline: String,

    /// User making the request; must own the timeline
    #[arg(short, long, value_name = "ID")]
    pub user: String,

    /// Evaluate as of this date (YYYY-MM-DD) instead of today
    #[arg(long, value_name = "DATE")]
    pub today: Option<NaiveDate>,
}

/// Arguments controlling report output
#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Report format
    #[arg(short, long, value_enum, default_value_t = FormatArg::Json)]
    pub format: FormatArg,

    /// Write the report to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write the report into the configured reports directory
    #[arg(long, conflicts_with = "output")]
    pub save: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Audit a timeline against its degree requirements.
    ///
    /// Classifies each requirement category, computes overall progress and
    /// advisory notices, and estimates a graduation term.
    Audit {
        #[command(flatten)]
        timeline: TimelineArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Schedule the remaining degree courses into future terms.
    Optimize {
        #[command(flatten)]
        timeline: TimelineArgs,

        #[command(flatten)]
        output: OutputArgs,

        /// Also audit the projected timeline
        #[arg(long)]
        audit: bool,
    },
    /// Check requisite ordering and catalog references of a timeline.
    Check {
        #[command(flatten)]
        timeline: TimelineArgs,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "degreeplanner",
    about = "Degree audit and graduation path planner",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug", global = true)]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override the per-term credit cap used by the optimizer
    #[arg(long = "max-credits", value_name = "CREDITS", global = true)]
    pub max_credits: Option<f32>,

    /// Override config data directory
    #[arg(long = "config-data-dir", value_name = "DIR")]
    pub config_data_dir: Option<PathBuf>,

    /// Override config data directory (short form)
    #[arg(long = "data-dir", value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Override config reports directory
    #[arg(long = "config-reports-dir", value_name = "DIR")]
    pub config_reports_dir: Option<PathBuf>,

    /// Override config reports directory (short form)
    #[arg(long = "reports-dir", value_name = "DIR", global = true)]
    pub reports_dir: Option<PathBuf>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

fn path_string(path: &std::path::Path) -> String {
    path.to_string_lossy().to_string()
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// Short-form flags (e.g., `--data-dir`) take precedence over long-form
    /// flags (e.g., `--config-data-dir`) when both are provided.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: self.config_log_file.as_deref().map(path_string),
            verbose: self.config_verbose,
            max_credits: self.max_credits,
            data_dir: self
                .data_dir
                .as_deref()
                .or(self.config_data_dir.as_deref())
                .map(path_string),
            reports_dir: self
                .reports_dir
                .as_deref()
                .or(self.config_reports_dir.as_deref())
                .map(path_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("arguments should parse")
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevelArg::Error.to_string(), "error");
        assert_eq!(LogLevelArg::Warn.to_string(), "warn");
        assert_eq!(LogLevelArg::Info.to_string(), "info");
        assert_eq!(LogLevelArg::Debug.to_string(), "debug");
    }

    #[test]
    fn test_log_level_to_logger_level() {
        assert_eq!(Level::from(LogLevelArg::Error), Level::Error);
        assert_eq!(Level::from(LogLevelArg::Warn), Level::Warn);
        assert_eq!(Level::from(LogLevelArg::Info), Level::Info);
        assert_eq!(Level::from(LogLevelArg::Debug), Level::Debug);
    }

    #[test]
    fn test_to_config_overrides_empty() {
        let cli = parse(&["degreeplanner", "config"]);
        let overrides = cli.to_config_overrides();
        assert!(overrides.level.is_none());
        assert!(overrides.file.is_none());
        assert!(overrides.verbose.is_none());
        assert!(overrides.max_credits.is_none());
        assert!(overrides.data_dir.is_none());
        assert!(overrides.reports_dir.is_none());
    }

    #[test]
    fn test_to_config_overrides_with_values() {
        let cli = parse(&[
            "degreeplanner",
            "--config-level",
            "debug",
            "--config-log-file",
            "/tmp/test.log",
            "--config-verbose",
            "true",
            "--max-credits",
            "16",
            "--data-dir",
            "/data",
            "--config-reports-dir",
            "/reports",
            "config",
        ]);

        let overrides = cli.to_config_overrides();
        assert_eq!(overrides.level, Some("debug".to_string()));
        assert_eq!(overrides.file, Some("/tmp/test.log".to_string()));
        assert_eq!(overrides.verbose, Some(true));
        assert_eq!(overrides.max_credits, Some(16.0));
        assert_eq!(overrides.data_dir, Some("/data".to_string()));
        assert_eq!(overrides.reports_dir, Some("/reports".to_string()));
    }

    #[test]
    fn test_short_form_precedence_over_long_form() {
        let cli = parse(&[
            "degreeplanner",
            "--config-data-dir",
            "/long/data",
            "--data-dir",
            "/short/data",
            "--config-reports-dir",
            "/long/reports",
            "--reports-dir",
            "/short/reports",
            "config",
        ]);

        let overrides = cli.to_config_overrides();
        assert_eq!(overrides.data_dir, Some("/short/data".to_string()));
        assert_eq!(overrides.reports_dir, Some("/short/reports".to_string()));
    }

    #[test]
    fn test_optimize_arguments() {
        let cli = parse(&[
            "degreeplanner",
            "optimize",
            "data.json",
            "--timeline",
            "t1",
            "--user",
            "s1",
            "--today",
            "2024-10-01",
            "-f",
            "md",
            "--audit",
        ]);

        let Command::Optimize {
            timeline,
            output,
            audit,
        } = cli.command
        else {
            panic!("expected optimize command");
        };
        assert_eq!(timeline.dataset, Some(PathBuf::from("data.json")));
        assert_eq!(timeline.timeline, "t1");
        assert_eq!(timeline.user, "s1");
        assert_eq!(timeline.today, NaiveDate::from_ymd_opt(2024, 10, 1));
        assert_eq!(output.format, FormatArg::Markdown);
        assert!(audit);
    }

    #[test]
    fn test_output_and_save_conflict() {
        let result = Cli::try_parse_from([
            "degreeplanner",
            "audit",
            "-t",
            "t1",
            "-u",
            "s1",
            "-o",
            "out.json",
            "--save",
        ]);
        assert!(result.is_err());
    }
}
