//! CLI argument parsing for gradeflow
//!
//! Global flags: --root, --format, --quiet, --verbose, --log-level, --log-json

pub mod commands;
pub mod format;
pub mod output;
pub mod paths;

use clap::Parser;
use std::path::PathBuf;

pub use commands::Commands;
pub use output::OutputFormat;

/// Gradeflow - step through a rubric, one metric at a time
#[derive(Parser, Debug)]
#[command(name = "gradeflow")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Base directory for resolving the workspace
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level or filter directive (e.g. `debug`, `gradeflow_core=trace`)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["gradeflow", "status", "--format", "json", "-q"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Some(Commands::Status)));
    }

    #[test]
    fn test_rate_accepts_none() {
        let cli = Cli::try_parse_from(["gradeflow", "rate", "none", "--metric", "Clarity"]).unwrap();
        match cli.command {
            Some(Commands::Rate(args)) => {
                assert_eq!(args.value, "none");
                assert_eq!(args.metric.as_deref(), Some("Clarity"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["gradeflow", "--format", "records", "status"]).is_err());
    }
}
