//! Command-line interface for the exporter binary
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and validation
//! - Mode selection (Lambda runtime loop vs a single local run)

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;

/// Export every MongoDB collection to S3 as JSON
#[derive(Parser, Debug)]
#[command(
    name = "mongo-s3-export",
    version,
    about = "Export every MongoDB collection to S3 as JSON",
    long_about = "Dumps each collection of the 'configurator' database to <collection>.json in an
S3 bucket. Runs as an AWS Lambda function by default; use --once to export locally."
)]
pub struct CliArgs {
    /// Run a single export and print the report instead of starting the Lambda runtime
    #[arg(long)]
    pub once: bool,

    /// Configuration file path (TOML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Verbose mode (debug logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv")]
    pub very_verbose: bool,
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Parse process arguments and load configuration
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    /// Load configuration for already-parsed arguments
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Config::load(args.config_file.as_deref())?;
        Ok(Self { args, config })
    }

    /// Get parsed arguments
    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// Get loaded configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether to run once instead of serving Lambda invocations
    pub fn is_local(&self) -> bool {
        self.args.once
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let args = CliArgs::try_parse_from(["mongo-s3-export"]).unwrap();
        assert!(!args.once);
        assert!(!args.verbose);
        assert!(args.config_file.is_none());
    }

    #[test]
    fn test_parse_local_run() {
        let args =
            CliArgs::try_parse_from(["mongo-s3-export", "--once", "-c", "export.toml", "-v"])
                .unwrap();
        assert!(args.once);
        assert!(args.verbose);
        assert_eq!(args.config_file.as_deref(), Some(std::path::Path::new("export.toml")));
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(CliArgs::try_parse_from(["mongo-s3-export", "--bucket", "x"]).is_err());
    }
}
