//! Command-line argument definitions for the `mlg` tool.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. A sub-command selects the action; the configuration file
//! and logging verbosity are global options.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command-line arguments for the MathLingua tool
#[derive(Parser, Debug)]
#[command(name = "mlg", author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,
}

/// The action to perform.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check documents for errors
    Check {
        /// Files or directories to check
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Print the diagnostics as JSON
        #[arg(long)]
        json: bool,

        /// Include the origin of each diagnostic
        #[arg(long)]
        debug: bool,

        /// Render each diagnostic with a source snippet
        #[arg(long, conflicts_with = "json")]
        fancy: bool,
    },

    /// Print the version
    Version,

    /// Print completion entries as JSON
    Completions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_defaults_to_current_directory() {
        let args = Args::try_parse_from(["mlg", "check"]).expect("valid arguments");
        let Command::Check { paths, json, debug, fancy } = args.command else {
            panic!("expected the check command");
        };
        assert_eq!(paths, [PathBuf::from(".")]);
        assert!(!json && !debug && !fancy);
        assert_eq!(args.log_level, "warn");
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let args = Args::try_parse_from([
            "mlg",
            "check",
            "a.math",
            "content",
            "--json",
            "--config",
            "mlg.conf",
            "--log-level",
            "debug",
        ])
        .expect("valid arguments");
        assert_eq!(args.config.as_deref(), Some("mlg.conf"));
        assert_eq!(args.log_level, "debug");
        let Command::Check { paths, json, .. } = args.command else {
            panic!("expected the check command");
        };
        assert_eq!(paths, [PathBuf::from("a.math"), PathBuf::from("content")]);
        assert!(json);
    }

    #[test]
    fn test_fancy_conflicts_with_json() {
        assert!(Args::try_parse_from(["mlg", "check", "--json", "--fancy"]).is_err());
    }

    #[test]
    fn test_version_and_completions() {
        let args = Args::try_parse_from(["mlg", "version"]).expect("valid arguments");
        assert!(matches!(args.command, Command::Version));
        let args = Args::try_parse_from(["mlg", "completions"]).expect("valid arguments");
        assert!(matches!(args.command, Command::Completions));
    }
}
