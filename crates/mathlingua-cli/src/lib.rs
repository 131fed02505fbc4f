//! CLI logic for the `mlg` tool.
//!
//! This module contains the sub-commands of the MathLingua command-line
//! tool. Output goes to the writer passed to [`run`], so the commands can
//! be driven from tests as well as from `main`.

pub mod config;
pub mod error_adapter;

mod args;

pub use args::{Args, Command};

use std::{
    io::{self, Write},
    path::PathBuf,
};

use log::{debug, info};
use miette::{GraphicalReportHandler, GraphicalTheme};
use serde::Serialize;

use mathlingua::{CheckReport, Checker, DiagnosticRecord, MathlinguaError};
use mathlingua_parser::error::Diagnostic;

use error_adapter::report_reportables;

/// Whether a command found errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Clean,
    Failed,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct DiagnosticsOutput<'a> {
    diagnostics: Vec<DiagnosticRecord<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct CompletionsOutput {
    completions: Vec<String>,
}

/// Run the MathLingua CLI application
///
/// # Arguments
///
/// * `args` - Command-line arguments
/// * `out` - Where the command's output is written
///
/// # Errors
///
/// Returns `MathlinguaError` for:
/// - Paths that do not exist or files that cannot be read
/// - An explicit configuration file that is missing or invalid
/// - Failures writing the output
pub fn run(args: &Args, out: &mut dyn Write) -> Result<Status, MathlinguaError> {
    match &args.command {
        Command::Check {
            paths,
            json,
            debug,
            fancy,
        } => {
            let report = check(args, paths)?;
            if *json {
                write_json(&report, out)?;
            } else if *fancy {
                write_fancy(&report, out)?;
            } else {
                write_plain(&report, *debug, out)?;
            }

            if report.has_errors() {
                Ok(Status::Failed)
            } else {
                Ok(Status::Clean)
            }
        }
        Command::Version => {
            writeln!(out, "v{}", env!("CARGO_PKG_VERSION"))?;
            Ok(Status::Clean)
        }
        Command::Completions => {
            let output = CompletionsOutput {
                completions: mathlingua::completions(),
            };
            serde_json::to_writer(&mut *out, &output).map_err(io::Error::from)?;
            writeln!(out)?;
            Ok(Status::Clean)
        }
    }
}

fn check(args: &Args, paths: &[PathBuf]) -> Result<CheckReport, MathlinguaError> {
    info!(paths:?; "Checking documents");

    let loaded = config::load_config(args.config.as_ref())?;
    debug!(config:? = loaded.config; "Loaded configuration");

    let checker = Checker::new(loaded.config);
    let mut report = checker.check_paths(paths)?;
    if let Some(warning) = loaded.warning {
        report.add_diagnostic(warning);
    }
    Ok(report)
}

/// Formats a diagnostic as `path (row, column)` with one-based numbers,
/// followed by the message on its own line.
fn format_diagnostic(diagnostic: &Diagnostic, with_origin: bool) -> String {
    let position = diagnostic.position();
    let mut header = format!(
        "{} ({}, {})",
        diagnostic.path(),
        position.row + 1,
        position.column + 1
    );
    if with_origin {
        header.push_str(&format!(" [{}]", diagnostic.origin()));
    }
    format!("{header}\n{}", diagnostic.message())
}

fn write_plain(report: &CheckReport, with_origin: bool, out: &mut dyn Write) -> io::Result<()> {
    for diagnostic in report.diagnostics() {
        writeln!(out, "{}\n", format_diagnostic(diagnostic, with_origin))?;
    }
    writeln!(out, "{}", report.summary())
}

fn write_fancy(report: &CheckReport, out: &mut dyn Write) -> Result<(), MathlinguaError> {
    let reporter = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());

    let paths = report.diagnostics().map(Diagnostic::path);
    for (reportable, path) in report_reportables(report).iter().zip(paths) {
        let mut writer = String::new();
        reporter
            .render_report(&mut writer, reportable.as_ref())
            .map_err(io::Error::other)?;
        writeln!(out, "{path}\n{writer}")?;
    }
    writeln!(out, "{}", report.summary())?;
    Ok(())
}

fn write_json(report: &CheckReport, out: &mut dyn Write) -> Result<(), MathlinguaError> {
    let output = DiagnosticsOutput {
        diagnostics: report.records(),
    };
    serde_json::to_writer_pretty(&mut *out, &output).map_err(io::Error::from)?;
    writeln!(out)?;
    Ok(())
}
