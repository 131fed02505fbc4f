//! `mlg` entry point.

use std::{io, process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, info};

use mathlingua_cli::{Args, Status, error_adapter::to_reportables};

fn main() {
    miette::set_panic_hook();

    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting mlg");
    debug!(args:?; "Parsed arguments");

    let result = mathlingua_cli::run(&args, &mut io::stdout().lock());
    match result {
        Ok(Status::Clean) => info!("Completed successfully"),
        Ok(Status::Failed) => {
            info!("Completed with errors");
            process::exit(1);
        }
        Err(err) => {
            let reporter = miette::GraphicalReportHandler::new();
            for reportable in to_reportables(&err) {
                let mut rendered = String::new();
                match reporter.render_report(&mut rendered, reportable.as_ref()) {
                    Ok(()) => eprintln!("{rendered}"),
                    Err(_) => eprintln!("Error: {reportable}"),
                }
            }

            process::exit(1);
        }
    }
}
