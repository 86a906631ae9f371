//! `waymark` binary.

use std::{io, process::ExitCode, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug};
use miette::GraphicalReportHandler;

use waymark_cli::{Args, error_adapter};

fn main() -> ExitCode {
    miette::set_panic_hook();

    let args = Args::parse();
    init_logging(&args.log_level);
    debug!(args:?; "Parsed arguments");

    match waymark_cli::run(&args, &mut io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Printed directly so `--log-level off` still shows the failure.
            eprintln!(
                "{}",
                error_adapter::render(&GraphicalReportHandler::new(), &err)
            );
            ExitCode::FAILURE
        }
    }
}

fn init_logging(level: &str) {
    let filter = LevelFilter::from_str(level).unwrap_or_else(|_| {
        eprintln!("Unknown log level `{level}`, falling back to `warn`");
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(filter)
        .format_timestamp(None)
        .init();
}
