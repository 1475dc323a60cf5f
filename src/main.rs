mod cli;

use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;

use paint_engine::logger;

fn main() -> ExitCode {
    let args = cli::CliArgs::parse();

    // Initialize session log (overwrites previous session log)
    let level = if args.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    let log_path = args.log_file.clone().unwrap_or_else(logger::default_log_path);
    if let Err(e) = logger::init(&log_path, level) {
        eprintln!("[logger] Failed to open log file {:?}: {}", log_path, e);
    }
    if let Some(path) = logger::log_path() {
        log::debug!("session log at {}", path.display());
    }

    cli::run(args)
}
