//! gitreel: turn git history into an animation timeline
//!
//! This binary reads the history of a git repository and prints a JSON
//! timeline in which every calendar day of commits fits a fixed animation
//! budget.

use std::process::ExitCode;

use clap::Parser;
use gitreel::config::Config;
use gitreel::timeline;
use tracing::{debug, error};

fn main() -> ExitCode {
    let config = Config::parse();

    // Logs go to stderr; stdout carries the JSON timeline
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .init();

    debug!(?config, "Starting gitreel");

    if let Err(e) = config.validate() {
        error!("{e}");
        return ExitCode::FAILURE;
    }

    match timeline::run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
