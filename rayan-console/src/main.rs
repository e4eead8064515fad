//! rayan - admin console for the Rayan store
//!
//! Runs list, edit and report commands against the Rayan API using the
//! same screen controllers a UI would.

mod cli;
mod commands;
mod config;
mod logger;

use std::process::ExitCode;

use clap::Parser;

use cli::Cli;
use commands::Reported;
use config::ConsoleConfig;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = ConsoleConfig::from_env().apply(&cli.global);

    if let Err(e) = logger::init_logger(&config.log_level, config.log_json) {
        eprintln!("failed to initialize logging: {e}");
    }
    tracing::debug!(api = %config.api_url, "Starting rayan console");

    match commands::run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // notices already went out for controller failures
            if e.downcast_ref::<Reported>().is_none() {
                eprintln!("error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}
