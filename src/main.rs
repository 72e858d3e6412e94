//! Standlock admin CLI.
//!
//! Operator tooling over a lock data directory: inspect, count, edit, evict
//! and reconcile locks while the host is offline. Diagnostics go to stderr
//! through `tracing`; command output goes to stdout.

mod cli;
mod commands;

use cli::Cli;
use standlock::exit_codes;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("standlock=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_args();

    match commands::dispatch(cli) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
