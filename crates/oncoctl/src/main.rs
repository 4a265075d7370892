//! OncoDetect Control - CLI client for the OncoDetect daemon

use clap::Parser;
use oncoctl::cli::{Cli, Commands};
use oncoctl::commands::{self, Output};
use oncoctl::errors::{CtlError, EXIT_INVALID_INPUT, EXIT_SUCCESS};
use oncoctl::logging::{ErrorDetails, LogEntry};
use std::io::IsTerminal;
use std::time::Instant;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            let code = if e.use_stderr() {
                EXIT_INVALID_INPUT
            } else {
                EXIT_SUCCESS
            };
            std::process::exit(code);
        }
    };

    let started = Instant::now();
    let mut entry = LogEntry::new(cli.command.name(), std::env::args().skip(1).collect());
    let output = Output {
        json: cli.json,
        color: std::io::stdout().is_terminal(),
    };

    let outcome = match &cli.command {
        Commands::Predict(args) => commands::predict(args, &cli.server, output).await,
        Commands::Health => commands::health(&cli.server, output).await,
    };

    let exit_code = match &outcome {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            // The failure view was already rendered
            if !matches!(e, CtlError::AnalysisFailed(_)) {
                eprintln!("Error: {}", e);
            }
            entry.error = Some(ErrorDetails {
                code: e.code().to_string(),
                message: e.to_string(),
            });
            e.exit_code()
        }
    };

    entry.exit_code = exit_code;
    entry.ok = outcome.is_ok();
    entry.duration_ms = started.elapsed().as_millis() as u64;
    let _ = entry.write();

    std::process::exit(exit_code);
}
