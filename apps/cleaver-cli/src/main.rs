//! # Cleaver
//!
//! Butcher-counter register.
//!
//! ```text
//! cleaver session                        interactive scan / finalize loop
//! cleaver product list|add|price|delete  catalog maintenance
//! cleaver report [--date D] [--csv F]    daily report
//! cleaver history [--date D] [--csv F]   finalized lines
//! ```
//!
//! The storage layer drives its own single-threaded runtime, so `main`
//! stays synchronous.

use std::process::ExitCode;

use clap::Parser;

use cleaver_cli::cli::Cli;
use cleaver_cli::error::CliError;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let json = cli.json;

    cleaver_cli::init_tracing();

    match cleaver_cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let cli_error = err.downcast_ref::<CliError>();
            let code = cli_error.map_or(1, CliError::exit_code);

            match cli_error {
                Some(cli_error) if json => match serde_json::to_string(cli_error) {
                    Ok(body) => eprintln!("{}", body),
                    Err(_) => eprintln!("error: {:#}", err),
                },
                _ => eprintln!("error: {:#}", err),
            }

            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}
