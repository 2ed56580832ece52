//! Atelier - dialogue dataset curation workbench
//!
//! Main entry point for the `atelier` binary.

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

mod cli;
mod commands;
mod error;

use cli::Cli;
use error::CliError;

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    init_tracing(&cli);

    // Run the async runtime
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to create Tokio runtime");

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            e.exit_code()
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    // Load configuration if specified
    let config = cli.load_config()?;

    // Execute the command
    cli.execute(config).await
}

fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // Without explicit flags, defer to the ATELIER_LOG_* environment setup.
    if cli.verbose == 0 && !cli.quiet {
        let config = atelier_common_log::LogConfig::from_env();
        if let Err(e) = atelier_common_log::init(config) {
            eprintln!("warning: logging not initialized: {e}");
        }
        return;
    }

    let filter = match cli.verbose {
        0 => EnvFilter::new("error"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(cli.verbose >= 2));

    subscriber.init();
}
