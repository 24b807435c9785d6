//! merge-into-series CLI
//!
//! Files loose video episodes into a series directory using an online
//! episode guide.

use clap::Parser;
use colored::Colorize;
use merge_into_series::cli::{args::Cli, commands::merge};
use merge_into_series::models::config;
use merge_into_series::utils::cancel::CancelToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    if cli.create_config {
        let path = cli.config.clone().unwrap_or_else(config::default_config_path);
        merge::create_config(&path)?;
        return Ok(());
    }

    let cancel = CancelToken::new();
    cancel.install_ctrlc_handler()?;

    if let Err(e) = merge::merge(&cli, &cancel).await {
        if e.is_cancellation() {
            println!("{}", "[CANCELLED] Operation cancelled by user".bold().yellow());
        } else {
            println!("{} {}", "[ERROR]".bold().red(), e);
        }
        std::process::exit(1);
    }

    Ok(())
}

/// Initialize the logging system.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("merge_into_series=debug")
    } else {
        EnvFilter::new("merge_into_series=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
