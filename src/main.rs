use std::sync::Mutex;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(&cli)?;
    cli::run(cli)
}

fn init_tracing(cli: &cli::Cli) -> Result<()> {
    let level = if cli.quiet {
        "error".to_string()
    } else {
        match cli.verbose {
            0 => cli.log_level.clone(),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(format!("bibcite={level}")));

    let file_layer = match &cli.log_path {
        Some(dir) => Some(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(cli::open_log_file(dir)?)),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();
    Ok(())
}
