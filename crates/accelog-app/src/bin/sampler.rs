//! `sampler <PORT> <OUTPUT_BASENAME>`: record a fixed-length capture.

use std::path::PathBuf;

use accelog_app::{commands, logging, AppConfig};
use anyhow::Result;
use clap::Parser;

/// Collect serial accelerometer data into <OUTPUT_BASENAME>.csv
#[derive(Parser)]
#[command(name = "sampler", version)]
struct Cli {
    #[command(flatten)]
    collect: commands::CollectArgs,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Settings file (defaults to <config dir>/accelog/config.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    let config = AppConfig::load(cli.config.as_deref())?;
    commands::collect(&cli.collect, &config)?;
    Ok(())
}
