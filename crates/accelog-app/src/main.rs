use std::path::PathBuf;

use accelog_app::{commands, logging, AppConfig};
use anyhow::Result;
use clap::{Parser, Subcommand};

/// Firmware bring-up tools for the accelerometer pipeline
#[derive(Parser)]
#[command(name = "accelog")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file (defaults to <config dir>/accelog/config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Record accelerometer samples from a serial port into <OUTPUT>.csv
    Collect(commands::CollectArgs),

    /// List available serial ports
    Ports,

    /// Design a low-pass FIR filter and optionally apply it to a session
    Filter(commands::FilterArgs),

    /// Generate a C/H file pair for a new firmware module
    Template(commands::TemplateArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    match &cli.command {
        Command::Collect(args) => {
            let config = AppConfig::load(cli.config.as_deref())?;
            commands::collect(args, &config)?;
        }
        Command::Ports => commands::ports()?,
        Command::Filter(args) => {
            let config = AppConfig::load(cli.config.as_deref())?;
            commands::filter(args, &config)?;
        }
        Command::Template(args) => commands::template(args)?,
    }
    Ok(())
}
