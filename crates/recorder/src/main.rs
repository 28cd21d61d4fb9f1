//! packrat - Onboard packet recorder
//!
//! # Usage
//!
//! ```bash
//! # Run the recorder (default)
//! packrat
//! packrat --config configs/packrat.toml
//!
//! # Validate a configuration without starting
//! packrat check --config configs/packrat.toml
//! ```

mod serve;

use anyhow::Result;
use clap::{Parser, Subcommand};
use packrat_config::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// packrat - onboard packet recorder
#[derive(Parser, Debug)]
#[command(name = "packrat")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file
    #[arg(short, long, default_value = "packrat.toml", global = true)]
    config: std::path::PathBuf,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the recorder
    Serve,

    /// Validate a configuration and print a summary
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Check) => check(&cli),
        // No subcommand = run the recorder
        Some(Command::Serve) | None => {
            let config = Config::from_file(&cli.config)?;
            let level = cli
                .log_level
                .as_deref()
                .unwrap_or_else(|| config.log.level.as_str());
            init_logging(level)?;
            serve::run(config).await
        }
    }
}

fn check(cli: &Cli) -> Result<()> {
    let config = Config::from_file(&cli.config)?;
    println!(
        "{}: ok ({} destinations, {} packet streams)",
        cli.config.display(),
        config.destinations.len(),
        config.packets.len()
    );
    Ok(())
}

/// Initialize the tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();

    Ok(())
}
