//! Strata CLI - Command Line Interface
//!
//! Aggregates time series files onto coarser time steps as described by a
//! TOML configuration file.
//!
//! @version 0.1.0
//! @author Strata Development Team

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use strata_cli::{inspect, Driver};
use strata_common::config::validate_log_level;
use strata_common::Result;
use tracing_subscriber::EnvFilter;

// =============================================================================
// CLI Arguments
// =============================================================================

#[derive(Parser)]
#[command(name = "strata")]
#[command(author = "Strata Development Team")]
#[command(version = "0.1.0")]
#[command(about = "Calendar-aware time series aggregation", long_about = None)]
struct Cli {
    /// Override the log level of the configuration file
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate every series listed in a configuration file
    Aggregate { config: PathBuf },
    /// Validate a configuration file and its source files without writing
    Check { config: PathBuf },
    /// Print statistics of a time series file
    Inspect { file: PathBuf },
}

// =============================================================================
// Main Entry Point
// =============================================================================

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn execute(cli: Cli) -> Result<()> {
    if let Some(level) = &cli.log_level {
        validate_log_level(level)?;
    }

    match cli.command {
        Commands::Aggregate { config } => {
            let driver = Driver::from_file(&config)?;
            let level = cli.log_level.as_deref();
            init_logging(level.unwrap_or(driver.config().general.log_level.as_str()));
            let reports = driver.run()?;
            for report in &reports {
                println!(
                    "{} -> {} ({} records)",
                    report.source.display(),
                    report.target.display(),
                    report.target_points
                );
            }
        }
        Commands::Check { config } => {
            let driver = Driver::from_file(&config)?;
            let level = cli.log_level.as_deref();
            init_logging(level.unwrap_or(driver.config().general.log_level.as_str()));
            let checked = driver.check()?;
            println!("Configuration OK: {} series ready", checked.len());
        }
        Commands::Inspect { file } => {
            init_logging(cli.log_level.as_deref().unwrap_or("warn"));
            println!("{}", inspect(&file)?);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("strata: {}", e);
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
