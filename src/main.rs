//! qc-infra
//!
//! Command-line front end for resolving QC infrastructure configuration.

use anyhow::Result;
use clap::Parser;
use qc_infra::cli::resolve::{run_resolve, run_validate};
use qc_infra::cli::tasks::run_tasks;
use qc_infra::cli::{Cli, Command};
use std::fs::OpenOptions;
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// `RUST_LOG` directives on top of the level chosen by `--verbose`.
fn env_filter(level: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy()
}

/// Install the tracing subscriber selected by `--log`.
fn init_logging(log: &str, verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    match log {
        "0" | "off" => {
            // No logging
        }
        "1" | "stdout" => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(env_filter(level))
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        "2" | "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(env_filter(level))
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            // Log to file (append mode)
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(filename)?;
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(env_filter(level))
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log, cli.verbose)?;

    let output = match &cli.command {
        Command::Resolve(args) => run_resolve(args, &cli.overlay)?,
        Command::Validate(args) => run_validate(args, &cli.overlay)?,
        Command::Tasks(args) => run_tasks(args, &cli.overlay)?,
    };

    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}
