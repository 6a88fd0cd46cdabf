//! CLI command definitions for qc-infra
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod resolve;
pub mod tasks;

use crate::config::{CONFIG_PATH_ENV, ConfigLoader};
use crate::format::OutputFormat;
use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use resolve::{ResolveArgs, ValidateArgs};
use std::path::{Path, PathBuf};
use tasks::TasksArgs;

/// Output format for printed results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FormatArg {
    #[default]
    Json,
    Yaml,
    Markdown,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Yaml => OutputFormat::Yaml,
            FormatArg::Markdown => OutputFormat::Markdown,
        }
    }
}

/// Resolve and inspect QC infrastructure configuration files
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Overlay document merged on top of the configuration (repeatable, later wins)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub overlay: Vec<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the resolved infrastructure spec
    Resolve(ResolveArgs),

    /// Check that a configuration resolves, reporting warnings
    Validate(ValidateArgs),

    /// Print the task configurations handed to task runners
    Tasks(TasksArgs),
}

/// Load the configuration named on the command line, or from `QC_CONFIG_PATH`.
pub fn load_config(file: Option<&Path>, overlays: &[PathBuf]) -> Result<ConfigLoader> {
    let path = match file {
        Some(path) => path.to_path_buf(),
        None => ConfigLoader::default_path().ok_or_else(|| {
            anyhow!(
                "No configuration file given. Pass a path or set {}.",
                CONFIG_PATH_ENV
            )
        })?,
    };
    Ok(ConfigLoader::load_with_overlays(path, overlays)?)
}
