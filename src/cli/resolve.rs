//! Resolve and validate subcommands.

use super::{FormatArg, load_config};
use crate::format::{OutputFormat, format_infrastructure_markdown, render};
use anyhow::{Result, bail};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the resolve subcommand
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Configuration document (default: $QC_CONFIG_PATH)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = FormatArg::Json)]
    pub format: FormatArg,
}

/// Arguments for the validate subcommand
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Configuration document (default: $QC_CONFIG_PATH)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

/// Resolve the configuration and render the infrastructure spec.
pub fn run_resolve(args: &ResolveArgs, overlays: &[PathBuf]) -> Result<String> {
    let spec = load_config(args.file.as_deref(), overlays)?.resolve()?;
    match OutputFormat::from(args.format) {
        OutputFormat::Markdown => Ok(format_infrastructure_markdown(&spec)),
        format => render(&spec, format),
    }
}

/// Resolve the configuration and summarize the outcome.
///
/// Fatal resolution errors are returned as errors; warnings only fail in
/// strict mode.
pub fn run_validate(args: &ValidateArgs, overlays: &[PathBuf]) -> Result<String> {
    let loader = load_config(args.file.as_deref(), overlays)?;
    let spec = loader.resolve()?;

    let mut report = format!(
        "{}: {} task(s), {} active, {} warning(s)\n",
        loader.source(),
        spec.tasks.len(),
        spec.active_tasks().count(),
        spec.warnings.len()
    );
    for warning in &spec.warnings {
        report.push_str(&format!("warning: {}\n", warning));
    }

    if args.strict && spec.has_warnings() {
        bail!("{}{} warning(s) in strict mode", report, spec.warnings.len());
    }
    Ok(report)
}
