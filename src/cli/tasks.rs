//! Tasks subcommand: print the configurations handed to task runners.

use super::{FormatArg, load_config};
use crate::format::{OutputFormat, format_task_configs_markdown, render};
use anyhow::{Result, anyhow};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the tasks subcommand
#[derive(Args, Debug)]
pub struct TasksArgs {
    /// Configuration document (default: $QC_CONFIG_PATH)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Only this task, merged once with the overrides below
    #[arg(short, long, value_name = "NAME")]
    pub task: Option<String>,

    /// Parallel instance id (requires --task)
    #[arg(long, requires = "task")]
    pub id: Option<u32>,

    /// Override resetAfterCycles (requires --task)
    #[arg(long, requires = "task")]
    pub reset: Option<u32>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = FormatArg::Json)]
    pub format: FormatArg,
}

/// Resolve the configuration and render the requested task configurations.
///
/// Without `--task`, every instance of every active task is listed.
pub fn run_tasks(args: &TasksArgs, overlays: &[PathBuf]) -> Result<String> {
    let spec = load_config(args.file.as_deref(), overlays)?.resolve()?;

    let configs = match args.task {
        Some(ref name) => vec![
            spec.task_config(name, args.id, args.reset)
                .ok_or_else(|| anyhow!("Task '{}' not found", name))?,
        ],
        None => spec.task_configs(),
    };

    match OutputFormat::from(args.format) {
        OutputFormat::Markdown => Ok(format_task_configs_markdown(&configs)),
        format => render(&configs, format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::TaskConfig;
    use tempfile::TempDir;

    const CONFIG: &str = r#"
config:
  consul:
    url: consul:8500
tasks:
  LocalTask:
    className: SkeletonTask
    moduleName: QcSkeleton
    detectorName: TST
    cycleDurationSeconds: 10
    location: local
    localMachines: [flp001, flp002]
    remoteMachine: qc-merger
    remotePort: 30132
    dataSource:
      type: dataSamplingPolicy
      name: tst-raw
"#;

    fn args(file: PathBuf) -> TasksArgs {
        TasksArgs {
            file: Some(file),
            task: None,
            id: None,
            reset: None,
            format: FormatArg::Json,
        }
    }

    #[test]
    fn test_lists_all_instances() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("qc.yaml");
        std::fs::write(&file, CONFIG).unwrap();

        let out = run_tasks(&args(file), &[]).unwrap();
        let configs: Vec<TaskConfig> = serde_json::from_str(&out).unwrap();
        assert_eq!(configs.len(), 2);
        assert_eq!(configs[1].parallel_task_id, 2);
        assert_eq!(configs[0].consul_url, "consul:8500");
    }

    #[test]
    fn test_single_task_with_overrides() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("qc.yaml");
        std::fs::write(&file, CONFIG).unwrap();

        let mut args = args(file);
        args.task = Some("LocalTask".to_string());
        args.id = Some(7);
        args.reset = Some(4);
        let out = run_tasks(&args, &[]).unwrap();
        let configs: Vec<TaskConfig> = serde_json::from_str(&out).unwrap();
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].parallel_task_id, 7);
        assert_eq!(configs[0].reset_after_cycles, 4);
    }

    #[test]
    fn test_unknown_task() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("qc.yaml");
        std::fs::write(&file, CONFIG).unwrap();

        let mut args = args(file);
        args.task = Some("Missing".to_string());
        assert!(run_tasks(&args, &[]).unwrap_err().to_string().contains("Missing"));
    }
}
