//! Output formatting for resolved specs: JSON, YAML and a markdown summary.

use crate::spec::{InfrastructureSpec, TaskConfig, TaskSpec};
use anyhow::Result;
use serde::Serialize;

/// Output format for CLI results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Markdown,
}

/// Render a serializable value as pretty JSON or YAML.
///
/// Markdown has no generic rendering; callers use the dedicated formatters
/// below and fall back to JSON here.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    let out = match format {
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
        OutputFormat::Json | OutputFormat::Markdown => serde_json::to_string_pretty(value)?,
    };
    Ok(out)
}

/// Format a single task spec as markdown.
pub fn format_task_markdown(task: &TaskSpec) -> String {
    let mut md = String::new();

    md.push_str(&format!("## Task: {}\n", task.task_name));
    md.push_str(&format!("- **class**: `{}`\n", task.class_name));
    md.push_str(&format!("- **module**: {}\n", task.module_name));
    md.push_str(&format!("- **detector**: {}\n", task.detector_name));
    md.push_str(&format!("- **cycle**: {}s\n", task.cycle_duration_seconds));
    if !task.active {
        md.push_str("- **active**: false\n");
    }

    let params: Vec<String> = task
        .data_source
        .params()
        .iter()
        .map(|(k, v)| format!("{}=`{}`", k, v))
        .collect();
    md.push_str(&format!(
        "- **data source**: {} ({})\n",
        task.data_source.kind(),
        params.join(", ")
    ));

    md.push_str(&format!("- **location**: {}\n", task.location));
    if !task.local_machines.is_empty() {
        md.push_str(&format!("- **local machines**: {}\n", task.local_machines.join(", ")));
    }
    if let Some(ref machine) = task.remote_machine {
        match task.remote_port {
            Some(port) => md.push_str(&format!("- **remote**: {}:{}\n", machine, port)),
            None => md.push_str(&format!("- **remote**: {}\n", machine)),
        }
    }

    if !task.custom_parameters.is_empty() {
        md.push_str("\n### Parameters\n");
        for (key, value) in &task.custom_parameters {
            md.push_str(&format!("- {}: `{}`\n", key, value));
        }
    }

    md
}

/// Format a whole infrastructure as markdown.
pub fn format_infrastructure_markdown(spec: &InfrastructureSpec) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Infrastructure ({} tasks)\n\n", spec.tasks.len()));
    md.push_str(&format!("- **source**: {}\n", spec.global.configuration_source));
    if !spec.global.consul_url.is_empty() {
        md.push_str(&format!("- **consul**: {}\n", spec.global.consul_url));
    }
    if !spec.global.condition_db_url.is_empty() {
        md.push_str(&format!("- **conditionDB**: {}\n", spec.global.condition_db_url));
    }
    md.push('\n');

    for task in &spec.tasks {
        md.push_str(&format_task_markdown(task));
        md.push('\n');
    }

    if spec.has_warnings() {
        md.push_str("## Warnings\n");
        for warning in &spec.warnings {
            md.push_str(&format!("- {}\n", warning));
        }
    }

    md
}

/// Format task instances as a markdown table.
pub fn format_task_configs_markdown(configs: &[TaskConfig]) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Task instances ({})\n\n", configs.len()));
    md.push_str("| task | id | cycle | reset | detector |\n");
    md.push_str("|------|----|-------|-------|----------|\n");
    for config in configs {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            config.task_name,
            config.parallel_task_id,
            config.cycle_duration_seconds,
            config.reset_after_cycles,
            config.detector_name
        ));
    }

    md
}
