//! Top-level result of reading one configuration document.

use super::global::GlobalConfig;
use super::instantiate::instantiate;
use super::task::TaskSpec;
use super::task_config::TaskConfig;
use crate::error::SpecWarning;
use serde::Serialize;

/// Global settings plus every task, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InfrastructureSpec {
    pub global: GlobalConfig,
    pub tasks: Vec<TaskSpec>,
    /// Non-fatal findings, in the order they were raised.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<SpecWarning>,
}

impl InfrastructureSpec {
    /// Find a task by name.
    pub fn task(&self, name: &str) -> Option<&TaskSpec> {
        self.tasks.iter().find(|t| t.task_name == name)
    }

    pub fn active_tasks(&self) -> impl Iterator<Item = &TaskSpec> {
        self.tasks.iter().filter(|t| t.active)
    }

    /// Merge `task` with the global settings.
    pub fn task_config(
        &self,
        task: &str,
        instance_id: Option<u32>,
        reset_after_cycles: Option<u32>,
    ) -> Option<TaskConfig> {
        self.task(task)
            .map(|spec| TaskConfig::merge(&self.global, spec, instance_id, reset_after_cycles))
    }

    /// Configurations of every instance of every active task.
    pub fn task_configs(&self) -> Vec<TaskConfig> {
        self.tasks
            .iter()
            .flat_map(|spec| instantiate(&self.global, spec))
            .collect()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
