//! Expansion of a task spec into its parallel instances.

use super::global::GlobalConfig;
use super::task::{TaskLocation, TaskSpec};
use super::task_config::TaskConfig;

/// Merging mode in which local instances publish per-cycle deltas.
const DELTA_MERGING_MODE: &str = "delta";

/// Build the `TaskConfig` of every instance of `spec`.
///
/// - inactive tasks have no instances
/// - a remote task has a single instance with id 0
/// - a local task has one instance per local machine, ids starting at 1;
///   in delta mode each instance resets after every cycle so the merger
///   receives deltas
pub fn instantiate(global: &GlobalConfig, spec: &TaskSpec) -> Vec<TaskConfig> {
    if !spec.active {
        return Vec::new();
    }

    match spec.location {
        TaskLocation::Remote => vec![TaskConfig::merge(global, spec, None, None)],
        TaskLocation::Local => {
            let reset = (spec.merging_mode == DELTA_MERGING_MODE).then_some(1);
            let count = u32::try_from(spec.local_machines.len().max(1)).unwrap_or(u32::MAX);
            (1..=count)
                .map(|id| TaskConfig::merge(global, spec, Some(id), reset))
                .collect()
        }
    }
}
