//! Execution-ready configuration of one task instance.

use super::global::GlobalConfig;
use super::task::TaskSpec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flat configuration handed to the task runner.
///
/// Built fresh for every instance of a task; parallel instances of the same
/// spec differ only in `parallel_task_id` (and possibly `reset_after_cycles`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskConfig {
    pub task_name: String,
    pub module_name: String,
    pub class_name: String,
    pub cycle_duration_seconds: u32,
    pub max_number_cycles: i32,
    pub consul_url: String,
    pub condition_url: String,
    pub custom_parameters: BTreeMap<String, String>,
    pub detector_name: String,
    /// Distinguishes parallel instances. 0 means this is the only one.
    #[serde(rename = "parallelTaskID")]
    pub parallel_task_id: u32,
    pub save_to_file: String,
    pub reset_after_cycles: u32,
    pub configuration_source: String,
}

impl TaskConfig {
    /// Merge global settings, one task spec and the run-time overrides.
    ///
    /// Infrastructure endpoints and the configuration source come from
    /// `global`; everything else comes from `spec`.
    pub fn merge(
        global: &GlobalConfig,
        spec: &TaskSpec,
        instance_id: Option<u32>,
        reset_after_cycles: Option<u32>,
    ) -> Self {
        Self {
            task_name: spec.task_name.clone(),
            module_name: spec.module_name.clone(),
            class_name: spec.class_name.clone(),
            cycle_duration_seconds: spec.cycle_duration_seconds,
            max_number_cycles: spec.max_number_cycles,
            consul_url: global.consul_url.clone(),
            condition_url: global.condition_db_url.clone(),
            custom_parameters: spec.custom_parameters.clone(),
            detector_name: spec.detector_name.clone(),
            parallel_task_id: instance_id.unwrap_or(0),
            save_to_file: spec.save_objects_to_file.clone(),
            reset_after_cycles: reset_after_cycles.unwrap_or(spec.reset_after_cycles),
            configuration_source: global.configuration_source.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::data_source::DataSourceSpec;

    fn global() -> GlobalConfig {
        GlobalConfig {
            consul_url: "A".to_string(),
            condition_db_url: "ccdb-test.cern.ch:8080".to_string(),
            configuration_source: "json:///etc/qc/basic.json".to_string(),
            ..Default::default()
        }
    }

    fn spec() -> TaskSpec {
        let mut spec = TaskSpec::new(
            "QcTask",
            "QcSkeleton",
            "SkeletonTask",
            "TST",
            10,
            DataSourceSpec::Direct { query: "random:ITS/RAWDATA/0".into() },
        );
        spec.reset_after_cycles = 5;
        spec.save_objects_to_file = "/tmp/qc.root".to_string();
        spec.custom_parameters.insert("myOwnKey".into(), "myOwnValue".into());
        spec
    }

    #[test]
    fn test_endpoints_come_from_global() {
        let config = TaskConfig::merge(&global(), &spec(), None, None);
        assert_eq!(config.consul_url, "A");
        assert_eq!(config.condition_url, "ccdb-test.cern.ch:8080");
        assert_eq!(config.configuration_source, "json:///etc/qc/basic.json");
    }

    #[test]
    fn test_copies_task_fields() {
        let spec = spec();
        let config = TaskConfig::merge(&global(), &spec, None, None);
        assert_eq!(config.task_name, spec.task_name);
        assert_eq!(config.module_name, spec.module_name);
        assert_eq!(config.class_name, spec.class_name);
        assert_eq!(config.detector_name, spec.detector_name);
        assert_eq!(config.cycle_duration_seconds, 10);
        assert_eq!(config.max_number_cycles, -1);
        assert_eq!(config.save_to_file, "/tmp/qc.root");
        assert_eq!(config.custom_parameters, spec.custom_parameters);
    }

    #[test]
    fn test_instance_id() {
        assert_eq!(TaskConfig::merge(&global(), &spec(), None, None).parallel_task_id, 0);
        assert_eq!(TaskConfig::merge(&global(), &spec(), Some(3), None).parallel_task_id, 3);
    }

    #[test]
    fn test_reset_override() {
        assert_eq!(TaskConfig::merge(&global(), &spec(), None, None).reset_after_cycles, 5);
        assert_eq!(TaskConfig::merge(&global(), &spec(), None, Some(1)).reset_after_cycles, 1);
    }

    #[test]
    fn test_merges_do_not_alias() {
        let global = global();
        let spec = spec();
        let mut first = TaskConfig::merge(&global, &spec, Some(1), None);
        let second = TaskConfig::merge(&global, &spec, Some(2), None);
        first.custom_parameters.clear();
        assert_eq!(second.custom_parameters.len(), 1);
        assert_eq!(spec.custom_parameters.len(), 1);
    }
}
