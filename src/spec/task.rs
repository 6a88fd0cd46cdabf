//! Declarative description of one task.

use super::data_source::DataSourceSpec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// `maxNumberCycles` value meaning "run until stopped".
pub const UNLIMITED_CYCLES: i32 = -1;

/// Merging mode used when `mergingMode` is not given.
pub const DEFAULT_MERGING_MODE: &str = "delta";

/// Where a task runs in a multi-node setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskLocation {
    /// Next to the data source, one instance per local machine.
    Local,
    /// On a single remote machine (default).
    #[default]
    Remote,
}

const LOCATION_NAMES: [(&str, TaskLocation); 2] =
    [("local", TaskLocation::Local), ("remote", TaskLocation::Remote)];

impl TaskLocation {
    pub fn from_str(s: &str) -> Option<Self> {
        LOCATION_NAMES
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, location)| *location)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskLocation::Local => "local",
            TaskLocation::Remote => "remote",
        }
    }

    /// Accepted surface strings.
    pub fn names() -> [&'static str; 2] {
        [LOCATION_NAMES[0].0, LOCATION_NAMES[1].0]
    }
}

impl fmt::Display for TaskLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the `tasks` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSpec {
    // identity
    pub task_name: String,
    pub module_name: String,
    pub class_name: String,
    pub detector_name: String,

    // scheduling
    pub cycle_duration_seconds: u32,
    /// [`UNLIMITED_CYCLES`] unless set.
    pub max_number_cycles: i32,
    /// 0 means never reset.
    pub reset_after_cycles: u32,

    pub active: bool,
    pub data_source: DataSourceSpec,
    pub custom_parameters: BTreeMap<String, String>,
    /// Empty when disabled.
    pub save_objects_to_file: String,

    // multinode placement
    pub location: TaskLocation,
    pub local_machines: Vec<String>,
    pub remote_machine: Option<String>,
    pub remote_port: Option<u16>,
    pub merging_mode: String,
    pub merger_cycle_multiplier: i32,
}

impl TaskSpec {
    /// Create a spec from its mandatory fields. Everything else takes its default.
    pub fn new(
        task_name: impl Into<String>,
        module_name: impl Into<String>,
        class_name: impl Into<String>,
        detector_name: impl Into<String>,
        cycle_duration_seconds: u32,
        data_source: DataSourceSpec,
    ) -> Self {
        Self {
            task_name: task_name.into(),
            module_name: module_name.into(),
            class_name: class_name.into(),
            detector_name: detector_name.into(),
            cycle_duration_seconds,
            max_number_cycles: UNLIMITED_CYCLES,
            reset_after_cycles: 0,
            active: true,
            data_source,
            custom_parameters: BTreeMap::new(),
            save_objects_to_file: String::new(),
            location: TaskLocation::default(),
            local_machines: Vec::new(),
            remote_machine: None,
            remote_port: None,
            merging_mode: DEFAULT_MERGING_MODE.to_string(),
            merger_cycle_multiplier: 1,
        }
    }

    pub fn has_unlimited_cycles(&self) -> bool {
        self.max_number_cycles < 0
    }

    pub fn saves_objects(&self) -> bool {
        !self.save_objects_to_file.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skeleton() -> TaskSpec {
        TaskSpec::new(
            "QcTask",
            "QcSkeleton",
            "o2::quality_control_modules::skeleton::SkeletonTask",
            "TST",
            10,
            DataSourceSpec::DataSamplingPolicy { name: "tst-raw".into() },
        )
    }

    #[test]
    fn test_new_applies_defaults() {
        let spec = skeleton();
        assert!(spec.active);
        assert!(spec.has_unlimited_cycles());
        assert_eq!(spec.reset_after_cycles, 0);
        assert_eq!(spec.location, TaskLocation::Remote);
        assert_eq!(spec.merging_mode, "delta");
        assert_eq!(spec.merger_cycle_multiplier, 1);
        assert!(!spec.saves_objects());
        assert!(spec.remote_machine.is_none());
    }

    #[test]
    fn test_location_names() {
        assert_eq!(TaskLocation::from_str("local"), Some(TaskLocation::Local));
        assert_eq!(TaskLocation::from_str("remote"), Some(TaskLocation::Remote));
        assert_eq!(TaskLocation::from_str("Remote"), None);
        assert_eq!(TaskLocation::names(), ["local", "remote"]);
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(skeleton()).unwrap();
        assert_eq!(json["taskName"], "QcTask");
        assert_eq!(json["cycleDurationSeconds"], 10);
        assert_eq!(json["location"], "remote");
        assert_eq!(json["dataSource"]["type"], "dataSamplingPolicy");
    }
}
