//! Resolution of a configuration tree into typed specs.
//!
//! The reader is stateless: every function is a pure transformation of the
//! tree it is given, so the same tree always resolves to the same value.

use super::data_source::{DataSourceSpec, DataSourceType};
use super::global::GlobalConfig;
use super::infrastructure::InfrastructureSpec;
use super::task::{DEFAULT_MERGING_MODE, TaskLocation, TaskSpec, UNLIMITED_CYCLES};
use crate::error::{SpecError, SpecResult, SpecWarning};
use crate::tree::ConfigTree;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info, warn};

/// Mandatory top-level section holding the global settings.
pub const CONFIG_SECTION: &str = "config";

/// Optional top-level section holding one subtree per task.
pub const TASKS_SECTION: &str = "tasks";

/// Reads `InfrastructureSpec`, `GlobalConfig` and `TaskSpec` from a tree.
pub struct InfrastructureSpecReader;

impl InfrastructureSpecReader {
    /// Read the whole document.
    ///
    /// `source` identifies where the tree came from and ends up in
    /// `GlobalConfig::configuration_source`.
    pub fn read_infrastructure_spec(
        tree: &ConfigTree,
        source: &str,
    ) -> SpecResult<InfrastructureSpec> {
        let config = tree
            .get_child(CONFIG_SECTION)
            .ok_or_else(|| SpecError::missing_section(CONFIG_SECTION))?;
        let global = Self::read_global_config(config, source)?;

        let mut tasks = Vec::new();
        let mut warnings = Vec::new();
        if let Some(tasks_tree) = tree.get_child(TASKS_SECTION) {
            tasks.reserve(tasks_tree.len());
            let mut seen = HashSet::new();
            let declared = tasks_tree.children().filter(|(_, task_tree)| !task_tree.is_null());
            for (name, task_tree) in declared {
                if !seen.insert(name) {
                    return Err(SpecError::DuplicateTask {
                        name: name.to_string(),
                    });
                }
                let (task, task_warnings) = Self::read_task_spec_with_warnings(name, task_tree)?;
                tasks.push(task);
                warnings.extend(task_warnings);
            }
        }

        info!(
            source = %source,
            tasks = tasks.len(),
            warnings = warnings.len(),
            "Resolved infrastructure spec"
        );

        Ok(InfrastructureSpec {
            global,
            tasks,
            warnings,
        })
    }

    /// Read the global settings from the `config` subtree.
    ///
    /// No key is mandatory; anything absent keeps its default.
    pub fn read_global_config(config: &ConfigTree, source: &str) -> SpecResult<GlobalConfig> {
        let defaults = GlobalConfig::default();

        Ok(GlobalConfig {
            database: Self::read_string_map(config, "database"),
            activity_number: config.get_or("Activity.number", defaults.activity_number)?,
            activity_type: config.get_or("Activity.type", defaults.activity_type)?,
            monitoring_url: config.get_or("monitoring.url", defaults.monitoring_url)?,
            consul_url: config.get_or("consul.url", defaults.consul_url)?,
            condition_db_url: config.get_or("conditionDB.url", defaults.condition_db_url)?,
            infologger_filter_discard_debug: config.get_or(
                "infologger.filterDiscardDebug",
                defaults.infologger_filter_discard_debug,
            )?,
            infologger_discard_level: config.get_or(
                "infologger.filterDiscardLevel",
                defaults.infologger_discard_level,
            )?,
            configuration_source: source.to_string(),
        })
    }

    /// Read one task. Topology warnings are logged and dropped; use
    /// [`read_infrastructure_spec`](Self::read_infrastructure_spec) to collect them.
    pub fn read_task_spec(name: &str, task: &ConfigTree) -> SpecResult<TaskSpec> {
        Self::read_task_spec_with_warnings(name, task).map(|(spec, _)| spec)
    }

    /// Read one task and return the non-fatal findings alongside it.
    pub fn read_task_spec_with_warnings(
        name: &str,
        task: &ConfigTree,
    ) -> SpecResult<(TaskSpec, Vec<SpecWarning>)> {
        if name.is_empty() {
            return Err(SpecError::InvalidValue {
                field: TASKS_SECTION.to_string(),
                value: String::new(),
                reason: "task name cannot be empty".to_string(),
            });
        }
        let context = format!("task '{}'", name);

        let class_name: String = task.require("className", &context)?;
        let module_name: String = task.require("moduleName", &context)?;
        let detector_name: String = task.require("detectorName", &context)?;
        let cycle_duration_seconds = Self::read_cycle_duration(task, &context)?;
        let data_source = match task.get_child("dataSource") {
            Some(tree) => read_data_source_spec(tree)?,
            None => return Err(SpecError::missing_key("dataSource", context)),
        };

        let location_value = task.get::<String>("location")?;
        let multinode = location_value.is_some();
        let location = match location_value {
            Some(value) => TaskLocation::from_str(&value).ok_or_else(|| {
                SpecError::unknown_value("location", &value, &TaskLocation::names())
            })?,
            None => TaskLocation::default(),
        };

        let remote_machine = task.get::<String>("remoteMachine")?;
        let remote_port = task.get::<u16>("remotePort")?;

        let mut warnings = Vec::new();
        if multinode && remote_machine.is_none() {
            warnings.push(SpecWarning::MissingRemoteMachine {
                task: name.to_string(),
            });
        }
        if multinode && remote_port.is_none() {
            warnings.push(SpecWarning::MissingRemotePort {
                task: name.to_string(),
            });
        }
        for warning in &warnings {
            warn!(task = %name, "{}", warning);
        }

        let spec = TaskSpec {
            task_name: name.to_string(),
            module_name,
            class_name,
            detector_name,
            cycle_duration_seconds,
            max_number_cycles: task.get_or("maxNumberCycles", UNLIMITED_CYCLES)?,
            reset_after_cycles: task.get_or("resetAfterCycles", 0)?,
            active: task.get_or("active", true)?,
            data_source,
            custom_parameters: Self::read_string_map(task, "taskParameters"),
            save_objects_to_file: task.get_or("saveObjectsToFile", String::new())?,
            location,
            local_machines: Self::read_string_list(task, "localMachines"),
            remote_machine,
            remote_port,
            merging_mode: task.get_or("mergingMode", DEFAULT_MERGING_MODE.to_string())?,
            merger_cycle_multiplier: task.get_or("mergerCycleMultiplier", 1)?,
        };

        debug!(
            task = %spec.task_name,
            data_source = %spec.data_source.kind(),
            location = %spec.location,
            "Resolved task spec"
        );

        Ok((spec, warnings))
    }

    fn read_cycle_duration(task: &ConfigTree, context: &str) -> SpecResult<u32> {
        let raw: i64 = task.require("cycleDurationSeconds", context)?;
        if raw <= 0 {
            return Err(SpecError::InvalidValue {
                field: "cycleDurationSeconds".to_string(),
                value: raw.to_string(),
                reason: format!("must be positive for {}", context),
            });
        }
        u32::try_from(raw).map_err(|_| SpecError::InvalidValue {
            field: "cycleDurationSeconds".to_string(),
            value: raw.to_string(),
            reason: format!("too large for {}", context),
        })
    }

    /// Collect `path.*` leaves into a map. An absent subtree yields an empty map.
    fn read_string_map(tree: &ConfigTree, path: &str) -> BTreeMap<String, String> {
        let Some(subtree) = tree.get_child(path) else {
            return BTreeMap::new();
        };
        subtree
            .children()
            .filter(|(_, child)| !child.is_null())
            .map(|(key, child)| (key.to_string(), leaf_value(child, path, key)))
            .collect()
    }

    /// Collect `path.*` leaves in order, ignoring keys.
    fn read_string_list(tree: &ConfigTree, path: &str) -> Vec<String> {
        let Some(subtree) = tree.get_child(path) else {
            return Vec::new();
        };
        subtree
            .children()
            .filter(|(_, child)| !child.is_null())
            .map(|(key, child)| leaf_value(child, path, key))
            .collect()
    }
}

/// The string held by a free-form entry. Nested nodes carry no data of their
/// own and read as an empty string.
fn leaf_value(node: &ConfigTree, parent: &str, key: &str) -> String {
    match node.value() {
        Some(value) => value.to_string(),
        None => {
            if !node.is_empty() {
                warn!(path = %format!("{}.{}", parent, key), "Nested value read as empty string");
            }
            String::new()
        }
    }
}

/// Read a `dataSource` subtree. Only the parameters its kind requires are
/// extracted; any other keys are ignored.
fn read_data_source_spec(tree: &ConfigTree) -> SpecResult<DataSourceSpec> {
    let type_name: String = tree.require("type", "dataSource")?;
    let kind = DataSourceType::from_surface(&type_name).ok_or_else(|| {
        let expected: Vec<&str> = DataSourceType::surface_names().collect();
        SpecError::unknown_value("dataSource.type", &type_name, &expected)
    })?;

    let context = format!("data source of type {}", kind);
    let param = |key: &str| tree.require::<String>(key, &context);

    let spec = match kind {
        DataSourceType::DataSamplingPolicy => DataSourceSpec::DataSamplingPolicy { name: param("name")? },
        DataSourceType::Direct => DataSourceSpec::Direct { query: param("query")? },
        DataSourceType::Task => DataSourceSpec::Task { name: param("name")? },
        DataSourceType::Check => DataSourceSpec::Check { name: param("name")? },
        DataSourceType::Aggregator => DataSourceSpec::Aggregator { name: param("name")? },
        DataSourceType::PostProcessingTask => {
            DataSourceSpec::PostProcessingTask { name: param("name")? }
        }
        DataSourceType::ExternalTask => DataSourceSpec::ExternalTask {
            name: param("name")?,
            query: param("query")?,
        },
        // not in the surface table
        DataSourceType::Invalid => DataSourceSpec::Invalid,
    };
    Ok(spec)
}
