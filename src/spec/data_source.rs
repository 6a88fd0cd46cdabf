//! Data source specifications.
//!
//! A data source is where a task gets its input from. Each kind carries exactly
//! the parameters it needs, so a resolved spec can never be partially filled.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Kind tag of a [`DataSourceSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataSourceType {
    DataSamplingPolicy,
    Direct,
    Task,
    Check,
    Aggregator,
    PostProcessingTask,
    ExternalTask,
    Invalid,
}

/// Surface strings accepted in `dataSource.type`.
///
/// The naming is not uniform with the enum (`dataSamplingPolicy` vs
/// `PostProcessing`), existing documents depend on it.
const SURFACE_NAMES: [(&str, DataSourceType); 7] = [
    ("dataSamplingPolicy", DataSourceType::DataSamplingPolicy),
    ("direct", DataSourceType::Direct),
    ("Task", DataSourceType::Task),
    ("Check", DataSourceType::Check),
    ("Aggregator", DataSourceType::Aggregator),
    ("PostProcessing", DataSourceType::PostProcessingTask),
    ("ExternalTask", DataSourceType::ExternalTask),
];

impl DataSourceType {
    /// Resolve a surface string from a configuration document.
    pub fn from_surface(s: &str) -> Option<Self> {
        SURFACE_NAMES
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, kind)| *kind)
    }

    /// The surface string for this kind. `Invalid` has none.
    pub fn surface_name(&self) -> Option<&'static str> {
        SURFACE_NAMES
            .iter()
            .find(|(_, kind)| kind == self)
            .map(|(name, _)| *name)
    }

    /// All accepted surface strings, in table order.
    pub fn surface_names() -> impl Iterator<Item = &'static str> {
        SURFACE_NAMES.iter().map(|(name, _)| *name)
    }

    /// Parameter keys a data source of this kind must define.
    pub fn required_params(&self) -> &'static [&'static str] {
        match self {
            DataSourceType::Direct => &["query"],
            DataSourceType::ExternalTask => &["name", "query"],
            DataSourceType::DataSamplingPolicy
            | DataSourceType::Task
            | DataSourceType::Check
            | DataSourceType::Aggregator
            | DataSourceType::PostProcessingTask => &["name"],
            DataSourceType::Invalid => &[],
        }
    }
}

impl fmt::Display for DataSourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataSourceType::DataSamplingPolicy => "DataSamplingPolicy",
            DataSourceType::Direct => "Direct",
            DataSourceType::Task => "Task",
            DataSourceType::Check => "Check",
            DataSourceType::Aggregator => "Aggregator",
            DataSourceType::PostProcessingTask => "PostProcessingTask",
            DataSourceType::ExternalTask => "ExternalTask",
            DataSourceType::Invalid => "Invalid",
        };
        f.write_str(name)
    }
}

/// A task's data source. Serialized with the same `type` strings the
/// configuration documents use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DataSourceSpec {
    #[serde(rename = "dataSamplingPolicy")]
    DataSamplingPolicy { name: String },
    #[serde(rename = "direct")]
    Direct { query: String },
    Task { name: String },
    Check { name: String },
    Aggregator { name: String },
    #[serde(rename = "PostProcessing")]
    PostProcessingTask { name: String },
    ExternalTask { name: String, query: String },
    /// Construction-time placeholder, never produced by the reader.
    #[default]
    #[serde(rename = "invalid")]
    Invalid,
}

impl DataSourceSpec {
    pub fn kind(&self) -> DataSourceType {
        match self {
            DataSourceSpec::DataSamplingPolicy { .. } => DataSourceType::DataSamplingPolicy,
            DataSourceSpec::Direct { .. } => DataSourceType::Direct,
            DataSourceSpec::Task { .. } => DataSourceType::Task,
            DataSourceSpec::Check { .. } => DataSourceType::Check,
            DataSourceSpec::Aggregator { .. } => DataSourceType::Aggregator,
            DataSourceSpec::PostProcessingTask { .. } => DataSourceType::PostProcessingTask,
            DataSourceSpec::ExternalTask { .. } => DataSourceType::ExternalTask,
            DataSourceSpec::Invalid => DataSourceType::Invalid,
        }
    }

    /// The `name` parameter, for kinds that have one.
    pub fn name(&self) -> Option<&str> {
        match self {
            DataSourceSpec::DataSamplingPolicy { name }
            | DataSourceSpec::Task { name }
            | DataSourceSpec::Check { name }
            | DataSourceSpec::Aggregator { name }
            | DataSourceSpec::PostProcessingTask { name }
            | DataSourceSpec::ExternalTask { name, .. } => Some(name),
            DataSourceSpec::Direct { .. } | DataSourceSpec::Invalid => None,
        }
    }

    /// The `query` parameter, for kinds that have one.
    pub fn query(&self) -> Option<&str> {
        match self {
            DataSourceSpec::Direct { query } | DataSourceSpec::ExternalTask { query, .. } => {
                Some(query)
            }
            _ => None,
        }
    }

    /// Flat parameter view. The key set is exactly `kind().required_params()`.
    pub fn params(&self) -> BTreeMap<&'static str, &str> {
        let mut params = BTreeMap::new();
        if let Some(name) = self.name() {
            params.insert("name", name);
        }
        if let Some(query) = self.query() {
            params.insert("query", query);
        }
        params
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, DataSourceSpec::Invalid)
    }
}
