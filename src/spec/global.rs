//! Process-wide settings shared by every task of one run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default infologger discard level.
pub const DEFAULT_INFOLOGGER_DISCARD_LEVEL: i32 = 21;

/// Global settings read from the `config` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalConfig {
    /// Repository endpoint settings, one entry per `database.*` key.
    #[serde(default)]
    pub database: BTreeMap<String, String>,

    #[serde(default)]
    pub activity_number: u64,

    #[serde(default)]
    pub activity_type: String,

    #[serde(default)]
    pub monitoring_url: String,

    #[serde(default)]
    pub consul_url: String,

    #[serde(default, rename = "conditionDBUrl")]
    pub condition_db_url: String,

    #[serde(default)]
    pub infologger_filter_discard_debug: bool,

    #[serde(default = "default_discard_level")]
    pub infologger_discard_level: i32,

    /// Where the configuration came from. Kept for traceability only.
    #[serde(default)]
    pub configuration_source: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            database: BTreeMap::new(),
            activity_number: 0,
            activity_type: String::new(),
            monitoring_url: String::new(),
            consul_url: String::new(),
            condition_db_url: String::new(),
            infologger_filter_discard_debug: false,
            infologger_discard_level: default_discard_level(),
            configuration_source: String::new(),
        }
    }
}

fn default_discard_level() -> i32 {
    DEFAULT_INFOLOGGER_DISCARD_LEVEL
}
