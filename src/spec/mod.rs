//! Typed infrastructure specs and their resolution.
//!
//! - [`reader`] turns a [`ConfigTree`](crate::tree::ConfigTree) into an
//!   [`InfrastructureSpec`]
//! - [`TaskConfig::merge`] combines global and per-task settings for one run
//! - [`instantiate`] expands a task into its parallel instances

pub mod data_source;
pub mod global;
pub mod infrastructure;
pub mod instantiate;
pub mod reader;
pub mod task;
pub mod task_config;

pub use data_source::{DataSourceSpec, DataSourceType};
pub use global::{DEFAULT_INFOLOGGER_DISCARD_LEVEL, GlobalConfig};
pub use infrastructure::InfrastructureSpec;
pub use instantiate::instantiate;
pub use reader::InfrastructureSpecReader;
pub use task::{DEFAULT_MERGING_MODE, TaskLocation, TaskSpec, UNLIMITED_CYCLES};
pub use task_config::TaskConfig;
