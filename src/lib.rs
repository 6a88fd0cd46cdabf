//! QC Infrastructure Spec Library
//!
//! Resolves hierarchical configuration documents into typed global, task and
//! data-source specs, and merges them into per-instance task configurations.

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod spec;
pub mod tree;

pub use error::{ErrorCode, LoadError, SpecError, SpecWarning};
pub use spec::{
    DataSourceSpec, DataSourceType, GlobalConfig, InfrastructureSpec, InfrastructureSpecReader,
    TaskConfig, TaskLocation, TaskSpec,
};
pub use tree::ConfigTree;
