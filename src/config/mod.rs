//! Configuration document loading.
//!
//! A run is described by one base document (JSON or YAML) and any number of
//! overlay documents merged on top of it field by field:
//! - Objects are merged key by key, later documents winning
//! - Arrays and scalars are replaced entirely
//! - `null` in an overlay leaves the base value untouched
//!
//! ## Environment Variables
//! - `QC_CONFIG_PATH` - Default base document for the CLI

mod loader;
mod merge;

pub use loader::{CONFIG_PATH_ENV, ConfigFormat, ConfigLoader, source_identifier};
pub use merge::{deep_merge, deep_merge_all};
