//! Configuration document loading.
//!
//! Reads a base document plus optional overlays, merges them field by field
//! and builds the [`ConfigTree`] the reader works on.

use super::merge::deep_merge_all;
use crate::error::LoadError;
use crate::spec::{InfrastructureSpec, InfrastructureSpecReader};
use crate::tree::ConfigTree;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming the default configuration document.
pub const CONFIG_PATH_ENV: &str = "QC_CONFIG_PATH";

/// Syntax of a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Infer the format from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_lowercase().as_str() {
            "json" => Some(ConfigFormat::Json),
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            _ => None,
        }
    }

    /// Scheme used in configuration source identifiers.
    pub fn scheme(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            ConfigFormat::Yaml => "yaml",
        }
    }

    /// Parse document text. `origin` is only used in error messages.
    pub fn parse(&self, content: &str, origin: &str) -> Result<Value, LoadError> {
        match self {
            ConfigFormat::Json => serde_json::from_str(content).map_err(|source| LoadError::Json {
                path: origin.to_string(),
                source,
            }),
            ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|source| LoadError::Yaml {
                path: origin.to_string(),
                source,
            }),
        }
    }
}

impl std::fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.scheme())
    }
}

/// Identifier recorded as `configurationSource`, e.g. `json:///etc/qc/basic.json`.
pub fn source_identifier(format: ConfigFormat, path: &Path) -> String {
    format!("{}://{}", format.scheme(), path.display())
}

/// A loaded configuration document, ready to be resolved.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Base document, if loaded from disk
    path: Option<PathBuf>,
    /// Overlay documents applied on top of the base, in order
    overlays: Vec<PathBuf>,
    tree: ConfigTree,
    source: String,
}

impl ConfigLoader {
    /// Load a single document.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        Self::load_with_overlays(path, &[])
    }

    /// Load a base document and merge `overlays` on top of it, later overlays
    /// winning. Overlays may use a different format than the base.
    pub fn load_with_overlays(
        path: impl AsRef<Path>,
        overlays: &[PathBuf],
    ) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let (format, base) = read_document(path)?;

        let mut documents = vec![base];
        for overlay in overlays {
            let (_, value) = read_document(overlay)?;
            debug!(overlay = %overlay.display(), "Applying configuration overlay");
            documents.push(value);
        }
        let merged = deep_merge_all(documents);

        Ok(Self {
            path: Some(path.to_path_buf()),
            overlays: overlays.to_vec(),
            tree: ConfigTree::from_json(&merged),
            source: source_identifier(format, path),
        })
    }

    /// Build from in-memory text. `source` becomes the configuration source.
    pub fn from_content(
        content: &str,
        format: ConfigFormat,
        source: impl Into<String>,
    ) -> Result<Self, LoadError> {
        let source = source.into();
        let value = format.parse(content, &source)?;
        Ok(Self {
            path: None,
            overlays: Vec::new(),
            tree: ConfigTree::from_json(&value),
            source,
        })
    }

    /// Path from [`CONFIG_PATH_ENV`], if set.
    pub fn default_path() -> Option<PathBuf> {
        std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from)
    }

    pub fn tree(&self) -> &ConfigTree {
        &self.tree
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn overlays(&self) -> &[PathBuf] {
        &self.overlays
    }

    /// Resolve the loaded tree.
    pub fn resolve(&self) -> Result<InfrastructureSpec, LoadError> {
        Ok(InfrastructureSpecReader::read_infrastructure_spec(
            &self.tree,
            &self.source,
        )?)
    }
}

fn read_document(path: &Path) -> Result<(ConfigFormat, Value), LoadError> {
    let display = path.display().to_string();
    let format = ConfigFormat::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat {
        path: display.clone(),
    })?;
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: display.clone(),
        source,
    })?;
    let value = format.parse(&content, &display)?;
    Ok((format, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const BASE_YAML: &str = r#"
config:
  consul:
    url: consul-test.cern.ch:8500
tasks:
  QcTask:
    className: SkeletonTask
    moduleName: QcSkeleton
    detectorName: TST
    cycleDurationSeconds: 10
    dataSource:
      type: direct
      query: "random:ITS/RAWDATA/0"
"#;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("a/basic.json")), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_path(Path::new("basic.YAML")), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_path(Path::new("basic.yml")), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_path(Path::new("basic.ini")), None);
        assert_eq!(ConfigFormat::from_path(Path::new("basic")), None);
    }

    #[test]
    fn test_source_identifier() {
        assert_eq!(
            source_identifier(ConfigFormat::Json, Path::new("/etc/qc/basic.json")),
            "json:///etc/qc/basic.json"
        );
    }

    #[test]
    fn test_load_yaml_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("qc.yaml");
        std::fs::write(&path, BASE_YAML).unwrap();

        let loader = ConfigLoader::load(&path).unwrap();
        assert!(loader.source().starts_with("yaml://"));
        assert_eq!(loader.path(), Some(path.as_path()));

        let spec = loader.resolve().unwrap();
        assert_eq!(spec.global.consul_url, "consul-test.cern.ch:8500");
        assert_eq!(spec.tasks[0].cycle_duration_seconds, 10);
        assert_eq!(spec.global.configuration_source, loader.source());
    }

    #[test]
    fn test_overlay_overrides_base() {
        let temp = TempDir::new().unwrap();
        let base = temp.path().join("qc.yaml");
        let overlay = temp.path().join("override.json");
        std::fs::write(&base, BASE_YAML).unwrap();
        std::fs::write(
            &overlay,
            r#"{"tasks": {"QcTask": {"cycleDurationSeconds": 60, "active": false}}}"#,
        )
        .unwrap();

        let loader = ConfigLoader::load_with_overlays(&base, &[overlay.clone()]).unwrap();
        assert_eq!(loader.overlays(), &[overlay]);

        let spec = loader.resolve().unwrap();
        let task = spec.task("QcTask").unwrap();
        assert_eq!(task.cycle_duration_seconds, 60);
        assert!(!task.active);
        assert_eq!(task.class_name, "SkeletonTask");
        assert!(spec.global.configuration_source.starts_with("yaml://"));
    }

    #[test]
    fn test_unsupported_extension() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("qc.ini");
        std::fs::write(&path, "[config]").unwrap();
        let err = ConfigLoader::load(&path).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = ConfigLoader::load(temp.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_invalid_json() {
        let err = ConfigLoader::from_content("{ not json", ConfigFormat::Json, "inline").unwrap_err();
        assert!(matches!(err, LoadError::Json { .. }));
    }

    #[test]
    fn test_resolve_error_is_wrapped() {
        let loader = ConfigLoader::from_content("tasks: {}", ConfigFormat::Yaml, "inline").unwrap();
        let err = loader.resolve().unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::MissingSection);
    }
}
