//! Generic configuration tree.
//!
//! The reader never looks at JSON or YAML directly. Documents are first turned
//! into a [`ConfigTree`]: ordered children keyed by name, optional string leaves,
//! and `.`-separated path lookup. Arrays become children with empty keys.
//! A null is kept as a marker node that every lookup treats as absent.

use crate::error::{SpecError, SpecResult};
use serde_json::Value;

/// Separator used by path lookups (`"infologger.filterDiscardLevel"`).
pub const PATH_SEPARATOR: char = '.';

/// A node of a hierarchical key/value document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigTree {
    value: Option<String>,
    children: Vec<(String, ConfigTree)>,
    null: bool,
}

/// Conversion from a string leaf into a typed scalar.
pub trait FromLeaf: Sized {
    /// Human readable name of the target type, used in conversion errors.
    const EXPECTED: &'static str;

    fn from_leaf(raw: &str) -> Option<Self>;
}

impl FromLeaf for String {
    const EXPECTED: &'static str = "string";

    fn from_leaf(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }
}

impl FromLeaf for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_leaf(raw: &str) -> Option<Self> {
        match raw.trim() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        }
    }
}

macro_rules! impl_from_leaf_int {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl FromLeaf for $ty {
                const EXPECTED: &'static str = $name;

                fn from_leaf(raw: &str) -> Option<Self> {
                    raw.trim().parse().ok()
                }
            }
        )*
    };
}

impl_from_leaf_int! {
    i32 => "32-bit integer",
    i64 => "64-bit integer",
    u16 => "16-bit unsigned integer",
    u32 => "32-bit unsigned integer",
    u64 => "64-bit unsigned integer",
}

impl ConfigTree {
    /// Create an empty node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a leaf node holding `value`.
    pub fn leaf(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Create a node standing for an explicit null.
    pub fn null() -> Self {
        Self {
            null: true,
            ..Self::default()
        }
    }

    /// Whether this node is an explicit null.
    pub fn is_null(&self) -> bool {
        self.null
    }

    /// Append a child, builder style.
    pub fn with_child(mut self, key: impl Into<String>, child: ConfigTree) -> Self {
        self.push_child(key, child);
        self
    }

    /// Append a leaf child, builder style.
    pub fn with_leaf(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_child(key, ConfigTree::leaf(value))
    }

    /// Append a child. Duplicate keys are kept; lookups return the first one.
    pub fn push_child(&mut self, key: impl Into<String>, child: ConfigTree) {
        self.children.push((key.into(), child));
    }

    /// The leaf value of this node, if any.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Children in document order, null children included.
    pub fn children(&self) -> impl Iterator<Item = (&str, &ConfigTree)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Look up a descendant by `.`-separated path. A null node is not found.
    pub fn get_child(&self, path: &str) -> Option<&ConfigTree> {
        path.split(PATH_SEPARATOR).try_fold(self, |node, segment| {
            node.children
                .iter()
                .find(|(key, _)| key == segment)
                .map(|(_, child)| child)
                .filter(|child| !child.is_null())
        })
    }

    /// Whether a non-null node exists at `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.get_child(path).is_some()
    }

    /// Read and convert the leaf at `path`.
    ///
    /// Returns `Ok(None)` when the path is absent or holds a null. A present
    /// value that cannot be converted, or a subtree where a scalar is expected,
    /// is a [`SpecError::TypeConversion`].
    pub fn get<T: FromLeaf>(&self, path: &str) -> SpecResult<Option<T>> {
        let Some(node) = self.get_child(path) else {
            return Ok(None);
        };
        match node.value() {
            Some(raw) => T::from_leaf(raw).map(Some).ok_or_else(|| SpecError::TypeConversion {
                path: path.to_string(),
                value: raw.to_string(),
                expected: T::EXPECTED,
            }),
            None if node.is_empty() => Ok(None),
            None => Err(SpecError::TypeConversion {
                path: path.to_string(),
                value: "<subtree>".to_string(),
                expected: T::EXPECTED,
            }),
        }
    }

    /// Read the leaf at `path`, falling back to `default` when absent.
    pub fn get_or<T: FromLeaf>(&self, path: &str, default: T) -> SpecResult<T> {
        Ok(self.get(path)?.unwrap_or(default))
    }

    /// Read a mandatory leaf. `context` names the owner in the error message.
    pub fn require<T: FromLeaf>(&self, path: &str, context: &str) -> SpecResult<T> {
        self.get(path)?
            .ok_or_else(|| SpecError::missing_key(path, context))
    }

    /// Build a tree from a JSON value, keeping object key order.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self {
                children: map
                    .iter()
                    .map(|(k, v)| (k.clone(), Self::from_json(v)))
                    .collect(),
                ..Self::default()
            },
            Value::Array(items) => Self {
                children: items
                    .iter()
                    .map(|v| (String::new(), Self::from_json(v)))
                    .collect(),
                ..Self::default()
            },
            Value::String(s) => Self::leaf(s.as_str()),
            Value::Number(n) => Self::leaf(n.to_string()),
            Value::Bool(b) => Self::leaf(b.to_string()),
            // null means "not specified"
            Value::Null => Self::null(),
        }
    }
}

impl From<&Value> for ConfigTree {
    fn from(value: &Value) -> Self {
        Self::from_json(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ConfigTree {
        ConfigTree::from_json(&json!({
            "config": {
                "infologger": { "filterDiscardDebug": "1", "filterDiscardLevel": 11 },
                "monitoring": { "url": "infologger:///debug?qc" }
            },
            "machines": ["alio2-cr1-flp001", "alio2-cr1-flp002"],
            "nothing": null
        }))
    }

    #[test]
    fn test_path_lookup() {
        let tree = sample();
        assert_eq!(
            tree.get::<String>("config.monitoring.url").unwrap(),
            Some("infologger:///debug?qc".to_string())
        );
        assert!(tree.contains("config.infologger"));
        assert!(!tree.contains("config.consul.url"));
    }

    #[test]
    fn test_numbers_and_bools_become_leaves() {
        let tree = sample();
        assert_eq!(tree.get::<i32>("config.infologger.filterDiscardLevel").unwrap(), Some(11));
        assert_eq!(tree.get::<bool>("config.infologger.filterDiscardDebug").unwrap(), Some(true));
    }

    #[test]
    fn test_array_children_keep_order_with_empty_keys() {
        let tree = sample();
        let machines: Vec<(&str, Option<&str>)> = tree
            .get_child("machines")
            .unwrap()
            .children()
            .map(|(k, v)| (k, v.value()))
            .collect();
        assert_eq!(
            machines,
            vec![("", Some("alio2-cr1-flp001")), ("", Some("alio2-cr1-flp002"))]
        );
    }

    #[test]
    fn test_null_reads_as_absent() {
        let tree = sample();
        assert!(!tree.contains("nothing"));
        assert!(tree.get_child("nothing").is_none());
        assert_eq!(tree.get::<String>("nothing").unwrap(), None);
        assert_eq!(tree.get_or("nothing", 5u32).unwrap(), 5);
    }

    #[test]
    fn test_null_differs_from_empty_object() {
        let tree = ConfigTree::from_json(&json!({ "empty": {}, "nothing": null }));
        assert!(tree.contains("empty"));
        assert!(!tree.contains("nothing"));
        assert_eq!(tree.len(), 2);
        assert!(tree.children().any(|(key, child)| key == "nothing" && child.is_null()));
    }

    #[test]
    fn test_lookup_does_not_descend_through_null() {
        let tree = ConfigTree::new().with_child("config", ConfigTree::null());
        assert!(tree.get_child("config.consul").is_none());
        assert_eq!(tree.get::<String>("config.consul.url").unwrap(), None);
    }

    #[test]
    fn test_conversion_failure() {
        let tree = ConfigTree::new().with_leaf("port", "eighty");
        let err = tree.get::<u16>("port").unwrap_err();
        assert_eq!(
            err,
            SpecError::TypeConversion {
                path: "port".to_string(),
                value: "eighty".to_string(),
                expected: "16-bit unsigned integer",
            }
        );
    }

    #[test]
    fn test_subtree_where_scalar_expected() {
        let tree = sample();
        assert!(matches!(
            tree.get::<String>("config.monitoring"),
            Err(SpecError::TypeConversion { .. })
        ));
    }

    #[test]
    fn test_require_reports_context() {
        let tree = ConfigTree::new();
        let err = tree.require::<String>("className", "task 'skeleton'").unwrap_err();
        assert_eq!(err, SpecError::missing_key("className", "task 'skeleton'"));
    }

    #[test]
    fn test_duplicate_keys_first_wins() {
        let tree = ConfigTree::new().with_leaf("a", "1").with_leaf("a", "2");
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.get::<i32>("a").unwrap(), Some(1));
    }
}
