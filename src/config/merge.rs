//! Deep merge of configuration documents.
//!
//! Overlay documents are merged field by field on top of the base document
//! before the tree is built. Arrays are replaced entirely, not concatenated.

use serde_json::Value;

/// Deep merge two JSON values, with `overlay` taking precedence over `base`.
///
/// - Objects are merged recursively: keys in overlay override keys in base,
///   new keys are appended after the existing ones
/// - Arrays, strings, numbers, booleans are replaced entirely
/// - If overlay is null, the base value is preserved (null means "not specified")
///
/// # Example
/// ```
/// use serde_json::json;
/// use qc_infra::config::deep_merge;
///
/// let base = json!({
///     "config": { "consul": { "url": "consul:8500" } },
///     "tasks": { "QcTask": { "cycleDurationSeconds": 10 } }
/// });
/// let overlay = json!({
///     "tasks": { "QcTask": { "cycleDurationSeconds": 60 } }
/// });
/// let merged = deep_merge(base, overlay);
/// assert_eq!(merged["tasks"]["QcTask"]["cycleDurationSeconds"], 60);
/// assert_eq!(merged["config"]["consul"]["url"], "consul:8500");
/// ```
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                // Replace in place so a key keeps its position in the base document
                match base_map.get_mut(&key) {
                    Some(base_value) => {
                        let merged = deep_merge(base_value.take(), overlay_value);
                        *base_value = merged;
                    }
                    None => {
                        base_map.insert(key, overlay_value);
                    }
                }
            }
            Value::Object(base_map)
        }
        (base, Value::Null) => base,
        (_, overlay) => overlay,
    }
}

/// Merge multiple values in order, with later values taking precedence.
pub fn deep_merge_all(values: impl IntoIterator<Item = Value>) -> Value {
    values.into_iter().fold(Value::Null, deep_merge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_simple_objects() {
        let base = json!({"a": 1, "b": 2});
        let overlay = json!({"b": 3, "c": 4});
        let result = deep_merge(base, overlay);
        assert_eq!(result, json!({"a": 1, "b": 3, "c": 4}));
    }

    #[test]
    fn test_merge_nested_task() {
        let base = json!({
            "tasks": {
                "QcTask": {"className": "SkeletonTask", "cycleDurationSeconds": 10}
            }
        });
        let overlay = json!({
            "tasks": {"QcTask": {"cycleDurationSeconds": 60}}
        });
        let result = deep_merge(base, overlay);
        assert_eq!(
            result,
            json!({
                "tasks": {
                    "QcTask": {"className": "SkeletonTask", "cycleDurationSeconds": 60}
                }
            })
        );
    }

    #[test]
    fn test_arrays_replaced_not_merged() {
        let base = json!({"localMachines": ["flp001", "flp002"]});
        let overlay = json!({"localMachines": ["flp003"]});
        let result = deep_merge(base, overlay);
        assert_eq!(result, json!({"localMachines": ["flp003"]}));
    }

    #[test]
    fn test_null_preserves_base() {
        let base = json!({"a": 1, "b": {"c": 2}});
        let overlay = json!({"a": null, "b": {"c": null}});
        let result = deep_merge(base, overlay);
        assert_eq!(result, json!({"a": 1, "b": {"c": 2}}));
    }

    #[test]
    fn test_key_order_kept() {
        let base = json!({"first": 1, "second": 2});
        let overlay = json!({"third": 3, "first": 10});
        let result = deep_merge(base, overlay);
        let keys: Vec<&String> = result.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["first", "second", "third"]);
        assert_eq!(result["first"], 10);
    }

    #[test]
    fn test_merge_all() {
        let values = vec![json!({"a": 1}), json!({"b": 2}), json!({"a": 3, "c": 4})];
        let result = deep_merge_all(values);
        assert_eq!(result, json!({"a": 3, "b": 2, "c": 4}));
    }

    #[test]
    fn test_overlay_replaces_primitive_with_object() {
        let base = json!({"value": 42});
        let overlay = json!({"value": {"nested": true}});
        let result = deep_merge(base, overlay);
        assert_eq!(result, json!({"value": {"nested": true}}));
    }
}
