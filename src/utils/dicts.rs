//! Helpers for JSON object handling.

use serde_json::Value;

/// Merge `overlay` into `base`.
///
/// Only keys already present in `base` are taken. Nested objects are merged
/// recursively, every other value is replaced.
pub fn merge(base: &mut Value, overlay: &Value) {
    let (Value::Object(base), Value::Object(overlay)) = (base, overlay) else {
        return;
    };

    for (key, value) in overlay {
        let Some(target) = base.get_mut(key) else {
            continue;
        };

        if target.is_object() {
            merge(target, value);
        } else {
            *target = value.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_known_keys_only() {
        let mut base = json!({"a": 1, "b": {"c": 2, "d": 3}});
        merge(&mut base, &json!({"a": 10, "b": {"c": 20, "x": 1}, "y": 2}));
        assert_eq!(base, json!({"a": 10, "b": {"c": 20, "d": 3}}));
    }

    #[test]
    fn test_merge_keeps_objects_against_scalars() {
        let mut base = json!({"b": {"c": 2}, "list": [1, 2]});
        merge(&mut base, &json!({"b": "flat", "list": [3]}));
        assert_eq!(base, json!({"b": {"c": 2}, "list": [3]}));
    }
}
