//! RFC 7396 JSON Merge Patch, used to layer config files.

use serde_json::{Map, Value};

/// Apply `patch` on top of `target`.
///
/// Objects merge key by key, `null` removes a key, and anything else in the
/// patch (arrays included) replaces the target value wholesale.
///
/// ```
/// use serde_json::json;
/// use flatten_config::merge::merge_patch;
///
/// let global = json!({"include_dirs": ["/usr/include"], "logging": {"level": "info"}});
/// let local = json!({"include_dirs": ["vendor"], "max_depth": 32});
/// assert_eq!(
///     merge_patch(global, local),
///     json!({"include_dirs": ["vendor"], "max_depth": 32, "logging": {"level": "info"}})
/// );
/// ```
pub fn merge_patch(target: Value, patch: Value) -> Value {
    let Value::Object(patch_map) = patch else {
        return patch;
    };
    let mut merged = match target {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    for (key, value) in patch_map {
        if value.is_null() {
            merged.remove(&key);
        } else {
            let base = merged.remove(&key).unwrap_or(Value::Null);
            merged.insert(key, merge_patch(base, value));
        }
    }
    Value::Object(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn local_keys_override_global() {
        let result = merge_patch(
            json!({"max_depth": 10, "truncate_output": true}),
            json!({"max_depth": 3}),
        );
        assert_eq!(result, json!({"max_depth": 3, "truncate_output": true}));
    }

    #[test]
    fn nested_objects_merge() {
        let result = merge_patch(
            json!({"logging": {"level": "info", "extra": 1}}),
            json!({"logging": {"level": "debug"}}),
        );
        assert_eq!(result, json!({"logging": {"level": "debug", "extra": 1}}));
    }

    #[test]
    fn include_dir_arrays_replace() {
        let result = merge_patch(
            json!({"include_dirs": ["a", "b"]}),
            json!({"include_dirs": ["c"]}),
        );
        assert_eq!(result, json!({"include_dirs": ["c"]}));
    }

    #[test]
    fn null_removes_key() {
        let result = merge_patch(
            json!({"max_depth": 10, "include_dirs": ["a"]}),
            json!({"max_depth": null}),
        );
        assert_eq!(result, json!({"include_dirs": ["a"]}));
    }

    #[test]
    fn object_patch_over_scalar_starts_fresh() {
        let result = merge_patch(
            json!({"logging": "loud"}),
            json!({"logging": {"level": "warn", "gone": null}}),
        );
        assert_eq!(result, json!({"logging": {"level": "warn"}}));
    }

    #[test]
    fn scalar_patch_replaces_object() {
        assert_eq!(merge_patch(json!({"a": {"b": 1}}), json!(7)), json!(7));
    }

    proptest! {
        #[test]
        fn prop_empty_patch_is_identity(target in arb_object(true)) {
            prop_assert_eq!(merge_patch(target.clone(), json!({})), target);
        }

        // Holds only for patches without nulls; a null marker is consumed on first use.
        #[test]
        fn prop_idempotent_merge(target in arb_object(true), patch in arb_object(false)) {
            let once = merge_patch(target, patch.clone());
            let twice = merge_patch(once.clone(), patch);
            prop_assert_eq!(once, twice);
        }
    }

    fn arb_object(with_nulls: bool) -> impl Strategy<Value = Value> {
        prop::collection::hash_map("[a-z]{1,3}", arb_value(with_nulls), 0..5)
            .prop_map(|m| Value::Object(m.into_iter().collect()))
    }

    fn arb_value(with_nulls: bool) -> BoxedStrategy<Value> {
        let leaf = prop_oneof![
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| Value::Number(n.into())),
            "[a-z]{0,10}".prop_map(Value::String),
        ];
        let tree = leaf.prop_recursive(2, 8, 3, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..3).prop_map(Value::Array),
                prop::collection::hash_map("[a-z]{1,2}", inner, 0..3)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        });
        if with_nulls {
            prop_oneof![1 => Just(Value::Null), 4 => tree].boxed()
        } else {
            tree.boxed()
        }
    }
}
