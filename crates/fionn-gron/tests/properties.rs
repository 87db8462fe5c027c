// SPDX-License-Identifier: MIT OR Apache-2.0
//! Universal properties for the flatten projection.

use proptest::prelude::*;
use serde_json::Value;

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i32>().prop_map(Value::from),
        "[a-zA-Z0-9 ]{0,8}".prop_map(Value::from),
    ]
}

fn json_value() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 1..5).prop_map(Value::from),
            proptest::collection::btree_map("[a-z][a-z0-9_]{0,6}", inner, 1..5)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn count_primitive_leaves(value: &Value) -> usize {
    match value {
        Value::Object(map) if map.is_empty() => 1,
        Value::Array(items) if items.is_empty() => 1,
        Value::Object(map) => map.values().map(count_primitive_leaves).sum(),
        Value::Array(items) => items.iter().map(count_primitive_leaves).sum(),
        _ => 1,
    }
}

proptest! {
    #[test]
    fn flattened_paths_are_unique(doc in json_value()) {
        let out = fionn_gron::flatten(&doc);
        let map = out.as_object().unwrap();
        let unique: std::collections::HashSet<&String> = map.keys().collect();
        prop_assert_eq!(map.len(), unique.len());
    }

    #[test]
    fn leaf_count_matches_input(doc in json_value()) {
        let out = fionn_gron::flatten(&doc);
        let map = out.as_object().unwrap();
        prop_assert_eq!(map.len(), count_primitive_leaves(&doc));
    }
}
