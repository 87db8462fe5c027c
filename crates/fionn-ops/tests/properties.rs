// SPDX-License-Identifier: MIT OR Apache-2.0
//! Universal properties for the transform engine.

use fionn_core::{Operation, OperationSet};
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
            proptest::collection::vec(inner.clone(), 0..5).prop_map(Value::from),
            proptest::collection::btree_map("[a-z][a-z0-9_]{0,6}", inner, 0..5)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn object_value() -> impl Strategy<Value = Value> {
    proptest::collection::btree_map("[a-z][a-z0-9_]{0,6}", leaf(), 0..8).prop_map(|m| Value::Object(m.into_iter().collect()))
}

proptest! {
    #[test]
    fn pruning_is_idempotent(doc in json_value()) {
        let mut opset = OperationSet::new();
        opset.push(Operation::RemoveEmptyStrings);
        opset.push(Operation::RemoveNulls);
        let once = fionn_ops::apply(&doc, &opset);
        let twice = fionn_ops::apply(&once, &opset);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn flatten_alone_is_idempotent(doc in json_value()) {
        let mut opset = OperationSet::new();
        opset.push(Operation::Flatten);
        let once = fionn_ops::apply(&doc, &opset);
        let twice = fionn_ops::apply(&once, &opset);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn order_is_preserved_after_pruning(doc in object_value()) {
        let mut opset = OperationSet::new();
        opset.push(Operation::RemoveEmptyStrings);
        opset.push(Operation::RemoveNulls);
        let out = fionn_ops::apply(&doc, &opset);

        let input_keys: Vec<&String> = doc.as_object().unwrap().keys().collect();
        let output_keys: Vec<&String> = out.as_object().unwrap().keys().collect();
        let surviving: Vec<&String> = input_keys.into_iter().filter(|k| output_keys.contains(k)).collect();
        prop_assert_eq!(surviving, output_keys);
    }

    #[test]
    fn empty_opset_is_identity(doc in json_value()) {
        let opset = OperationSet::new();
        prop_assert_eq!(fionn_ops::apply(&doc, &opset), doc);
    }
}
