// SPDX-License-Identifier: MIT OR Apache-2.0
//! Universal properties for schema inference and merge.

use fionn_core::SchemaType;
use fionn_tape::{analyze, merge};
use proptest::prelude::*;
use serde_json::Value;

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<f32>().prop_map(|f| Value::from(f64::from(f))),
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

/// `Integer ⊑ Number`, `Null` only ever sets `nullable`, and any other
/// disagreement collapses to `Mixed` — so a merge can never report a
/// type strictly narrower than either side's concrete type.
fn is_supertype_or_equal(merged: SchemaType, concrete: SchemaType) -> bool {
    match (merged, concrete) {
        (m, c) if m == c => true,
        (SchemaType::Number, SchemaType::Integer) => true,
        (SchemaType::Mixed, _) => true,
        _ => false,
    }
}

proptest! {
    #[test]
    fn merge_is_associative(a in json_value(), b in json_value(), c in json_value()) {
        let (na, nb, nc) = (analyze(&a), analyze(&b), analyze(&c));
        let left = merge(merge(na.clone(), nb.clone()), nc.clone());
        let right = merge(na, merge(nb, nc));
        prop_assert_eq!(left.schema_type, right.schema_type);
        prop_assert_eq!(left.nullable, right.nullable);
    }

    #[test]
    fn merge_generalizes_both_sides(a in json_value(), b in json_value()) {
        let (na, nb) = (analyze(&a), analyze(&b));
        let (ta, tb) = (na.schema_type, nb.schema_type);
        let merged = merge(na, nb);
        prop_assert!(is_supertype_or_equal(merged.schema_type, ta));
        prop_assert!(is_supertype_or_equal(merged.schema_type, tb));
    }

    #[test]
    fn merge_with_null_only_sets_nullable(a in json_value()) {
        let na = analyze(&a);
        let ty = na.schema_type;
        let merged = merge(na, fionn_core::SchemaNode::null());
        prop_assert!(merged.nullable);
        if ty != SchemaType::Null {
            prop_assert_eq!(merged.schema_type, ty);
        }
    }
}
