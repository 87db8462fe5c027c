// SPDX-License-Identifier: MIT OR Apache-2.0
//! fionn - a high-throughput JSON transformation engine: flatten, infer
//! schema, prune, and rewrite.
//!
//! This is the umbrella crate: it wires the transform engine
//! (`fionn-ops`), the flatten projection (`fionn-gron`), the schema
//! inferencer (`fionn-tape`), and the worker pool (`fionn-pool`) behind
//! the programmatic entry points a caller reaches for by name
//! (`flatten`, `schema`, `remove_empty`, `remove_nulls`, `replace_keys`,
//! `replace_values`, `paths_with_types`) plus the composable
//! [`Builder`].
//!
//! ## Batch auto-detection
//!
//! `flatten` and `schema` both accept a JSON document that may itself be
//! a batch: a top-level array of independent documents. `schema` always
//! treats a top-level array as a batch and merges the per-element
//! schemas. `flatten` treats a top-level array as a batch only if it
//! contains at least one object or array element; an array of bare
//! primitives is returned unchanged, matching the source engine this
//! crate's design is grounded on (a JSON array is ambiguous between "one
//! document that happens to be a list" and "many documents" — the
//! presence of a nested container is the signal that it's the latter).
//! `remove_empty`, `remove_nulls`, `replace_keys`, `replace_values`, and
//! `paths_with_types` have no such ambiguity: arrays at any depth are
//! just containers the single-pass traversal recurses into.

#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::cargo)]
#![allow(clippy::cargo_common_metadata)]

use fionn_core::{Json, Operation, OperationSet, Result};
use fionn_pool::WorkerPool;

pub use fionn_ops::Builder;

/// Flatten `text` into a single-level `path -> leaf` JSON object.
///
/// If the parsed root is a top-level array containing at least one
/// object or array element, each element is flattened independently
/// (optionally via the worker pool) and the results are collected back
/// into an array, in input order. An array of bare primitives is
/// returned unchanged. Any other root is flattened directly.
///
/// # Errors
///
/// Returns [`fionn_core::JtError::Parse`] if `text` is not well-formed
/// JSON, or [`fionn_core::JtError::Memory`] if a worker task panicked
/// while flattening a batch element.
pub fn flatten(text: &str, use_workers: bool, workers: usize) -> Result<String> {
    let root: Json = serde_json::from_str(text)?;
    let out = match &root {
        Json::Array(items) if items.iter().any(is_container) => {
            Json::Array(map_batch(items.clone(), use_workers, workers, |v| fionn_gron::flatten(&v))?)
        }
        Json::Array(_) => root,
        other => fionn_gron::flatten(other),
    };
    serialize(&out)
}

/// Infer a Draft-07 JSON-Schema document from `text`.
///
/// A top-level array is always treated as a batch: each element is
/// analyzed independently and the per-element schemas are merged (in
/// input order) under the type-compatibility matrix. Any other root is
/// analyzed as a single document.
///
/// # Errors
///
/// Returns [`fionn_core::JtError::Parse`] if `text` is not well-formed
/// JSON, or [`fionn_core::JtError::Memory`] if a worker task panicked
/// while analyzing a batch element.
pub fn schema(text: &str, use_workers: bool, workers: usize) -> Result<String> {
    let root: Json = serde_json::from_str(text)?;
    let node = match root {
        Json::Array(items) => fionn_tape::analyze_batch(items, use_workers, workers)?,
        other => fionn_tape::analyze(&other),
    };
    let out = fionn_tape::to_json(&node, true);
    fionn_tape::release(node);
    serialize(&out)
}

/// Drop every object/array entry whose string value is empty.
///
/// # Errors
///
/// Returns [`fionn_core::JtError::Parse`] if `text` is not well-formed
/// JSON.
pub fn remove_empty(text: &str) -> Result<String> {
    run_single_operation(text, Operation::RemoveEmptyStrings)
}

/// Drop every object/array entry whose value is `null`.
///
/// # Errors
///
/// Returns [`fionn_core::JtError::Parse`] if `text` is not well-formed
/// JSON.
pub fn remove_nulls(text: &str) -> Result<String> {
    run_single_operation(text, Operation::RemoveNulls)
}

/// Rewrite object keys by first-match regex substitution.
///
/// A `pattern` that fails to compile makes this a no-op: the input is
/// echoed back unchanged (see [`fionn_core::JtError::Regex`] for the
/// non-fatal contract; use [`Builder::has_error`] if the caller needs to
/// observe the failure).
///
/// # Errors
///
/// Returns [`fionn_core::JtError::Parse`] if `text` is not well-formed
/// JSON.
pub fn replace_keys(text: &str, pattern: &str, replacement: &str) -> Result<String> {
    run_single_operation(text, Operation::replace_keys(pattern, replacement))
}

/// Rewrite string leaf values by first-match regex substitution. Same
/// non-fatal-compile-failure contract as [`replace_keys`].
///
/// # Errors
///
/// Returns [`fionn_core::JtError::Parse`] if `text` is not well-formed
/// JSON.
pub fn replace_values(text: &str, pattern: &str, replacement: &str) -> Result<String> {
    run_single_operation(text, Operation::replace_values(pattern, replacement))
}

/// Project `text` to a flat `path -> type name` JSON object, where each
/// type name is one of `"null"`, `"boolean"`, `"integer"`, `"number"`,
/// `"string"`, `"array"`, or `"object"`. A non-container root is keyed
/// `"root"`.
///
/// # Errors
///
/// Returns [`fionn_core::JtError::Parse`] if `text` is not well-formed
/// JSON.
pub fn paths_with_types(text: &str) -> Result<String> {
    let root: Json = serde_json::from_str(text)?;
    serialize(&fionn_ops::paths_with_types(&root))
}

fn run_single_operation(text: &str, op: Operation) -> Result<String> {
    let root: Json = serde_json::from_str(text)?;
    let mut opset = OperationSet::new();
    opset.push(op);
    serialize(&fionn_ops::apply(&root, &opset))
}

fn serialize(value: &Json) -> Result<String> {
    serde_json::to_string(value).map_err(|e| fionn_core::JtError::OperationExecution(e.to_string()))
}

fn is_container(value: &Json) -> bool {
    matches!(value, Json::Object(_) | Json::Array(_))
}

/// Run `f` over every item in `items`, using the worker pool when
/// `use_workers` is set and the batch clears
/// [`fionn_core::MIN_BATCH_SIZE_FOR_PARALLEL`]; sequential otherwise.
/// Result order always matches input order.
fn map_batch<T, R>(items: Vec<T>, use_workers: bool, workers: usize, f: impl Fn(T) -> R + Send + Sync + 'static) -> Result<Vec<R>>
where
    T: Send + 'static,
    R: Send + 'static,
{
    if use_workers && items.len() >= fionn_core::MIN_BATCH_SIZE_FOR_PARALLEL {
        let pool = WorkerPool::with_optimal_workers(workers);
        let results = pool.map_batch(items, f);
        pool.shutdown();
        results
    } else {
        Ok(items.into_iter().map(f).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prune_scenario() {
        let out = remove_empty(r#"{"a":"","b":null,"c":"x","d":{"e":"","f":1}}"#).unwrap();
        let out = remove_nulls(&out).unwrap();
        let parsed: Json = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, serde_json::json!({"c":"x","d":{"f":1}}));
    }

    #[test]
    fn flatten_nested_scenario() {
        let out = flatten(r#"{"a":{"b":[10,20,{"c":"y"}]}}"#, false, 0).unwrap();
        let parsed: Json = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, serde_json::json!({"a.b[0]":10,"a.b[1]":20,"a.b[2].c":"y"}));
    }

    #[test]
    fn schema_batch_scenario() {
        let out = schema(r#"[{"id":1,"name":"A"},{"id":2,"name":null,"tag":"t"}]"#, false, 0).unwrap();
        let parsed: Json = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["type"], serde_json::json!("object"));
        assert_eq!(parsed["properties"]["id"]["type"], serde_json::json!("integer"));
        assert_eq!(parsed["properties"]["name"]["type"], serde_json::json!(["string", "null"]));
        assert_eq!(parsed["required"], serde_json::json!(["id"]));
    }

    #[test]
    fn key_rewrite_scenario() {
        let out = replace_keys(r#"{"old_a":1,"old_b":2,"keep":3}"#, "^old_", "").unwrap();
        let parsed: Json = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, serde_json::json!({"a":1,"b":2,"keep":3}));
    }

    #[test]
    fn paths_with_types_primitive_root() {
        let out = paths_with_types("42").unwrap();
        assert_eq!(out, r#"{"root":"integer"}"#);
    }

    #[test]
    fn flatten_primitive_array_batch_is_unchanged() {
        let out = flatten("[1,2,3]", false, 0).unwrap();
        let parsed: Json = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn flatten_object_array_batch_flattens_each_element() {
        let out = flatten(r#"[{"a":{"b":1}},{"c":2}]"#, false, 0).unwrap();
        let parsed: Json = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, serde_json::json!([{"a.b":1},{"c":2}]));
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        assert!(flatten("not json", false, 0).is_err());
    }
}
