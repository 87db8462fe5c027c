//! JSON-Schema (Draft-07) inference and merge.
//!
//! `analyze` derives a [`SchemaNode`] from one document; `merge` combines
//! two nodes under the type-compatibility matrix (`Integer` is a
//! subtype of `Number`, `Null` only ever sets `nullable`, anything else
//! incompatible collapses to `Mixed`); `analyze_batch` fans per-document
//! analysis out across the worker pool and left-folds the results;
//! `to_json` emits the merged node as a Draft-07 schema document.

use fionn_core::{Json, Property, SchemaNode, SchemaType};
use fionn_pool::WorkerPool;

/// Sampling cap for array element type inference. Arrays longer than
/// this are sampled at an even stride rather than scanned in full.
pub const MAX_ARRAY_SAMPLE_SIZE: usize = 50;

/// Derive a schema from a single JSON value.
#[must_use]
pub fn analyze(value: &Json) -> SchemaNode {
    match value {
        Json::Null => SchemaNode::null(),
        Json::Bool(_) => SchemaNode::leaf(SchemaType::Boolean),
        Json::Number(n) => {
            let ty = if n.is_i64() {
                SchemaType::Integer
            } else {
                SchemaType::Number
            };
            SchemaNode::leaf(ty)
        }
        Json::String(_) => SchemaNode::leaf(SchemaType::String),
        Json::Array(items) => analyze_array(items),
        Json::Object(map) => {
            let mut node = SchemaNode::leaf(SchemaType::Object);
            for (key, value) in map {
                let child = analyze(value);
                push_pooled_property(&mut node, key.as_str(), child);
            }
            node
        }
    }
}

/// Build a [`Property`] in a cell drawn from the global property pool,
/// move it into `node.properties`, and return the now-empty cell to the
/// pool — the scratch-allocation role component A's property pool plays
/// during traversal.
fn push_pooled_property(node: &mut SchemaNode, name: &str, schema: SchemaNode) {
    let mut cell = fionn_pool::global::alloc_property();
    cell.name = Box::from(name);
    cell.schema = schema;
    cell.required = true;
    let placeholder = Property {
        name: Box::from(""),
        schema: SchemaNode::null(),
        required: false,
    };
    let prop = std::mem::replace(&mut *cell, placeholder);
    fionn_pool::global::free_property(cell);
    node.properties.push(prop);
}

fn analyze_array(items: &[Json]) -> SchemaNode {
    let mut node = SchemaNode::leaf(SchemaType::Array);
    if items.is_empty() {
        node.items = Some(pooled_cell(SchemaNode::null()));
        return node;
    }

    let sampled = sample_indices(items.len()).map(|i| analyze(&items[i]));
    let merged = sampled
        .reduce(merge)
        .unwrap_or_else(SchemaNode::null);
    node.items = Some(pooled_cell(merged));
    node
}

/// Draw a cell from the global schema-node pool and move `value` into
/// it, rather than a bare `Box::new` — this is the allocator substrate
/// component A backs the inferencer with (see `fionn_pool::global`).
fn pooled_cell(value: SchemaNode) -> Box<SchemaNode> {
    let mut cell = fionn_pool::global::alloc_schema_node();
    *cell = value;
    cell
}

/// Indices to sample for array type inference: every index if the
/// array is short enough, otherwise an even stride capped at
/// [`MAX_ARRAY_SAMPLE_SIZE`] samples.
fn sample_indices(len: usize) -> impl Iterator<Item = usize> {
    let stride = if len > MAX_ARRAY_SAMPLE_SIZE { len / MAX_ARRAY_SAMPLE_SIZE } else { 1 };
    (0..len).step_by(stride.max(1))
}

/// Merge two schema nodes under the type-compatibility matrix.
#[must_use]
pub fn merge(a: SchemaNode, b: SchemaNode) -> SchemaNode {
    let required = a.required && b.required;
    let nullable =
        a.nullable || b.nullable || a.schema_type == SchemaType::Null || b.schema_type == SchemaType::Null;

    if a.schema_type == SchemaType::Null && b.schema_type == SchemaType::Null {
        return SchemaNode {
            schema_type: SchemaType::Null,
            nullable: true,
            required,
            items: None,
            properties: Vec::new(),
        };
    }
    if a.schema_type == SchemaType::Null {
        return SchemaNode {
            nullable: true,
            required,
            ..b
        };
    }
    if b.schema_type == SchemaType::Null {
        return SchemaNode {
            nullable: true,
            required,
            ..a
        };
    }

    let result_type = match (a.schema_type, b.schema_type) {
        (t1, t2) if t1 == t2 => t1,
        (SchemaType::Integer, SchemaType::Number) | (SchemaType::Number, SchemaType::Integer) => {
            SchemaType::Number
        }
        _ => SchemaType::Mixed,
    };

    match result_type {
        SchemaType::Array => {
            let items = match (a.items, b.items) {
                (Some(ai), Some(bi)) => Some(pooled_cell(merge(*ai, *bi))),
                (Some(ai), None) => Some(pooled_cell(nullable_copy(*ai))),
                (None, Some(bi)) => Some(pooled_cell(nullable_copy(*bi))),
                (None, None) => None,
            };
            SchemaNode {
                schema_type: SchemaType::Array,
                nullable,
                required,
                items,
                properties: Vec::new(),
            }
        }
        SchemaType::Object => SchemaNode {
            schema_type: SchemaType::Object,
            nullable,
            required,
            items: None,
            properties: merge_properties(&a.properties, &b.properties),
        },
        other => SchemaNode {
            schema_type: other,
            nullable,
            required,
            items: None,
            properties: Vec::new(),
        },
    }
}

fn nullable_copy(mut node: SchemaNode) -> SchemaNode {
    node.nullable = true;
    node
}

fn merge_properties(a: &[Property], b: &[Property]) -> Vec<Property> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    for pa in a {
        if let Some(pb) = b.iter().find(|p| p.name == pa.name) {
            out.push(Property {
                name: pa.name.clone(),
                schema: merge(pa.schema.clone(), pb.schema.clone()),
                required: pa.required && pb.required,
            });
        } else {
            out.push(Property {
                name: pa.name.clone(),
                schema: nullable_copy(pa.schema.clone()),
                required: false,
            });
        }
    }
    for pb in b {
        if !a.iter().any(|p| p.name == pb.name) {
            out.push(Property {
                name: pb.name.clone(),
                schema: nullable_copy(pb.schema.clone()),
                required: false,
            });
        }
    }
    out
}

/// Derive a schema for a batch, analyzing each document independently
/// (optionally via the worker pool) and left-folding the per-document
/// schemas in submission order. The fold is associative in practice, so
/// a deterministic left-fold pins test expectations without losing
/// generality.
///
/// # Errors
///
/// Returns [`fionn_core::JtError::Memory`] if a worker task panicked
/// before producing its per-document schema (see
/// [`fionn_pool::WorkerPool::map_batch`]).
pub fn analyze_batch(values: Vec<Json>, use_workers: bool, workers: usize) -> fionn_core::Result<SchemaNode> {
    if values.is_empty() {
        return Ok(SchemaNode::null());
    }

    let schemas = if use_workers && values.len() >= fionn_core::MIN_BATCH_SIZE_FOR_PARALLEL {
        let pool = WorkerPool::with_optimal_workers(workers);
        let schemas = pool.map_batch(values, |v| analyze(&v));
        pool.shutdown();
        schemas?
    } else {
        values.iter().map(analyze).collect()
    };

    Ok(schemas.into_iter().reduce(merge).unwrap_or_else(SchemaNode::null))
}

/// Emit a [`SchemaNode`] as a Draft-07 JSON-Schema document. The root
/// call carries `$schema`; recursive calls (array items, object
/// properties) omit it.
#[must_use]
pub fn to_json(node: &SchemaNode, is_root: bool) -> Json {
    let mut schema = serde_json::Map::new();
    if is_root {
        schema.insert(
            "$schema".to_string(),
            Json::String("http://json-schema.org/draft-07/schema#".to_string()),
        );
    }

    if node.schema_type == SchemaType::Mixed {
        schema.insert("type".to_string(), mixed_type_array(node.nullable));
        return Json::Object(schema);
    }

    let name = node
        .schema_type
        .primitive_name()
        .expect("non-Mixed types always have a primitive name");
    schema.insert(
        "type".to_string(),
        if node.nullable {
            Json::Array(vec![Json::String(name.to_string()), Json::String("null".to_string())])
        } else {
            Json::String(name.to_string())
        },
    );

    match node.schema_type {
        SchemaType::Array => {
            if let Some(items) = &node.items {
                schema.insert("items".to_string(), to_json(items, false));
            }
        }
        SchemaType::Object => {
            let mut properties = serde_json::Map::new();
            let mut required = Vec::new();
            for prop in &node.properties {
                properties.insert(prop.name.to_string(), to_json(&prop.schema, false));
                if prop.required {
                    required.push(Json::String(prop.name.to_string()));
                }
            }
            schema.insert("properties".to_string(), Json::Object(properties));
            if !required.is_empty() {
                schema.insert("required".to_string(), Json::Array(required));
            }
        }
        _ => {}
    }

    Json::Object(schema)
}

/// Recursively return a schema-node graph's pooled `items` cells to the
/// global schema-node pool.
///
/// Mirrors the component's documented lifecycle: a `SchemaNode` graph
/// is owned by the inferencer for the duration of one top-level call
/// and recursively released before the call returns. Callers typically
/// invoke this once, after [`to_json`] has produced the owned JSON
/// document it needs.
pub fn release(mut node: SchemaNode) {
    if let Some(items) = node.items.take() {
        release_cell(items);
    }
    for prop in node.properties.drain(..) {
        release(prop.schema);
    }
}

fn release_cell(mut cell: Box<SchemaNode>) {
    if let Some(items) = cell.items.take() {
        release_cell(items);
    }
    for prop in cell.properties.drain(..) {
        release(prop.schema);
    }
    fionn_pool::global::free_schema_node(cell);
}

fn mixed_type_array(nullable: bool) -> Json {
    let mut types: Vec<Json> = ["string", "number", "integer", "boolean", "object", "array"]
        .into_iter()
        .map(|s| Json::String(s.to_string()))
        .collect();
    if nullable {
        types.push(Json::String("null".to_string()));
    }
    Json::Array(types)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn primitives_have_expected_types() {
        assert_eq!(analyze(&json!(1)).schema_type, SchemaType::Integer);
        assert_eq!(analyze(&json!(1.5)).schema_type, SchemaType::Number);
        assert_eq!(analyze(&json!("s")).schema_type, SchemaType::String);
        assert_eq!(analyze(&json!(true)).schema_type, SchemaType::Boolean);
        let n = analyze(&json!(null));
        assert_eq!(n.schema_type, SchemaType::Null);
        assert!(n.nullable);
        assert!(!n.required);
    }

    #[test]
    fn empty_array_items_is_null() {
        let node = analyze(&json!([]));
        assert_eq!(node.schema_type, SchemaType::Array);
        assert_eq!(node.items.unwrap().schema_type, SchemaType::Null);
    }

    #[test]
    fn integer_merges_into_number_never_reverse() {
        let merged = merge(
            SchemaNode::leaf(SchemaType::Integer),
            SchemaNode::leaf(SchemaType::Number),
        );
        assert_eq!(merged.schema_type, SchemaType::Number);
    }

    #[test]
    fn null_sets_nullable_on_survivor() {
        let merged = merge(SchemaNode::leaf(SchemaType::String), SchemaNode::null());
        assert_eq!(merged.schema_type, SchemaType::String);
        assert!(merged.nullable);
        assert!(!merged.required);
    }

    #[test]
    fn incompatible_types_become_mixed() {
        let merged = merge(
            SchemaNode::leaf(SchemaType::String),
            SchemaNode::leaf(SchemaType::Boolean),
        );
        assert_eq!(merged.schema_type, SchemaType::Mixed);
    }

    #[test]
    fn heterogeneous_batch_scenario() {
        let docs = vec![
            json!({"id": 1, "name": "A"}),
            json!({"id": 2, "name": null, "tag": "t"}),
        ];
        let schema = analyze_batch(docs, false, 0).unwrap();
        let out = to_json(&schema, true);
        assert_eq!(out["type"], json!("object"));
        assert_eq!(out["properties"]["id"]["type"], json!("integer"));
        assert_eq!(out["properties"]["name"]["type"], json!(["string", "null"]));
        assert_eq!(out["properties"]["tag"]["type"], json!(["string", "null"]));
        assert_eq!(out["required"], json!(["id"]));
    }

    #[test]
    fn merge_is_associative() {
        let a = analyze(&json!({"x": 1}));
        let b = analyze(&json!({"x": "s"}));
        let c = analyze(&json!({"x": null}));
        let left = merge(merge(a.clone(), b.clone()), c.clone());
        let right = merge(a, merge(b, c));
        assert_eq!(left.properties[0].schema.schema_type, right.properties[0].schema.schema_type);
        assert_eq!(left.properties[0].schema.nullable, right.properties[0].schema.nullable);
    }

    #[test]
    fn analyze_batch_matches_sequential_and_parallel() {
        let docs: Vec<Json> = (0..250).map(|i| json!({"n": i})).collect();
        let seq = to_json(&analyze_batch(docs.clone(), false, 0).unwrap(), true);
        let par = to_json(&analyze_batch(docs, true, 4).unwrap(), true);
        assert_eq!(seq, par);
    }

    #[test]
    fn release_returns_pooled_cells_without_panicking() {
        let schema = analyze(&json!({"a": [1, 2, {"b": "x"}], "c": null}));
        let _ = to_json(&schema, true);
        release(schema);
    }
}
