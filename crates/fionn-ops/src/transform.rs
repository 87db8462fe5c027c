//! The single-pass recursive transform engine.
//!
//! `apply` descends an input tree exactly once, testing the
//! [`OperationSet`] bitmask at each visited node before consulting the
//! full operation list. A [`fionn_pool::Arena`] backs the short-lived
//! key construction performed while rewriting object keys: the
//! regex-substituted key is built in the arena and then copied into the
//! output tree's owned `String`, matching the lifecycle `fionn-pool`
//! documents for arena-owned strings.
//!
//! `paths_with_types` is a sibling projection sharing `fionn-gron`'s
//! path-construction walk but emitting each leaf's type name instead of
//! its value.

use fionn_core::{Json, OperationSet};
use fionn_pool::Arena;

/// Apply every operation in `opset`, in order, to `value` and return the
/// resulting tree.
///
/// If `opset` carries no bit other than [`OperationSet::FLATTEN`], the
/// prune/rewrite traversal is skipped entirely (the fast path described
/// in the design) and the input is forwarded unchanged to
/// [`fionn_gron::flatten`].
#[must_use]
pub fn apply(value: &Json, opset: &OperationSet) -> Json {
    if opset.is_empty() {
        return value.clone();
    }
    if opset.only_flatten() {
        return if opset.has(OperationSet::FLATTEN) {
            fionn_gron::flatten(value)
        } else {
            value.clone()
        };
    }

    let arena = Arena::new();
    let pruned = match value {
        Json::Object(map) => Json::Object(walk_object(map, opset, &arena)),
        Json::Array(items) => Json::Array(walk_array(items, opset, &arena)),
        // The root has no enclosing container, so it is never itself a
        // removal/rewrite candidate — only its children are, per §4.C.
        other => other.clone(),
    };

    if opset.has(OperationSet::FLATTEN) {
        fionn_gron::flatten(&pruned)
    } else {
        pruned
    }
}

fn walk_object(map: &serde_json::Map<String, Json>, opset: &OperationSet, arena: &Arena) -> serde_json::Map<String, Json> {
    let mut out = serde_json::Map::with_capacity(map.len());
    for (key, value) in map {
        let Some(new_value) = process_child(value, opset, arena) else {
            continue;
        };
        let new_key = if opset.has(OperationSet::REPLACE_KEYS) {
            rewrite_key(key, opset, arena).to_string()
        } else {
            key.clone()
        };
        out.insert(new_key, new_value);
    }
    out
}

fn walk_array(items: &[Json], opset: &OperationSet, arena: &Arena) -> Vec<Json> {
    items
        .iter()
        .filter_map(|value| process_child(value, opset, arena))
        .collect()
}

/// Process one array element or object-entry value: apply the removal
/// check to the *original* value, then (for a surviving string) the
/// value rewrite, or (for a surviving container) recurse.
fn process_child(value: &Json, opset: &OperationSet, arena: &Arena) -> Option<Json> {
    if should_remove(value, opset) {
        return None;
    }
    Some(match value {
        Json::String(s) if opset.has(OperationSet::REPLACE_VALUES) => Json::String(rewrite_value(s, opset)),
        Json::Object(map) => Json::Object(walk_object(map, opset, arena)),
        Json::Array(items) => Json::Array(walk_array(items, opset, arena)),
        other => other.clone(),
    })
}

fn should_remove(value: &Json, opset: &OperationSet) -> bool {
    match value {
        Json::String(s) => s.is_empty() && opset.has(OperationSet::REMOVE_EMPTY_STRINGS),
        Json::Null => opset.has(OperationSet::REMOVE_NULLS),
        _ => false,
    }
}

/// Rewrite `key` by the first matching `ReplaceKeys` pattern in
/// operation order ("replace the first match within the key", not
/// "replace the whole key"); unchanged keys are returned without
/// touching the arena.
fn rewrite_key<'a>(key: &str, opset: &OperationSet, arena: &'a Arena) -> &'a str {
    for (re, replacement) in opset.key_rewrites() {
        if re.is_match(key) {
            let replaced = re.replacen(key, 1, replacement);
            return arena.alloc_str(&replaced);
        }
    }
    arena.alloc_str(key)
}

/// Rewrite a string leaf by the first matching `ReplaceValues` pattern
/// in operation order.
fn rewrite_value(value: &str, opset: &OperationSet) -> String {
    for (re, replacement) in opset.value_rewrites() {
        if re.is_match(value) {
            return re.replacen(value, 1, replacement).into_owned();
        }
    }
    value.to_string()
}

/// Project `value` to a flat `path -> type name` mapping.
///
/// Shares `fionn-gron`'s path-construction walk; emits the type name of
/// each leaf (`"null"`, `"boolean"`, `"integer"`, `"number"`,
/// `"string"`, `"array"`, or `"object"`) instead of the leaf value. A
/// non-container root is keyed `"root"` rather than the empty path.
#[must_use]
pub fn paths_with_types(value: &Json) -> Json {
    let mut out = serde_json::Map::new();
    let mut path = String::new();
    fionn_gron::flatten::walk(value, &mut path, &mut |p, leaf| {
        let key = if p.is_empty() { "root" } else { p };
        out.insert(key.to_string(), Json::String(leaf_type_name(leaf).to_string()));
    });
    Json::Object(out)
}

/// The Draft-07 primitive name of `value`'s own type, reusing
/// `fionn-tape`'s single-value classification so integer-vs-number stays
/// consistent with schema inference.
fn leaf_type_name(value: &Json) -> &'static str {
    fionn_tape::analyze(value)
        .schema_type
        .primitive_name()
        .expect("analyze() of a single value never yields Mixed")
}
