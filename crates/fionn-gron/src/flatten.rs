//! Path-flattening: projects a JSON tree into a single flat object
//! whose keys are dotted/bracketed paths and whose values are the
//! leaf primitives reached at each path.

use fionn_core::Json;

/// Longest path the key buffer will grow to before truncating.
pub const MAX_KEY_LENGTH: usize = 2048;

thread_local! {
    static KEY_BUF: std::cell::RefCell<String> = std::cell::RefCell::new(String::with_capacity(MAX_KEY_LENGTH));
}

/// Flatten `value` into a single JSON object of `path -> leaf`.
#[must_use]
pub fn flatten(value: &Json) -> Json {
    let mut out = serde_json::Map::new();
    KEY_BUF.with(|buf| {
        let mut buf = buf.borrow_mut();
        buf.clear();
        walk(value, &mut buf, &mut |path, leaf| {
            out.insert(path.to_string(), retype_number(leaf));
        });
    });
    Json::Object(out)
}

/// Re-derive a leaf's numeric representation by an `f64 -> i64 -> f64`
/// round-trip, rather than trusting how the parser happened to store
/// it: a number survives as an integer only if converting it to `f64`
/// and back to `i64` recovers the exact same `f64`, matching
/// `original_source`'s `valueint == valuedouble` check. Non-numeric
/// leaves are copied unchanged.
#[allow(clippy::cast_possible_truncation)]
fn retype_number(leaf: &Json) -> Json {
    let Json::Number(n) = leaf else {
        return leaf.clone();
    };
    let Some(f) = n.as_f64() else {
        return leaf.clone();
    };
    let i = f as i64;
    if (i as f64) == f { Json::from(i) } else { leaf.clone() }
}

/// Walk `value`, invoking `visit(path, leaf)` at every leaf position.
/// `path` is scratch space owned by the caller (callers outside this
/// module pass their own buffer to share the truncation discipline
/// with other path-based projections, e.g. `paths_with_types`).
pub fn walk(value: &Json, path: &mut String, visit: &mut dyn FnMut(&str, &Json)) {
    match value {
        Json::Object(map) => {
            if map.is_empty() {
                if path.is_empty() {
                    visit(path, value);
                }
                return;
            }
            for (key, child) in map {
                let mark = path.len();
                push_object_key(path, key);
                walk(child, path, visit);
                path.truncate(mark);
            }
        }
        Json::Array(items) => {
            if items.is_empty() {
                if path.is_empty() {
                    visit(path, value);
                }
                return;
            }
            for (i, child) in items.iter().enumerate() {
                let mark = path.len();
                push_array_index(path, i);
                walk(child, path, visit);
                path.truncate(mark);
            }
        }
        leaf => visit(path, leaf),
    }
}

fn push_object_key(path: &mut String, key: &str) {
    if !path.is_empty() {
        push_truncating(path, ".");
    }
    push_truncating(path, key);
}

fn push_array_index(path: &mut String, index: usize) {
    push_truncating(path, "[");
    let mut idx_buf = itoa::Buffer::new();
    push_truncating(path, idx_buf.format(index));
    push_truncating(path, "]");
}

/// Append `segment` to `path`, truncating at the last UTF-8 char
/// boundary within [`MAX_KEY_LENGTH`] and emitting a diagnostic event
/// rather than panicking or silently losing the path's identity.
fn push_truncating(path: &mut String, segment: &str) {
    if path.len() + segment.len() <= MAX_KEY_LENGTH {
        path.push_str(segment);
        return;
    }
    let budget = MAX_KEY_LENGTH.saturating_sub(path.len());
    let mut boundary = budget.min(segment.len());
    while boundary > 0 && !segment.is_char_boundary(boundary) {
        boundary -= 1;
    }
    path.push_str(&segment[..boundary]);
    tracing::warn!(
        path_prefix = %path,
        attempted_segment = %segment,
        max_key_length = MAX_KEY_LENGTH,
        "flattened path truncated at MAX_KEY_LENGTH"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flattens_nested_object_and_array() {
        let input = json!({"a": {"b": [10, 20, {"c": "y"}]}});
        let out = flatten(&input);
        assert_eq!(out["a.b[0]"], json!(10));
        assert_eq!(out["a.b[1]"], json!(20));
        assert_eq!(out["a.b[2].c"], json!("y"));
    }

    #[test]
    fn nested_empty_containers_are_dropped() {
        let input = json!({"a": {}, "b": [], "c": 1});
        let out = flatten(&input);
        assert_eq!(out.as_object().unwrap().len(), 1);
        assert_eq!(out["c"], json!(1));
    }

    #[test]
    fn empty_root_container_is_emitted_as_leaf() {
        let out = flatten(&json!({}));
        assert_eq!(out[""], json!({}));
        let out = flatten(&json!([]));
        assert_eq!(out[""], json!([]));
    }

    #[test]
    fn primitive_root_emits_empty_path_key() {
        let out = flatten(&json!(42));
        assert_eq!(out[""], json!(42));
    }

    #[test]
    fn leaf_count_matches_primitive_count() {
        let input = json!({"a": 1, "b": [2, 3], "c": {"d": 4, "e": null}});
        let out = flatten(&input);
        assert_eq!(out.as_object().unwrap().len(), 5);
    }

    #[test]
    fn integral_float_leaf_is_retyped_as_integer() {
        let input = json!({"x": 42.0});
        let out = flatten(&input);
        assert_eq!(out["x"], json!(42));
        assert!(out["x"].is_i64());
    }

    #[test]
    fn fractional_float_leaf_stays_a_float() {
        let input = json!({"x": 42.5});
        let out = flatten(&input);
        assert_eq!(out["x"], json!(42.5));
        assert!(out["x"].is_f64());
    }
}
