// SPDX-License-Identifier: MIT OR Apache-2.0
//! Python bindings for fionn.
//!
//! Mirrors the programmatic interface one to one: module-level
//! functions for the stateless operations, plus a `Builder` class for
//! composing several in one pass.
//!
//! ```python
//! import fionn
//! fionn.flatten('{"a":{"b":1}}')
//! fionn.schema('[{"id":1},{"id":2,"name":"x"}]')
//! fionn.remove_nulls('{"a":null,"b":1}')
//! fionn.Builder().add_json('{"a":""}').remove_empty_strings().build()
//! ```

use pyo3::prelude::*;

/// Flatten `text` into a single-level `path -> leaf` JSON object.
///
/// A top-level array is treated as a batch when it contains at least
/// one object or array element; a bare primitive array is returned
/// unchanged. Pass `workers > 0` (or `workers=0` for automatic sizing)
/// to flatten batch elements on the worker pool.
#[pyfunction]
#[pyo3(signature = (text, workers=None))]
fn flatten(text: &str, workers: Option<usize>) -> anyhow::Result<String> {
    Ok(fionn::flatten(text, workers.is_some(), workers.unwrap_or(0))?)
}

/// Infer a Draft-07 JSON-Schema document from `text`. A top-level array
/// is always treated as a batch of documents whose per-element schemas
/// are merged.
#[pyfunction]
#[pyo3(signature = (text, workers=None))]
fn schema(text: &str, workers: Option<usize>) -> anyhow::Result<String> {
    Ok(fionn::schema(text, workers.is_some(), workers.unwrap_or(0))?)
}

/// Drop every object/array entry whose string value is empty.
#[pyfunction]
fn remove_empty_strings(text: &str) -> anyhow::Result<String> {
    Ok(fionn::remove_empty(text)?)
}

/// Drop every object/array entry whose value is `null`.
#[pyfunction]
fn remove_nulls(text: &str) -> anyhow::Result<String> {
    Ok(fionn::remove_nulls(text)?)
}

/// Rewrite object keys by first-match regex substitution. An invalid
/// `pattern` makes this a no-op rather than raising.
#[pyfunction]
fn replace_keys(text: &str, pattern: &str, replacement: &str) -> anyhow::Result<String> {
    Ok(fionn::replace_keys(text, pattern, replacement)?)
}

/// Rewrite string leaf values by first-match regex substitution. Same
/// non-fatal-compile-failure contract as [`replace_keys`].
#[pyfunction]
fn replace_values(text: &str, pattern: &str, replacement: &str) -> anyhow::Result<String> {
    Ok(fionn::replace_values(text, pattern, replacement)?)
}

/// Project `text` to a flat `path -> type name` JSON object.
#[pyfunction]
fn paths_with_types(text: &str) -> anyhow::Result<String> {
    Ok(fionn::paths_with_types(text)?)
}

/// Composable, mutable builder: chain several operations and apply
/// them to the input in a single pass with [`build`](Builder::build).
#[pyclass(name = "Builder")]
struct Builder {
    inner: fionn::Builder,
}

#[pymethods]
impl Builder {
    #[new]
    fn new() -> Self {
        Self { inner: fionn::Builder::new() }
    }

    /// Parse `text` as the document the builder will operate on.
    /// Replaces any document set by a previous call.
    fn add_json(mut slf: PyRefMut<'_, Self>, text: &str) -> PyRefMut<'_, Self> {
        slf.inner = std::mem::take(&mut slf.inner).add_json(text);
        slf
    }

    /// Queue removal of empty-string values.
    fn remove_empty_strings(mut slf: PyRefMut<'_, Self>) -> PyRefMut<'_, Self> {
        slf.inner = std::mem::take(&mut slf.inner).remove_empty_strings();
        slf
    }

    /// Queue removal of `null` values.
    fn remove_nulls(mut slf: PyRefMut<'_, Self>) -> PyRefMut<'_, Self> {
        slf.inner = std::mem::take(&mut slf.inner).remove_nulls();
        slf
    }

    /// Queue a flatten pass.
    fn flatten(mut slf: PyRefMut<'_, Self>) -> PyRefMut<'_, Self> {
        slf.inner = std::mem::take(&mut slf.inner).flatten();
        slf
    }

    /// Queue a key rewrite. An invalid `pattern` is recorded and
    /// retrievable via `get_error()`; the operation is skipped.
    fn replace_keys(mut slf: PyRefMut<'_, Self>, pattern: &str, replacement: &str) -> PyRefMut<'_, Self> {
        slf.inner = std::mem::take(&mut slf.inner).replace_keys(pattern, replacement);
        slf
    }

    /// Queue a value rewrite. Same non-fatal-compile-failure contract
    /// as `replace_keys`.
    fn replace_values(mut slf: PyRefMut<'_, Self>, pattern: &str, replacement: &str) -> PyRefMut<'_, Self> {
        slf.inner = std::mem::take(&mut slf.inner).replace_values(pattern, replacement);
        slf
    }

    /// Toggle pretty-printing of the final output.
    #[pyo3(signature = (pretty=true))]
    fn pretty_print(mut slf: PyRefMut<'_, Self>, pretty: bool) -> PyRefMut<'_, Self> {
        slf.inner = std::mem::take(&mut slf.inner).pretty_print(pretty);
        slf
    }

    /// Whether a non-fatal error (an invalid regex) has been recorded.
    fn has_error(&self) -> bool {
        self.inner.has_error()
    }

    /// The most recent non-fatal error message, if any.
    fn get_error(&self) -> Option<String> {
        self.inner.get_error().map(str::to_owned)
    }

    /// Run every queued operation over the document in a single pass
    /// and return the result as a JSON string.
    fn build(&mut self) -> anyhow::Result<String> {
        Ok(std::mem::take(&mut self.inner).build()?)
    }
}

/// The `fionn` Python extension module.
#[pymodule]
fn fionn(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add_function(wrap_pyfunction!(flatten, m)?)?;
    m.add_function(wrap_pyfunction!(schema, m)?)?;
    m.add_function(wrap_pyfunction!(remove_empty_strings, m)?)?;
    m.add_function(wrap_pyfunction!(remove_nulls, m)?)?;
    m.add_function(wrap_pyfunction!(replace_keys, m)?)?;
    m.add_function(wrap_pyfunction!(replace_values, m)?)?;
    m.add_function(wrap_pyfunction!(paths_with_types, m)?)?;
    m.add_class::<Builder>()?;
    Ok(())
}
