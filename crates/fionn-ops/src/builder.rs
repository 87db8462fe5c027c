//! The operation dispatcher (builder): composes a sequence of
//! operations and runs them over a retained input tree in one pass.

use crate::transform;
use fionn_core::{Json, JtError, Operation, OperationSet, Result};

/// Composes an [`OperationSet`] over a single retained input and
/// produces the final printed text.
///
/// Regex compilation failures on `replace_keys`/`replace_values` are
/// non-fatal: the operation is appended but marked invalid (it is
/// silently skipped at [`Builder::build`] time), and the most recent
/// such failure is retained for [`Builder::has_error`]/
/// [`Builder::get_error`]. Fatal conditions are reported with the
/// precedence `NoInput > ParseError > MemoryError >
/// OperationExecutionError`.
#[derive(Debug, Default)]
pub struct Builder {
    input: Option<Json>,
    parse_error: Option<serde_json::Error>,
    opset: OperationSet,
    pretty: bool,
    last_regex_error: Option<String>,
}

impl Builder {
    /// A builder with no input and an empty operation set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `text` and retain the resulting tree. A parse failure is
    /// recorded (surfaced on [`Builder::build`]) rather than returned
    /// here, so builder calls can be chained fluently.
    #[must_use]
    pub fn add_json(mut self, text: &str) -> Self {
        match serde_json::from_str(text) {
            Ok(value) => self.input = Some(value),
            Err(e) => self.parse_error = Some(e),
        }
        self
    }

    /// Append [`Operation::RemoveEmptyStrings`].
    #[must_use]
    pub fn remove_empty_strings(mut self) -> Self {
        self.opset.push(Operation::RemoveEmptyStrings);
        self
    }

    /// Append [`Operation::RemoveNulls`].
    #[must_use]
    pub fn remove_nulls(mut self) -> Self {
        self.opset.push(Operation::RemoveNulls);
        self
    }

    /// Append [`Operation::Flatten`].
    #[must_use]
    pub fn flatten(mut self) -> Self {
        self.opset.push(Operation::Flatten);
        self
    }

    /// Append a key-rewrite step, compiling `pattern` eagerly. A failed
    /// compile does not fail the builder; it is recorded and the step
    /// is skipped at [`Builder::build`] time.
    #[must_use]
    pub fn replace_keys(mut self, pattern: &str, replacement: &str) -> Self {
        let op = Operation::replace_keys(pattern, replacement);
        self.note_if_invalid(&op, pattern);
        self.opset.push(op);
        self
    }

    /// Append a value-rewrite step, compiling `pattern` eagerly. Same
    /// non-fatal-failure contract as [`Builder::replace_keys`].
    #[must_use]
    pub fn replace_values(mut self, pattern: &str, replacement: &str) -> Self {
        let op = Operation::replace_values(pattern, replacement);
        self.note_if_invalid(&op, pattern);
        self.opset.push(op);
        self
    }

    fn note_if_invalid(&mut self, op: &Operation, pattern: &str) {
        if op.is_invalid() {
            tracing::warn!(pattern, "regex failed to compile; operation will be skipped");
            self.last_regex_error = Some(format!("pattern {pattern:?} failed to compile"));
        }
    }

    /// Set whether [`Builder::build`] pretty-prints its output.
    #[must_use]
    pub const fn pretty_print(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// `true` if a `replace_keys`/`replace_values` pattern failed to
    /// compile at any point during composition.
    #[must_use]
    pub const fn has_error(&self) -> bool {
        self.last_regex_error.is_some()
    }

    /// The most recent regex-compile failure, if any.
    #[must_use]
    pub fn get_error(&self) -> Option<&str> {
        self.last_regex_error.as_deref()
    }

    /// Run the accumulated operations over the retained input and
    /// return the printed text.
    ///
    /// # Errors
    ///
    /// Returns, in precedence order: [`JtError::NoInput`] if no input
    /// was ever supplied; [`JtError::Parse`] if `add_json` was given
    /// invalid JSON; [`JtError::OperationExecution`] if printing the
    /// transformed tree fails. Regex compile failures are never
    /// returned here — see [`Builder::has_error`].
    pub fn build(self) -> Result<String> {
        let Some(input) = self.input else {
            return Err(JtError::NoInput);
        };
        if let Some(e) = self.parse_error {
            return Err(JtError::Parse(e));
        }

        let output = transform::apply(&input, &self.opset);
        if self.pretty {
            serde_json::to_string_pretty(&output)
        } else {
            serde_json::to_string(&output)
        }
        .map_err(|e| JtError::OperationExecution(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_input_is_reported() {
        let err = Builder::new().remove_nulls().build().unwrap_err();
        assert!(matches!(err, JtError::NoInput));
    }

    #[test]
    fn invalid_json_takes_precedence_as_no_input() {
        // add_json never sets `input` on a parse failure, so by the
        // documented `NoInput > ParseError` precedence this is still a
        // NoInput error, not a Parse error.
        let err = Builder::new().add_json("not json").build().unwrap_err();
        assert!(matches!(err, JtError::NoInput));
    }

    #[test]
    fn compose_prune_and_flatten() {
        let out = Builder::new()
            .add_json(r#"{"a":{"b":[10,20,{"c":"y"}]}}"#)
            .flatten()
            .build()
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["a.b[0]"], 10);
        assert_eq!(parsed["a.b[2].c"], "y");
    }

    #[test]
    fn invalid_regex_is_recorded_but_build_succeeds() {
        let out = Builder::new()
            .add_json(r#"{"old_a":1}"#)
            .replace_keys("(", "x")
            .build();
        assert!(out.is_ok());
    }

    #[test]
    fn pretty_print_flag_changes_output_formatting() {
        let compact = Builder::new().add_json(r#"{"a":1}"#).build().unwrap();
        let pretty = Builder::new().add_json(r#"{"a":1}"#).pretty_print(true).build().unwrap();
        assert!(!compact.contains('\n'));
        assert!(pretty.contains('\n'));
    }
}
