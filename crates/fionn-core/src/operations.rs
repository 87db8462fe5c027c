//! The operation vocabulary the transform engine executes.

use regex::Regex;

/// A single transform step.
///
/// `ReplaceKeys`/`ReplaceValues` carry a `pattern`/`replacement` pair and
/// the regex compiled from `pattern`. The invariant across the codebase
/// is: `compiled` is `Some` iff compilation succeeded. If compilation
/// fails the operation is still appended to an [`OperationSet`] — it is
/// simply never applied at execute time, and the failure is reported
/// through whichever diagnostics channel the caller used to build the
/// set (see `fionn_ops::builder`).
#[derive(Debug, Clone)]
pub enum Operation {
    /// Drop object/array entries whose string value is empty.
    RemoveEmptyStrings,
    /// Drop object/array entries whose value is `null`.
    RemoveNulls,
    /// Rewrite object keys by first-match regex substitution.
    ReplaceKeys {
        /// The source pattern, retained for diagnostics even if it
        /// failed to compile.
        pattern: String,
        /// The literal/template replacement text.
        replacement: String,
        /// The compiled matcher, or `None` if `pattern` failed to compile.
        compiled: Option<Regex>,
    },
    /// Rewrite string leaf values by first-match regex substitution.
    ReplaceValues {
        /// The source pattern, retained for diagnostics even if it
        /// failed to compile.
        pattern: String,
        /// The literal/template replacement text.
        replacement: String,
        /// The compiled matcher, or `None` if `pattern` failed to compile.
        compiled: Option<Regex>,
    },
    /// Project the (pruned/rewritten) tree to a flat path-to-leaf map.
    Flatten,
}

impl Operation {
    /// Build a `ReplaceKeys` operation, compiling `pattern` eagerly.
    ///
    /// Compilation failure is not reported here — it is recorded on the
    /// operation itself and surfaced by whoever is building the set.
    #[must_use]
    pub fn replace_keys(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let compiled = Regex::new(&pattern).ok();
        Self::ReplaceKeys {
            pattern,
            replacement: replacement.into(),
            compiled,
        }
    }

    /// Build a `ReplaceValues` operation, compiling `pattern` eagerly.
    #[must_use]
    pub fn replace_values(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let compiled = Regex::new(&pattern).ok();
        Self::ReplaceValues {
            pattern,
            replacement: replacement.into(),
            compiled,
        }
    }

    /// `true` if this operation is a rewrite step whose regex failed to
    /// compile, and is therefore skipped at execute time.
    #[must_use]
    pub const fn is_invalid(&self) -> bool {
        matches!(
            self,
            Self::ReplaceKeys { compiled: None, .. } | Self::ReplaceValues { compiled: None, .. }
        )
    }

    const fn bit(&self) -> u8 {
        match self {
            Self::RemoveEmptyStrings => OperationSet::REMOVE_EMPTY_STRINGS,
            Self::RemoveNulls => OperationSet::REMOVE_NULLS,
            Self::ReplaceKeys { .. } => OperationSet::REPLACE_KEYS,
            Self::ReplaceValues { .. } => OperationSet::REPLACE_VALUES,
            Self::Flatten => OperationSet::FLATTEN,
        }
    }
}

/// An ordered sequence of [`Operation`]s plus a bitmask over the variant
/// tags present, used as the fast-path dispatch switch at each visited
/// node of the transform engine.
#[derive(Debug, Clone, Default)]
pub struct OperationSet {
    ops: Vec<Operation>,
    mask: u8,
}

impl OperationSet {
    /// Bit for [`Operation::RemoveEmptyStrings`].
    pub const REMOVE_EMPTY_STRINGS: u8 = 1 << 0;
    /// Bit for [`Operation::RemoveNulls`].
    pub const REMOVE_NULLS: u8 = 1 << 1;
    /// Bit for [`Operation::ReplaceKeys`] (set even if no instance compiled).
    pub const REPLACE_KEYS: u8 = 1 << 2;
    /// Bit for [`Operation::ReplaceValues`] (set even if no instance compiled).
    pub const REPLACE_VALUES: u8 = 1 << 3;
    /// Bit for [`Operation::Flatten`].
    pub const FLATTEN: u8 = 1 << 4;

    /// An empty operation set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ops: Vec::new(),
            mask: 0,
        }
    }

    /// Append an operation, updating the dispatch bitmask.
    pub fn push(&mut self, op: Operation) {
        self.mask |= op.bit();
        self.ops.push(op);
    }

    /// The operations in caller-specified order.
    #[must_use]
    pub fn operations(&self) -> &[Operation] {
        &self.ops
    }

    /// `true` if any operation carrying `bit` is present (regardless of
    /// whether a `ReplaceKeys`/`ReplaceValues` instance is valid).
    #[must_use]
    pub const fn has(&self, bit: u8) -> bool {
        self.mask & bit != 0
    }

    /// `true` if the set is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// `true` if no bit other than [`Self::FLATTEN`] is set — the
    /// fast-path case where the prune/rewrite traversal can be skipped
    /// entirely and the input forwarded unchanged to the flatten
    /// projection.
    #[must_use]
    pub const fn only_flatten(&self) -> bool {
        self.mask & !Self::FLATTEN == 0
    }

    /// Iterator over the `ReplaceKeys` operations with a compiled matcher.
    pub fn key_rewrites(&self) -> impl Iterator<Item = (&Regex, &str)> {
        self.ops.iter().filter_map(|op| match op {
            Operation::ReplaceKeys {
                compiled: Some(re),
                replacement,
                ..
            } => Some((re, replacement.as_str())),
            _ => None,
        })
    }

    /// Iterator over the `ReplaceValues` operations with a compiled matcher.
    pub fn value_rewrites(&self) -> impl Iterator<Item = (&Regex, &str)> {
        self.ops.iter().filter_map(|op| match op {
            Operation::ReplaceValues {
                compiled: Some(re),
                replacement,
                ..
            } => Some((re, replacement.as_str())),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitmask_tracks_pushed_operations() {
        let mut set = OperationSet::new();
        assert!(set.is_empty());
        set.push(Operation::RemoveNulls);
        assert!(set.has(OperationSet::REMOVE_NULLS));
        assert!(!set.has(OperationSet::REMOVE_EMPTY_STRINGS));
    }

    #[test]
    fn only_flatten_fast_path() {
        let mut set = OperationSet::new();
        set.push(Operation::Flatten);
        assert!(set.only_flatten());
        set.push(Operation::RemoveNulls);
        assert!(!set.only_flatten());
    }

    #[test]
    fn invalid_regex_is_marked_but_retained() {
        let op = Operation::replace_keys("(", "x");
        assert!(op.is_invalid());
        let mut set = OperationSet::new();
        set.push(op);
        // the bit is still set even though no matcher compiled
        assert!(set.has(OperationSet::REPLACE_KEYS));
        assert_eq!(set.key_rewrites().count(), 0);
    }
}
