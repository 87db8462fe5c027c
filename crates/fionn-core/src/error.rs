//! Error kinds shared by every fionn crate.

use thiserror::Error;

/// The result alias used throughout fionn.
pub type Result<T> = std::result::Result<T, JtError>;

/// The fatal and non-fatal error kinds a transform can surface.
///
/// `Regex` and `Truncation` are non-fatal: the owning operation is
/// skipped (regex) or the result is still emitted (truncation), per
/// the error-handling design. Every other variant is fatal and aborts
/// the call that produced it.
#[derive(Debug, Error)]
pub enum JtError {
    /// Input text is not well-formed JSON.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An allocation failed on a critical path (arena or pool overflow
    /// with no heap fallback available).
    #[error("memory error: {0}")]
    Memory(String),

    /// A file read/write failed (CLI layer only; the core never
    /// performs I/O directly).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A regex pattern failed to compile. Non-fatal: the owning
    /// operation is retained but marked invalid and silently skipped.
    #[error("regex error: {0}")]
    Regex(String),

    /// An operation failed mid-execution for a reason not covered by
    /// the above (e.g. a worker's output slot was never filled).
    #[error("operation execution error: {0}")]
    OperationExecution(String),

    /// No input was supplied to a builder before `build()`.
    #[error("no input provided")]
    NoInput,
}
