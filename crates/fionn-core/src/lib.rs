// SPDX-License-Identifier: MIT OR Apache-2.0
//! Core types, error handling, and the data model shared across fionn.
//!
//! This crate provides the foundational types used across the fionn
//! JSON-transformation ecosystem:
//!
//! - [`error`] - Error types and the `Result` alias
//! - [`operations`] - The operation vocabulary (prune/rewrite/flatten)
//! - [`schema_node`] - The inferred-schema data model
//! - [`config`] - Worker-count configuration

#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::cargo)]
#![allow(clippy::cargo_common_metadata)]

/// Worker-count configuration.
pub mod config;
/// Error types for fionn operations.
pub mod error;
/// The operation vocabulary and operation sets.
pub mod operations;
/// The inferred-schema data model.
pub mod schema_node;

pub use config::{MAX_WORKERS, MIN_BATCH_SIZE_FOR_PARALLEL, optimal_workers, optimal_workers_for_host};
pub use error::{JtError, Result};
pub use operations::{Operation, OperationSet};
pub use schema_node::{Property, SchemaNode, SchemaType};

/// The JSON tree type used throughout fionn.
///
/// The parser/printer is an external collaborator; `serde_json::Value`
/// is the commodity tree type it produces and consumes.
pub type Json = serde_json::Value;
