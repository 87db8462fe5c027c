// SPDX-License-Identifier: MIT OR Apache-2.0
//! JSON-Schema (Draft-07) inference and merge for fionn.
//!
//! - [`schema`] - `analyze`/`merge`/`analyze_batch`/`to_json`

#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::cargo)]
#![allow(clippy::cargo_common_metadata)]

/// Schema inference, merge, and Draft-07 emission.
pub mod schema;

pub use schema::{analyze, analyze_batch, merge, release, to_json, MAX_ARRAY_SAMPLE_SIZE};
