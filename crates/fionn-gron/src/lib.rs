// SPDX-License-Identifier: MIT OR Apache-2.0
//! Path-flattening (greppable-JSON-style path projection) for fionn.
//!
//! - [`flatten`] - `flatten`/`walk`, the path-construction traversal

#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::cargo)]
#![allow(clippy::cargo_common_metadata)]

/// Path-flattening traversal.
pub mod flatten;

pub use flatten::{flatten, MAX_KEY_LENGTH};
