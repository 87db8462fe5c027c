// SPDX-License-Identifier: MIT OR Apache-2.0
//! The transform engine and the operation dispatcher (builder) for fionn.
//!
//! - [`transform`] - the single-pass recursive walker (component C) plus
//!   the `paths_with_types` projection
//! - [`builder`] - `Builder`, the public composition API over an
//!   [`fionn_core::OperationSet`] (component F)

#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::cargo)]
#![allow(clippy::cargo_common_metadata)]

/// The single-pass transform engine.
pub mod transform;
/// The operation dispatcher (builder).
pub mod builder;

pub use builder::Builder;
pub use transform::{apply, paths_with_types};
