// SPDX-License-Identifier: MIT OR Apache-2.0
//! Arena and object pooling, and the batch worker pool, for fionn.
//!
//! This crate provides the allocator substrate backing the transform
//! engine, schema inferencer, and builder:
//!
//! - [`arena`] - a per-traversal bump arena for short-lived keys
//! - [`slab`] - fixed-size-class object pools (single-threaded and
//!   lock-free variants)
//! - [`global`] - the three lazily-initialized global pools
//! - [`workers`] - a fixed-size worker pool with deterministic result
//!   ordering

#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::cargo)]
#![allow(clippy::cargo_common_metadata)]

/// A per-traversal bump arena.
pub mod arena;
/// The three lazily-initialized global pools.
pub mod global;
/// Fixed-size-class object pools.
pub mod slab;
/// The batch worker pool.
pub mod workers;

pub use arena::Arena;
pub use slab::{ObjectPool, SyncObjectPool};
pub use workers::{Pool as WorkerPool, WorkItem};
