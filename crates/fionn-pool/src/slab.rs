//! Fixed-size-class object pools.
//!
//! Two pool types exist, each committing to one discipline so the two
//! are never mixed at runtime:
//!
//! - [`ObjectPool`] — single-threaded, `RefCell`-guarded free list. Used
//!   per-worker, with no cross-worker sharing.
//! - [`SyncObjectPool`] — lock-free, backed by a bounded MPMC ring
//!   buffer (`crossbeam_queue::ArrayQueue`), whose push/pop are
//!   implemented with compare-and-swap. Used for state genuinely shared
//!   across the worker pool.
//!
//! Both pop a recycled object when one is free, or build a fresh one
//! from the pool's factory otherwise (the "escape hatch" of the
//! design). Ownership of the returned `Box<T>` is the free-ness proof:
//! unlike a raw-pointer slab, there is no way to `free` a cell that
//! wasn't drawn from somewhere, so the "returning a foreign cell is a
//! caller error" contract is upheld by the type system rather than by a
//! runtime bounds check.

use crossbeam_queue::ArrayQueue;
use std::cell::RefCell;

/// A single-threaded fixed-size-class pool.
pub struct ObjectPool<T> {
    factory: Box<dyn Fn() -> T>,
    free: RefCell<Vec<Box<T>>>,
}

impl<T> ObjectPool<T> {
    /// Build a pool whose cells are produced by `factory` when the
    /// free list is empty.
    pub fn new(factory: impl Fn() -> T + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            free: RefCell::new(Vec::new()),
        }
    }

    /// Pop a recycled cell, or build a fresh one via the factory.
    pub fn alloc(&self) -> Box<T> {
        self.free
            .borrow_mut()
            .pop()
            .unwrap_or_else(|| Box::new((self.factory)()))
    }

    /// Return a cell to the pool for reuse.
    pub fn free(&self, cell: Box<T>) {
        self.free.borrow_mut().push(cell);
    }

    /// Number of cells currently available for reuse.
    #[must_use]
    pub fn available(&self) -> usize {
        self.free.borrow().len()
    }
}

/// A lock-free fixed-size-class pool shared across worker threads.
pub struct SyncObjectPool<T> {
    factory: Box<dyn Fn() -> T + Send + Sync>,
    free: ArrayQueue<Box<T>>,
}

impl<T> SyncObjectPool<T> {
    /// Build a pool holding at most `capacity` recycled cells, whose
    /// cells are produced by `factory` when the free list is empty or
    /// full (on return, a cell that doesn't fit is simply dropped).
    pub fn new(capacity: usize, factory: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            free: ArrayQueue::new(capacity.max(1)),
        }
    }

    /// Pop a recycled cell, or build a fresh one via the factory.
    pub fn alloc(&self) -> Box<T> {
        self.free.pop().unwrap_or_else(|| Box::new((self.factory)()))
    }

    /// Return a cell to the pool for reuse. If the pool is at capacity
    /// the cell is dropped instead (the pool bounds memory, it does not
    /// guarantee every cell is recycled).
    pub fn free(&self, cell: Box<T>) {
        let _ = self.free.push(cell);
    }

    /// Number of cells currently available for reuse.
    #[must_use]
    pub fn available(&self) -> usize {
        self.free.len()
    }
}
