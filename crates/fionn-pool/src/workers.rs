//! A fixed-size worker pool with a shared FIFO queue.
//!
//! `submit`/`drain`/`shutdown` is the whole external contract: tasks run
//! to completion (no cancellation, no timeouts), execution order across
//! workers is unspecified, but result ordering is pinned by the
//! write-once [`WorkItem`] output slot each task writes into.
//!
//! A task that panics never poisons the pool: both the shared-queue
//! worker loop and the inline (queue-full) fallback in [`Pool::submit`]
//! run the job under `catch_unwind`, so the active-task count is always
//! decremented and [`Pool::drain`] always returns. A panicking task
//! simply leaves its [`WorkItem`] slot unfilled; [`Pool::map_batch`]
//! turns that into a [`fionn_core::JtError::Memory`], matching the
//! documented contract that a worker fault surfaces as `MemoryError`
//! after drain, with no partial results.

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread::JoinHandle;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// A write-once output slot indexed by input position.
///
/// Written exactly once by the worker that completes the corresponding
/// task; read by the submitter only after [`Pool::drain`] returns.
pub struct WorkItem<T> {
    /// The input's position in the originating batch.
    pub index: usize,
    slot: OnceLock<T>,
}

impl<T> WorkItem<T> {
    /// A fresh, unfilled slot for the item at `index`.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self {
            index,
            slot: OnceLock::new(),
        }
    }

    /// Fill the slot. Called at most once per item; a second call is a
    /// caller error and is reported rather than silently overwriting.
    ///
    /// # Errors
    ///
    /// Returns the value back if the slot was already filled.
    pub fn fill(&self, value: T) -> Result<(), T> {
        self.slot.set(value)
    }

    /// The filled value, if the task that owned this slot completed.
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.slot.get()
    }
}

struct Shared {
    queue: Mutex<VecDeque<Job>>,
    not_empty: Condvar,
    idle: Condvar,
    active: AtomicUsize,
    shutdown: AtomicBool,
    capacity: usize,
}

/// A fixed pool of worker threads draining a shared FIFO task queue.
pub struct Pool {
    shared: Arc<Shared>,
    handles: Vec<JoinHandle<()>>,
}

impl Pool {
    /// Spawn a pool of `workers` threads. `capacity` bounds the queue;
    /// once the queue is full, [`Pool::submit`] falls back to running
    /// the task synchronously on the submitter so submission never
    /// blocks indefinitely.
    #[must_use]
    pub fn new(workers: usize, capacity: usize) -> Self {
        let workers = workers.max(1);
        let shared = Arc::new(Shared {
            queue: Mutex::new(VecDeque::new()),
            not_empty: Condvar::new(),
            idle: Condvar::new(),
            active: AtomicUsize::new(0),
            shutdown: AtomicBool::new(false),
            capacity: capacity.max(workers),
        });

        let handles = (0..workers)
            .map(|_| {
                let shared = Arc::clone(&shared);
                std::thread::spawn(move || Self::worker_loop(&shared))
            })
            .collect();

        Self { shared, handles }
    }

    /// A pool sized by [`fionn_core::optimal_workers_for_host`], queue
    /// capacity `workers * 64`.
    #[must_use]
    pub fn with_optimal_workers(requested: usize) -> Self {
        let workers = fionn_core::optimal_workers_for_host(requested);
        Self::new(workers, workers * 64)
    }

    fn worker_loop(shared: &Arc<Shared>) {
        loop {
            let job = {
                let mut queue = shared.queue.lock();
                loop {
                    if let Some(job) = queue.pop_front() {
                        // Increment while still holding the queue lock: drain()
                        // also locks the queue before checking `active`, so this
                        // keeps "popped but not yet active" from ever being
                        // observable as "queue empty, active == 0".
                        shared.active.fetch_add(1, Ordering::AcqRel);
                        break Some(job);
                    }
                    if shared.shutdown.load(Ordering::Acquire) {
                        break None;
                    }
                    shared.not_empty.wait(&mut queue);
                }
            };
            let Some(job) = job else { break };
            if let Err(payload) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(job)) {
                tracing::error!(
                    panic = panic_message(&*payload),
                    "worker task panicked; its output slot is left empty"
                );
            }
            shared.active.fetch_sub(1, Ordering::AcqRel);

            let queue = shared.queue.lock();
            if queue.is_empty() && shared.active.load(Ordering::Acquire) == 0 {
                shared.idle.notify_all();
            }
        }
    }

    /// Submit a task. Runs it synchronously on the caller's thread if
    /// the queue is at capacity, so this never blocks indefinitely. A
    /// panic in the inline path is caught, same as in the worker loop,
    /// so a single bad task can't take down the submitter.
    pub fn submit(&self, job: impl FnOnce() + Send + 'static) {
        let mut queue = self.shared.queue.lock();
        if queue.len() >= self.shared.capacity {
            drop(queue);
            if let Err(payload) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(job)) {
                tracing::error!(
                    panic = panic_message(&*payload),
                    "inline-submitted task panicked; its output slot is left empty"
                );
            }
            return;
        }
        queue.push_back(Box::new(job));
        drop(queue);
        self.shared.not_empty.notify_one();
    }

    /// Block until every submitted task has completed and the queue is
    /// empty. Execution order is unspecified; call this before reading
    /// any [`WorkItem`] slots.
    pub fn drain(&self) {
        let mut queue = self.shared.queue.lock();
        while !queue.is_empty() || self.shared.active.load(Ordering::Acquire) != 0 {
            self.shared.idle.wait(&mut queue);
        }
    }

    /// Signal workers to exit once their current task completes, and
    /// join every worker thread. The normal teardown path is
    /// `drain()` followed by `shutdown()`.
    pub fn shutdown(mut self) {
        self.shared.shutdown.store(true, Ordering::Release);
        self.shared.not_empty.notify_all();
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }

    /// Run `f` over every item in `items`, dispatching one task per
    /// item and returning results in input order regardless of
    /// completion order.
    ///
    /// Each dispatched task draws a scratch cell from the global task
    /// pool (`fionn_pool::global`) for the duration of its run — the
    /// fixed-size task-pool allocation the batch work-distribution
    /// layer is specified to use.
    ///
    /// # Errors
    ///
    /// Returns [`fionn_core::JtError::Memory`] if any task panicked
    /// before filling its output slot. No partial results are returned
    /// in that case.
    pub fn map_batch<T, R>(&self, items: Vec<T>, f: impl Fn(T) -> R + Send + Sync + 'static) -> fionn_core::Result<Vec<R>>
    where
        T: Send + 'static,
        R: Send + 'static,
    {
        let f = Arc::new(f);
        let slots: Arc<Vec<WorkItem<R>>> = Arc::new(
            items
                .iter()
                .enumerate()
                .map(|(i, _)| WorkItem::new(i))
                .collect(),
        );

        for (i, item) in items.into_iter().enumerate() {
            let f = Arc::clone(&f);
            let slots = Arc::clone(&slots);
            self.submit(move || {
                let mut scratch = crate::global::alloc_task_scratch();
                scratch.extend_from_slice(&(i as u64).to_ne_bytes());
                let result = f(item);
                crate::global::free_task_scratch(scratch);
                let _ = slots[i].fill(result);
            });
        }
        self.drain();

        let slots = match Arc::try_unwrap(slots) {
            Ok(slots) => slots,
            Err(_) => panic!("drain() guarantees no task-local Arc clone outlives submission"),
        };

        let mut results = Vec::with_capacity(slots.len());
        for slot in slots {
            let index = slot.index;
            match slot.slot.into_inner() {
                Some(value) => results.push(value),
                None => {
                    return Err(fionn_core::JtError::Memory(format!(
                        "worker task for batch index {index} panicked before filling its output slot"
                    )));
                }
            }
        }
        Ok(results)
    }
}

/// Extract a human-readable message from a `catch_unwind` payload.
/// Panics carry either a `&str` (the common `panic!("literal")` case)
/// or a `String` (`panic!("{}", x)`); anything else is reported
/// generically rather than propagated further.
fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

impl Drop for Pool {
    fn drop(&mut self) {
        self.shared.shutdown.store(true, Ordering::Release);
        self.shared.not_empty.notify_all();
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}
