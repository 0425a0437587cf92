//! Launch a burst of workers and block until every one of them has joined.
//!
//! All workers run inside [`std::thread::scope`], so work items may borrow
//! from the caller's stack (the input matrices, disjoint slices of the
//! output) and are dropped when the scope ends.

use std::fmt;
use std::io;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::thread;

use tracing::{debug, warn};

use crate::error::{EngineError, Result};

/// Upper bound on the number of OS threads a single fork-join phase may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkerLimit {
    /// One thread per work item.
    #[default]
    Unbounded,
    /// At most `n` threads; work items are dealt to them round-robin.
    Bounded(NonZeroUsize),
}

impl WorkerLimit {
    /// Bounded limit equal to the machine's available parallelism.
    pub fn available() -> Self {
        let n = thread::available_parallelism().unwrap_or(NonZeroUsize::MIN);
        WorkerLimit::Bounded(n)
    }

    /// Number of workers needed for `items` work items under this limit.
    pub fn workers_for(&self, items: usize) -> usize {
        match self {
            WorkerLimit::Unbounded => items,
            WorkerLimit::Bounded(n) => items.min(n.get()),
        }
    }

    /// Deals `items` into one batch per worker. Every item lands in exactly
    /// one batch and no batch is empty.
    fn partition<T>(&self, items: Vec<T>) -> Vec<Vec<T>> {
        let workers = self.workers_for(items.len());
        let mut batches: Vec<Vec<T>> = (0..workers)
            .map(|_| Vec::with_capacity(items.len().div_ceil(workers.max(1))))
            .collect();
        for (idx, item) in items.into_iter().enumerate() {
            batches[idx % workers].push(item);
        }
        batches
    }
}

impl fmt::Display for WorkerLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerLimit::Unbounded => write!(f, "unbounded"),
            WorkerLimit::Bounded(n) => write!(f, "{}", n),
        }
    }
}

impl FromStr for WorkerLimit {
    type Err = EngineError;

    /// Parses `"unbounded"`, `"auto"` (available parallelism) or a positive
    /// thread count.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("unbounded") {
            return Ok(WorkerLimit::Unbounded);
        }
        if s.eq_ignore_ascii_case("auto") {
            return Ok(WorkerLimit::available());
        }
        s.parse::<NonZeroUsize>()
            .map(WorkerLimit::Bounded)
            .map_err(|_| EngineError::InvalidWorkerLimit(s.to_string()))
    }
}

/// Runs `work` once for every item and waits for all workers to finish.
///
/// `work` receives the index of the worker running it and the item. Returns
/// the number of workers launched; an empty `items` launches none.
///
/// # Errors
/// - [`EngineError::WorkerSpawn`] if the OS refuses to create a thread. No
///   further workers are launched; those already running are joined first.
/// - [`EngineError::WorkerPanicked`] if any worker panicked.
pub fn run<T, F>(name: &str, items: Vec<T>, limit: WorkerLimit, work: F) -> Result<usize>
where
    T: Send,
    F: Fn(usize, T) + Sync,
{
    run_gated(name, items, limit, work, |_| Ok(()))
}

/// [`run`], with `admit` consulted before each worker is spawned. An `Err`
/// from `admit` is handled exactly like the OS refusing that thread.
fn run_gated<T, F, A>(
    name: &str,
    items: Vec<T>,
    limit: WorkerLimit,
    work: F,
    mut admit: A,
) -> Result<usize>
where
    T: Send,
    F: Fn(usize, T) + Sync,
    A: FnMut(usize) -> io::Result<()>,
{
    if items.is_empty() {
        debug!(strategy = name, "no work items, launching no workers");
        return Ok(0);
    }

    let batches = limit.partition(items);
    let n_workers = batches.len();
    debug!(strategy = name, workers = n_workers, %limit, "launching workers");

    let work = &work;
    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(n_workers);
        let mut spawn_error = None;

        for (worker, batch) in batches.into_iter().enumerate() {
            let spawned = admit(worker).and_then(|()| {
                thread::Builder::new()
                    .name(format!("{}-{}", name, worker))
                    .spawn_scoped(scope, move || {
                        for item in batch {
                            work(worker, item);
                        }
                    })
            });
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(source) => {
                    warn!(strategy = name, worker, error = %source, "failed to spawn worker");
                    spawn_error = Some(EngineError::WorkerSpawn {
                        strategy: name.to_string(),
                        worker,
                        source,
                    });
                    break;
                }
            }
        }

        // Join explicitly so a worker panic becomes an error instead of
        // unwinding out of the scope.
        let mut panicked = None;
        for (worker, handle) in handles.into_iter().enumerate() {
            if handle.join().is_err() && panicked.is_none() {
                panicked = Some(worker);
            }
        }

        if let Some(err) = spawn_error {
            return Err(err);
        }
        if let Some(worker) = panicked {
            return Err(EngineError::WorkerPanicked {
                strategy: name.to_string(),
                worker,
            });
        }
        debug!(strategy = name, workers = n_workers, "all workers joined");
        Ok(n_workers)
    })
}
