//! Worker thread pool abstraction (§4.4, §6): the batching layer only needs
//! "run this job once per chunk index, across up to N workers, and block
//! until they're all done" — expressed as a trait so the default rayon-backed
//! pool can be swapped for a caller-supplied one without touching `batch.rs`.

use rayon::prelude::*;

use crate::error::EvalError;

/// A pool capable of running an index-parameterized job across workers.
pub trait ThreadPool {
    fn num_workers(&self) -> usize;

    /// Calls `job(i)` once for every `i in 0..count`, possibly across
    /// multiple worker threads, and blocks until every call has returned.
    fn par_for(&self, count: usize, job: &(dyn Fn(usize) + Sync));
}

/// Default pool: a dedicated rayon thread pool sized at construction time.
pub struct RayonPool {
    inner: rayon::ThreadPool,
}

impl RayonPool {
    pub fn new(num_workers: usize) -> Result<Self, EvalError> {
        if num_workers == 0 {
            return Err(EvalError::InvalidArgument("num_workers must be >= 1".into()));
        }
        let inner = rayon::ThreadPoolBuilder::new()
            .num_threads(num_workers)
            .build()
            .map_err(|e| EvalError::InternalFailure(format!("failed to build worker pool: {e}")))?;
        Ok(Self { inner })
    }
}

impl ThreadPool for RayonPool {
    fn num_workers(&self) -> usize {
        self.inner.current_num_threads()
    }

    fn par_for(&self, count: usize, job: &(dyn Fn(usize) + Sync)) {
        self.inner.install(|| {
            (0..count).into_par_iter().for_each(job);
        });
    }
}

/// Single-threaded pool, useful for deterministic tests and for callers that
/// have already parallelized at a higher level.
#[derive(Clone, Copy, Debug, Default)]
pub struct SequentialPool;

impl ThreadPool for SequentialPool {
    fn num_workers(&self) -> usize {
        1
    }

    fn par_for(&self, count: usize, job: &(dyn Fn(usize) + Sync)) {
        for i in 0..count {
            job(i);
        }
    }
}
