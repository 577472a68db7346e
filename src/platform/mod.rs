//! Execution-environment collaborators (§4.4, §6): CPU capability detection,
//! prefetch hints, and the worker thread pool. None of these are part of the
//! numeric core — they steer how the batching layer schedules the same
//! topology step functions across time, lanes, and threads.

pub mod caps;
pub mod pool;
pub mod prefetch;
