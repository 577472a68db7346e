//! Numerical evaluation engine for Reliability Block Diagram topologies.
//!
//! Given per-component reliability time series, computes the reliability
//! time series of a composed block — Series, Parallel, K-out-of-N, and
//! five-component Bridge — across a lane-vector (scalar / fixed-2 / wide
//! predicated) backend abstraction, batched across worker threads.

#![allow(clippy::too_many_arguments)]

pub mod batch;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod kernel;
pub mod koon;
pub mod platform;
pub mod topology;

pub use config::{BackendPreference, EngineConfig};
pub use dispatch::{
    evaluate_bridge_generic, evaluate_bridge_identical, evaluate_koon_generic,
    evaluate_koon_identical, evaluate_parallel_generic, evaluate_parallel_identical,
    evaluate_series_generic, evaluate_series_identical,
};
pub use error::{EvalError, EvalResult};

/// Prelude for the common entry points and configuration types.
pub mod prelude {
    pub use crate::config::{BackendPreference, EngineConfig};
    pub use crate::dispatch::{
        evaluate_bridge_generic, evaluate_bridge_identical, evaluate_koon_generic,
        evaluate_koon_identical, evaluate_parallel_generic, evaluate_parallel_identical,
        evaluate_series_generic, evaluate_series_identical,
    };
    pub use crate::error::{EvalError, EvalResult};
}
