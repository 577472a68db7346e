//! Error taxonomy for the evaluation engine.

use thiserror::Error;

/// Errors returned by the `evaluate_*` entry points.
///
/// Validation errors are returned synchronously before any worker is spawned;
/// `O` is left untouched in that case. A [`EvalError::InternalFailure`] can
/// only surface after the worker join barrier, at which point `O` must be
/// considered partially written and untrusted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("internal failure: {0}")]
    InternalFailure(String),
}

pub type EvalResult<T = ()> = Result<T, EvalError>;
