//! Engine configuration.
//!
//! The evaluation engine is a pure function of its call arguments; this
//! struct only steers *how* that function is executed (which backend, how
//! many workers), mirroring the shape of `AccelerationConfig` in the hardware
//! acceleration phase this crate grew out of, minus the GPU/FPGA toggles this
//! engine doesn't need.

use serde::{Deserialize, Serialize};

use crate::error::EvalError;

/// Backend selection preference, evaluated against detected CPU capability.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize, Default)]
pub enum BackendPreference {
    /// Prefer wide-predicated, then fixed-2, then scalar (§4.5 order).
    #[default]
    Auto,
    Scalar,
    Fixed2,
    Wide,
}

/// Engine-wide configuration, constructed once by the caller and passed to
/// every `evaluate_*` entry point.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Backend selection preference.
    pub backend: BackendPreference,
    /// Worker count override. `None` defers to `num_cpus::get()`.
    pub num_workers: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend: BackendPreference::Auto,
            num_workers: None,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), EvalError> {
        if let Some(w) = self.num_workers {
            if w == 0 {
                return Err(EvalError::InvalidArgument(
                    "num_workers override must be >= 1".into(),
                ));
            }
        }
        Ok(())
    }

    /// Resolves the worker count to use: the override if set, else one
    /// worker per logical CPU.
    pub fn resolved_workers(&self) -> usize {
        self.num_workers.unwrap_or_else(num_cpus::get).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = EngineConfig::default();
        assert!(cfg.validate().is_ok());
        assert!(cfg.resolved_workers() >= 1);
    }

    #[test]
    fn zero_worker_override_rejected() {
        let cfg = EngineConfig {
            backend: BackendPreference::Auto,
            num_workers: Some(0),
        };
        assert!(cfg.validate().is_err());
    }
}
