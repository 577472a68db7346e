//! Backend capability detection (§4.5): what lane widths this process can
//! actually use, detected once and cached, rather than probed per call.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::kernel::MAX_WIDE_LANES;

/// Detected hardware capability relevant to backend selection.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BackendCaps {
    /// `true` on x86_64 targets exposing SSE2 (always true in practice:
    /// SSE2 is part of the x86_64 baseline), meaning the fixed-2 backend
    /// is safe to dispatch to.
    pub has_fixed2: bool,
    /// `true` when the FMA instruction extension was detected; the fixed-2
    /// and wide backends fall back to separate mul/add when this is false.
    pub has_fma: bool,
    /// Lane count the wide-predicated backend should request, `<=
    /// MAX_WIDE_LANES`. Derived from the number of logical CPUs as a proxy
    /// for the widest vector register class worth emulating; this engine
    /// has no portable way to read a real hardware vector width.
    pub wide_lanes: usize,
}

static CAPS: OnceLock<BackendCaps> = OnceLock::new();

/// Detects (once) and returns this process's backend capabilities.
pub fn backend_caps() -> BackendCaps {
    *CAPS.get_or_init(detect)
}

#[cfg(target_arch = "x86_64")]
fn detect() -> BackendCaps {
    let has_fixed2 = true; // SSE2 is part of the x86_64 baseline ABI.
    let has_fma = is_x86_feature_detected!("fma");
    let wide_lanes = num_cpus::get().clamp(2, MAX_WIDE_LANES);
    tracing::debug!(has_fixed2, has_fma, wide_lanes, "detected backend capabilities");
    BackendCaps { has_fixed2, has_fma, wide_lanes }
}

#[cfg(not(target_arch = "x86_64"))]
fn detect() -> BackendCaps {
    let wide_lanes = num_cpus::get().clamp(2, MAX_WIDE_LANES);
    tracing::debug!(wide_lanes, "detected backend capabilities (non-x86_64)");
    BackendCaps { has_fixed2: false, has_fma: false, wide_lanes }
}
