//! Evaluation facade (§6): one `evaluate_*` entry point per topology/mode.
//! Each validates its arguments, resolves a concrete backend and worker
//! pool from the caller's [`EngineConfig`], then hands the right topology
//! step function to the batching layer. Degenerate K-out-of-N cases are
//! short-circuited here, before any backend is touched.

use crate::batch::evaluate_strided;
use crate::config::{BackendPreference, EngineConfig};
use crate::error::{EvalError, EvalResult};
use crate::kernel::fixed2::Fixed2Backend;
use crate::kernel::scalar::ScalarBackend;
use crate::kernel::wide::WideBackend;
use crate::koon::combinatorics::binomials_for_identical_koon;
use crate::koon::recursion::koon_recursive;
use crate::platform::caps::{backend_caps, BackendCaps};
use crate::platform::pool::{RayonPool, ThreadPool};
use crate::platform::prefetch::Prefetcher;
use crate::topology::bridge::{bridge_generic, bridge_identical};
use crate::topology::koon_identical::{koon_identical_failure, koon_identical_success};
use crate::topology::parallel::{parallel_generic, parallel_identical};
use crate::topology::series::{series_generic, series_identical};

#[cfg(target_arch = "x86_64")]
fn make_prefetcher() -> crate::platform::prefetch::X86Prefetcher {
    crate::platform::prefetch::X86Prefetcher
}

#[cfg(not(target_arch = "x86_64"))]
fn make_prefetcher() -> crate::platform::prefetch::NoopPrefetcher {
    crate::platform::prefetch::NoopPrefetcher
}

/// Resolves `Auto` against detected capabilities (§4.5: wide, then fixed2,
/// then scalar). Every backend this engine ships has a correct fallback path
/// on every target, so in practice `Auto` always resolves to `Wide`; the
/// match still names the full preference order for an explicit request.
fn resolve_backend(config: &EngineConfig, _caps: BackendCaps) -> BackendPreference {
    match config.backend {
        BackendPreference::Auto => BackendPreference::Wide,
        explicit => explicit,
    }
}

fn validate_rows(rows: &[&[f64]], out_len: usize) -> EvalResult {
    if rows.is_empty() {
        return Err(EvalError::InvalidArgument("at least one component row is required".into()));
    }
    if out_len == 0 {
        return Err(EvalError::InvalidArgument("output slice must be non-empty".into()));
    }
    for (i, row) in rows.iter().enumerate() {
        if row.len() != out_len {
            return Err(EvalError::InvalidArgument(format!(
                "row {i} has length {} but output has length {out_len}",
                row.len()
            )));
        }
    }
    Ok(())
}

fn validate_identical_row(r_row: &[f64], n: usize, out_len: usize) -> EvalResult {
    if n == 0 {
        return Err(EvalError::InvalidArgument("component count must be >= 1".into()));
    }
    if r_row.len() != out_len {
        return Err(EvalError::InvalidArgument(format!(
            "component row has length {} but output has length {out_len}",
            r_row.len()
        )));
    }
    Ok(())
}

fn setup(config: &EngineConfig) -> EvalResult<(RayonPool, impl Prefetcher + Sync, BackendPreference)> {
    config.validate()?;
    let caps = backend_caps();
    let backend = resolve_backend(config, caps);
    let pool = RayonPool::new(config.resolved_workers())?;
    let prefetcher = make_prefetcher();
    tracing::info!(backend = ?backend, workers = pool.num_workers(), "resolved evaluation backend");
    Ok((pool, prefetcher, backend))
}

macro_rules! dispatch_backend {
    ($backend:expr, $caps:expr, |$b:ident| $body:expr) => {
        match $backend {
            BackendPreference::Scalar | BackendPreference::Auto => {
                let $b = ScalarBackend;
                $body
            }
            BackendPreference::Fixed2 => {
                let $b = Fixed2Backend;
                $body
            }
            BackendPreference::Wide => {
                let $b = WideBackend::new($caps.wide_lanes);
                $body
            }
        }
    };
}

/// Series topology, non-identical components: `O[t] = prod_c R[c,t]`.
pub fn evaluate_series_generic(config: &EngineConfig, rows: &[&[f64]], out: &mut [f64]) -> EvalResult {
    validate_rows(rows, out.len())?;
    let (pool, prefetcher, backend) = setup(config)?;
    let caps = backend_caps();
    dispatch_backend!(backend, caps, |b| {
        evaluate_strided(&b, &pool, &prefetcher, out.len(), out, |bk, t, w| {
            series_generic(bk, rows, t, w)
        });
    });
    Ok(())
}

/// Series topology, identical components: `O[t] = r[t]^n`.
pub fn evaluate_series_identical(
    config: &EngineConfig,
    r_row: &[f64],
    n: usize,
    out: &mut [f64],
) -> EvalResult {
    validate_identical_row(r_row, n, out.len())?;
    let (pool, prefetcher, backend) = setup(config)?;
    let caps = backend_caps();
    dispatch_backend!(backend, caps, |b| {
        evaluate_strided(&b, &pool, &prefetcher, out.len(), out, |bk, t, w| {
            series_identical(bk, r_row, n, t, w)
        });
    });
    Ok(())
}

/// Parallel topology, non-identical components: `O[t] = 1 - prod_c (1-R[c,t])`.
pub fn evaluate_parallel_generic(config: &EngineConfig, rows: &[&[f64]], out: &mut [f64]) -> EvalResult {
    validate_rows(rows, out.len())?;
    let (pool, prefetcher, backend) = setup(config)?;
    let caps = backend_caps();
    dispatch_backend!(backend, caps, |b| {
        evaluate_strided(&b, &pool, &prefetcher, out.len(), out, |bk, t, w| {
            parallel_generic(bk, rows, t, w)
        });
    });
    Ok(())
}

/// Parallel topology, identical components: `O[t] = 1 - (1-r[t])^n`.
pub fn evaluate_parallel_identical(
    config: &EngineConfig,
    r_row: &[f64],
    n: usize,
    out: &mut [f64],
) -> EvalResult {
    validate_identical_row(r_row, n, out.len())?;
    let (pool, prefetcher, backend) = setup(config)?;
    let caps = backend_caps();
    dispatch_backend!(backend, caps, |b| {
        evaluate_strided(&b, &pool, &prefetcher, out.len(), out, |bk, t, w| {
            parallel_identical(bk, r_row, n, t, w)
        });
    });
    Ok(())
}

/// Five-component Bridge topology, non-identical components.
pub fn evaluate_bridge_generic(config: &EngineConfig, rows: &[&[f64]; 5], out: &mut [f64]) -> EvalResult {
    validate_rows(rows.as_slice(), out.len())?;
    let (pool, prefetcher, backend) = setup(config)?;
    let caps = backend_caps();
    dispatch_backend!(backend, caps, |b| {
        evaluate_strided(&b, &pool, &prefetcher, out.len(), out, |bk, t, w| {
            bridge_generic(bk, rows, t, w)
        });
    });
    Ok(())
}

/// Five-component Bridge topology, identical components.
pub fn evaluate_bridge_identical(config: &EngineConfig, r_row: &[f64], out: &mut [f64]) -> EvalResult {
    validate_identical_row(r_row, 5, out.len())?;
    let (pool, prefetcher, backend) = setup(config)?;
    let caps = backend_caps();
    dispatch_backend!(backend, caps, |b| {
        evaluate_strided(&b, &pool, &prefetcher, out.len(), out, |bk, t, w| {
            bridge_identical(bk, r_row, t, w)
        });
    });
    Ok(())
}

/// K-out-of-N, identical components. `k == 0` and `k > n` are short-circuited
/// before any backend is touched.
pub fn evaluate_koon_identical(
    config: &EngineConfig,
    r_row: &[f64],
    n: usize,
    k: usize,
    out: &mut [f64],
) -> EvalResult {
    validate_identical_row(r_row, n, out.len())?;
    if n > 127 {
        return Err(EvalError::InvalidArgument(format!(
            "KooN component count must be <= 127, got {n}"
        )));
    }
    if k == 0 {
        out.fill(1.0);
        return Ok(());
    }
    if k > n {
        out.fill(0.0);
        return Ok(());
    }

    let (pool, prefetcher, backend) = setup(config)?;
    let caps = backend_caps();
    let binomials = binomials_for_identical_koon(n);
    let use_failure = k * 2 <= n + 1; // whichever summed form has fewer terms

    dispatch_backend!(backend, caps, |b| {
        evaluate_strided(&b, &pool, &prefetcher, out.len(), out, |bk, t, w| {
            if use_failure {
                koon_identical_failure(bk, r_row, n, k, &binomials, t, w)
            } else {
                koon_identical_success(bk, r_row, n, k, &binomials, t, w)
            }
        });
    });
    Ok(())
}

/// K-out-of-N, non-identical components, via the best-split recursive
/// decomposition. `k == 0` and `k > n` are short-circuited before any
/// backend is touched.
pub fn evaluate_koon_generic(config: &EngineConfig, rows: &[&[f64]], k: usize, out: &mut [f64]) -> EvalResult {
    validate_rows(rows, out.len())?;
    let n = rows.len();
    if n > 127 {
        return Err(EvalError::InvalidArgument(format!(
            "KooN component count must be <= 127, got {n}"
        )));
    }
    if k == 0 {
        out.fill(1.0);
        return Ok(());
    }
    if k > n {
        out.fill(0.0);
        return Ok(());
    }

    let (pool, prefetcher, backend) = setup(config)?;
    let caps = backend_caps();
    dispatch_backend!(backend, caps, |b| {
        evaluate_strided(&b, &pool, &prefetcher, out.len(), out, |bk, t, w| {
            koon_recursive(bk, rows, k as i64, t, w)
        });
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_generic_end_to_end() {
        let config = EngineConfig::default();
        let r0 = vec![1.0, 0.9, 0.8];
        let r1 = vec![1.0, 0.9, 0.8];
        let rows: Vec<&[f64]> = vec![&r0, &r1];
        let mut out = vec![0.0; 3];
        evaluate_series_generic(&config, &rows, &mut out).unwrap();
        assert!((out[0] - 1.0).abs() < 1e-12);
        assert!((out[2] - 0.64).abs() < 1e-9);
    }

    #[test]
    fn koon_generic_k_zero_short_circuits() {
        let config = EngineConfig::default();
        let r0 = vec![0.2; 4];
        let rows: Vec<&[f64]> = vec![&r0];
        let mut out = vec![-1.0; 4];
        evaluate_koon_generic(&config, &rows, 0, &mut out).unwrap();
        assert_eq!(out, vec![1.0; 4]);
    }

    #[test]
    fn koon_generic_k_greater_than_n_short_circuits() {
        let config = EngineConfig::default();
        let r0 = vec![0.9; 4];
        let rows: Vec<&[f64]> = vec![&r0];
        let mut out = vec![-1.0; 4];
        evaluate_koon_generic(&config, &rows, 2, &mut out).unwrap();
        assert_eq!(out, vec![0.0; 4]);
    }

    #[test]
    fn koon_component_count_over_127_is_invalid_argument() {
        let config = EngineConfig::default();
        let rows_data: Vec<Vec<f64>> = (0..128).map(|_| vec![0.9; 2]).collect();
        let rows: Vec<&[f64]> = rows_data.iter().map(|r| r.as_slice()).collect();
        let mut out = vec![0.0; 2];
        let err = evaluate_koon_generic(&config, &rows, 5, &mut out).unwrap_err();
        assert!(matches!(err, EvalError::InvalidArgument(_)));

        let r = vec![0.9; 2];
        let mut out2 = vec![0.0; 2];
        let err2 = evaluate_koon_identical(&config, &r, 128, 5, &mut out2).unwrap_err();
        assert!(matches!(err2, EvalError::InvalidArgument(_)));
    }

    #[test]
    fn mismatched_row_length_is_invalid_argument() {
        let config = EngineConfig::default();
        let r0 = vec![0.5; 3];
        let r1 = vec![0.5; 2];
        let rows: Vec<&[f64]> = vec![&r0, &r1];
        let mut out = vec![0.0; 3];
        let err = evaluate_series_generic(&config, &rows, &mut out).unwrap_err();
        assert!(matches!(err, EvalError::InvalidArgument(_)));
    }

    #[test]
    fn empty_rows_is_invalid_argument() {
        let config = EngineConfig::default();
        let rows: Vec<&[f64]> = vec![];
        let mut out = vec![0.0; 3];
        let err = evaluate_series_generic(&config, &rows, &mut out).unwrap_err();
        assert!(matches!(err, EvalError::InvalidArgument(_)));
    }

    #[test]
    fn koon_identical_matches_generic_for_equal_rows() {
        let config = EngineConfig::default();
        let r = vec![0.8; 5];
        let mut out_identical = vec![0.0; 5];
        let mut out_generic = vec![0.0; 5];
        evaluate_koon_identical(&config, &r, 3, 2, &mut out_identical).unwrap();
        let rows: Vec<&[f64]> = vec![&r, &r, &r];
        evaluate_koon_generic(&config, &rows, 2, &mut out_generic).unwrap();
        for (a, b) in out_identical.iter().zip(out_generic.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }
}
