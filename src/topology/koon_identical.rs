//! K-out-of-N with identical components: closed forms over binomial-weighted
//! powers of `r` and `u = 1-r`, rather than falling back to the generic
//! enumeration path.
//!
//! The literal per-term exponents `(numWork, numFail)` coming out of the
//! binomial expansion can reach `numWork = 0` or `numFail = 0` for some
//! `(n, k, i)` triples, which is fine for `powf` but not for "repeated
//! multiplication" once a term's complementary exponent would need to go
//! negative to compensate. Instead of that, each term is built as
//! `ru = r^min(numWork,numFail) * u^min(numWork,numFail)` followed by a
//! single leftover power (`r` or `u`, whichever exponent is larger) applied
//! to the remaining difference — algebraically identical to `r^numWork *
//! u^numFail`, always computed with non-negative repeated-multiplication
//! exponents.

use crate::kernel::Backend;
use crate::topology::pow_mul;

fn term<B: Backend>(b: &B, r: B::Vector, u: B::Vector, num_work: usize, num_fail: usize) -> B::Vector {
    let shared = num_work.min(num_fail);
    let mut acc = pow_mul(b, r, shared);
    acc = b.mul(acc, pow_mul(b, u, shared));
    if num_work > shared {
        acc = b.mul(acc, pow_mul(b, r, num_work - shared));
    } else if num_fail > shared {
        acc = b.mul(acc, pow_mul(b, u, num_fail - shared));
    }
    acc
}

/// Success form: `O[t] = sum_{i=k}^{n} C(n,i) * r^i * (1-r)^(n-i)`.
pub fn koon_identical_success<B: Backend>(
    b: &B,
    r_row: &[f64],
    n: usize,
    k: usize,
    binomials: &[u64],
    t: usize,
    width: usize,
) -> B::Vector {
    debug_assert!(k >= 1 && k <= n);
    debug_assert!(binomials.len() > n);
    let r = b.load(&r_row[t..t + width]);
    let one = b.splat(1.0);
    let u = b.sub(one, r);

    let mut acc = b.splat(0.0);
    for i in k..=n {
        let c = b.splat(binomials[i] as f64);
        let t_i = term(b, r, u, i, n - i);
        acc = b.fma(acc, one, b.mul(c, t_i));
    }
    acc
}

/// Failure form, summed over the complementary range and subtracted from 1:
/// `O[t] = 1 - sum_{i=0}^{k-1} C(n,i) * r^i * (1-r)^(n-i)`.
///
/// Equivalent to [`koon_identical_success`] but sums the smaller of the two
/// ranges when `k` is large, which is why the dispatch facade picks whichever
/// of the two forms has fewer terms.
pub fn koon_identical_failure<B: Backend>(
    b: &B,
    r_row: &[f64],
    n: usize,
    k: usize,
    binomials: &[u64],
    t: usize,
    width: usize,
) -> B::Vector {
    debug_assert!(k >= 1 && k <= n);
    debug_assert!(binomials.len() > n);
    let r = b.load(&r_row[t..t + width]);
    let one = b.splat(1.0);
    let u = b.sub(one, r);

    let mut acc = b.splat(0.0);
    for i in 0..k {
        let c = b.splat(binomials[i] as f64);
        let t_i = term(b, r, u, i, n - i);
        acc = b.fma(acc, one, b.mul(c, t_i));
    }
    b.sub(one, acc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::scalar::ScalarBackend;
    use crate::koon::combinatorics::binomials_for_identical_koon;

    #[test]
    fn scenario_4_koon_2_of_3() {
        let b = ScalarBackend;
        let r = [0.8f64];
        let binomials = binomials_for_identical_koon(3);
        let out = koon_identical_success(&b, &r, 3, 2, &binomials, 0, 1);
        // C(3,2)*0.8^2*0.2 + C(3,3)*0.8^3 = 3*0.64*0.2 + 0.512 = 0.384 + 0.512 = 0.896
        assert!((out - 0.896).abs() < 1e-9);
    }

    #[test]
    fn success_and_failure_forms_agree() {
        let b = ScalarBackend;
        let r = [0.65f64];
        let binomials = binomials_for_identical_koon(5);
        let success = koon_identical_success(&b, &r, 5, 3, &binomials, 0, 1);
        let failure = koon_identical_failure(&b, &r, 5, 3, &binomials, 0, 1);
        assert!((success - failure).abs() < 1e-11);
    }

    #[test]
    fn k_equals_n_is_series() {
        let b = ScalarBackend;
        let r = [0.9f64];
        let binomials = binomials_for_identical_koon(4);
        let out = koon_identical_success(&b, &r, 4, 4, &binomials, 0, 1);
        assert!((out - 0.9f64.powi(4)).abs() < 1e-12);
    }

    #[test]
    fn k_equals_1_is_parallel() {
        let b = ScalarBackend;
        let r = [0.3f64];
        let binomials = binomials_for_identical_koon(4);
        let out = koon_identical_success(&b, &r, 4, 1, &binomials, 0, 1);
        let expected = 1.0 - (1.0 - 0.3f64).powi(4);
        assert!((out - expected).abs() < 1e-11);
    }
}
