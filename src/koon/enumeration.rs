//! Combinatorial enumeration backend for K-out-of-N with non-identical
//! components: brute-force over every "at least `k` working" combination.
//! Exponential in `n`, so this is the base case the best-split recursion
//! bottoms out to, not a replacement for it at large `n`.

use crate::kernel::Backend;
use crate::koon::combinatorics::enumerate_koon_combinations;

/// `O[t] = sum_{i=k}^{n} sum_{combo of size i} prod_{c in combo} R[c,t] *
/// prod_{c not in combo} (1 - R[c,t])`.
pub fn koon_enumerate_success<B: Backend>(
    b: &B,
    rows: &[&[f64]],
    k: usize,
    t: usize,
    width: usize,
) -> B::Vector {
    let n = rows.len();
    debug_assert!(k >= 1 && k <= n);
    let loaded: Vec<B::Vector> = rows.iter().map(|r| b.load(&r[t..t + width])).collect();

    let mut acc = b.splat(0.0);
    for i in k..=n {
        for combo in enumerate_koon_combinations(n, i) {
            acc = b.add(acc, combo_term(b, &loaded, &combo));
        }
    }
    acc
}

/// `O[t] = 1 - sum_{i=0}^{k-1} sum_{combo of size i} (...)`, the complementary
/// range summed and subtracted from 1.
pub fn koon_enumerate_failure<B: Backend>(
    b: &B,
    rows: &[&[f64]],
    k: usize,
    t: usize,
    width: usize,
) -> B::Vector {
    let n = rows.len();
    debug_assert!(k >= 1 && k <= n);
    let loaded: Vec<B::Vector> = rows.iter().map(|r| b.load(&r[t..t + width])).collect();

    let mut acc = b.splat(0.0);
    for i in 0..k {
        for combo in enumerate_koon_combinations(n, i) {
            acc = b.add(acc, combo_term(b, &loaded, &combo));
        }
    }
    b.sub(b.splat(1.0), acc)
}

fn combo_term<B: Backend>(b: &B, loaded: &[B::Vector], combo: &[usize]) -> B::Vector {
    let one = b.splat(1.0);
    let mut acc = one;
    let mut combo_idx = 0;
    for (c, &r) in loaded.iter().enumerate() {
        if combo_idx < combo.len() && combo[combo_idx] == c {
            acc = b.mul(acc, r);
            combo_idx += 1;
        } else {
            acc = b.mul(acc, b.sub(one, r));
        }
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::scalar::ScalarBackend;

    #[test]
    fn matches_scenario_4_with_identical_rows() {
        let b = ScalarBackend;
        let r = [0.8f64];
        let rows: Vec<&[f64]> = vec![&r, &r, &r];
        let out = koon_enumerate_success(&b, &rows, 2, 0, 1);
        assert!((out - 0.896).abs() < 1e-9);
    }

    #[test]
    fn success_and_failure_forms_agree_for_distinct_rows() {
        let b = ScalarBackend;
        let r0 = [0.9f64];
        let r1 = [0.5f64];
        let r2 = [0.3f64];
        let r3 = [0.7f64];
        let rows: Vec<&[f64]> = vec![&r0, &r1, &r2, &r3];
        let success = koon_enumerate_success(&b, &rows, 2, 0, 1);
        let failure = koon_enumerate_failure(&b, &rows, 2, 0, 1);
        assert!((success - failure).abs() < 1e-11);
    }

    #[test]
    fn k_equals_1_is_parallel() {
        let b = ScalarBackend;
        let r0 = [0.2f64];
        let r1 = [0.4f64];
        let rows: Vec<&[f64]> = vec![&r0, &r1];
        let out = koon_enumerate_success(&b, &rows, 1, 0, 1);
        let expected = 1.0 - (1.0 - 0.2) * (1.0 - 0.4);
        assert!((out - expected).abs() < 1e-12);
    }

    #[test]
    fn k_equals_n_is_series() {
        let b = ScalarBackend;
        let r0 = [0.2f64];
        let r1 = [0.4f64];
        let rows: Vec<&[f64]> = vec![&r0, &r1];
        let out = koon_enumerate_success(&b, &rows, 2, 0, 1);
        assert!((out - 0.2 * 0.4).abs() < 1e-12);
    }
}
