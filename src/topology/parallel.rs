//! Parallel topology: any component suffices.

use crate::kernel::Backend;

/// `O[t] = 1 - (1-R[0,t]) * (1-R[1,t]) * ... * (1-R[n-1,t])`, accumulated via
/// `fms` so each step is `acc - acc*R[c,t] == acc*(1-R[c,t])`.
pub fn parallel_generic<B: Backend>(b: &B, rows: &[&[f64]], t: usize, width: usize) -> B::Vector {
    debug_assert!(!rows.is_empty());
    let one = b.splat(1.0);
    let r0 = b.load(&rows[0][t..t + width]);
    let mut acc = b.sub(one, r0);
    for row in &rows[1..] {
        let r = b.load(&row[t..t + width]);
        acc = b.fms(acc, acc, r);
    }
    b.sub(one, acc)
}

/// `O[t] = 1 - (1-r)^n`.
pub fn parallel_identical<B: Backend>(b: &B, r_row: &[f64], n: usize, t: usize, width: usize) -> B::Vector {
    debug_assert!(n >= 1);
    let one = b.splat(1.0);
    let r = b.load(&r_row[t..t + width]);
    let mut acc = b.sub(one, r);
    for _ in 1..n {
        acc = b.fms(acc, acc, r);
    }
    b.sub(one, acc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::scalar::ScalarBackend;

    #[test]
    fn scenario_2_three_components() {
        let b = ScalarBackend;
        let r0 = [0.1f64];
        let r1 = [0.2f64];
        let r2 = [0.3f64];
        let rows: Vec<&[f64]> = vec![&r0, &r1, &r2];
        let out = parallel_generic(&b, &rows, 0, 1);
        assert!((out - 0.496).abs() < 1e-9);
    }

    #[test]
    fn generic_matches_identical_for_equal_rows() {
        let b = ScalarBackend;
        let r = [0.6f64];
        let rows: Vec<&[f64]> = vec![&r, &r, &r, &r];
        let generic = parallel_generic(&b, &rows, 0, 1);
        let identical = parallel_identical(&b, &r, 4, 0, 1);
        assert!((generic - identical).abs() < 1e-12);
    }

    #[test]
    fn all_zero_is_zero_any_one_is_one() {
        let b = ScalarBackend;
        let zero = [0.0f64];
        let rows: Vec<&[f64]> = vec![&zero, &zero];
        assert_eq!(parallel_generic(&b, &rows, 0, 1), 0.0);

        let one = [1.0f64];
        let rows2: Vec<&[f64]> = vec![&zero, &one];
        assert_eq!(parallel_generic(&b, &rows2, 0, 1), 1.0);
    }
}
