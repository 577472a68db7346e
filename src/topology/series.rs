//! Series topology: all components must work.

use crate::kernel::Backend;

/// `O[t] = R[0,t] * R[1,t] * ... * R[n-1,t]`, left-to-right.
pub fn series_generic<B: Backend>(b: &B, rows: &[&[f64]], t: usize, width: usize) -> B::Vector {
    debug_assert!(!rows.is_empty());
    let mut acc = b.load(&rows[0][t..t + width]);
    for row in &rows[1..] {
        let r = b.load(&row[t..t + width]);
        acc = b.mul(acc, r);
    }
    acc
}

/// `O[t] = r^n`, evaluated as `n - 1` multiplications (never `powf`), so this
/// agrees bit-for-bit with [`series_generic`] when every row equals `r`.
pub fn series_identical<B: Backend>(b: &B, r_row: &[f64], n: usize, t: usize, width: usize) -> B::Vector {
    debug_assert!(n >= 1);
    let r = b.load(&r_row[t..t + width]);
    let mut acc = r;
    for _ in 1..n {
        acc = b.mul(acc, r);
    }
    acc
}
