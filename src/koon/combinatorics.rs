//! Binomial coefficients and lexicographic combination enumeration shared by
//! the identical-component closed forms and the generic enumeration backend.

/// Pascal's-triangle row for `n`: `binomials[i] = C(n, i)` for `i in 0..=n`.
pub fn binomials_for_identical_koon(n: usize) -> Vec<u64> {
    let mut row = vec![0u64; n + 1];
    row[0] = 1;
    for i in 1..=n {
        // Build right-to-left so `row[j]` still holds the previous row's
        // value for `row[j] + row[j-1]` when we reach index `j`.
        for j in (1..=i).rev() {
            row[j] += row[j - 1];
        }
    }
    row
}

/// All `k`-sized index combinations out of `0..n`, in lexicographic order.
///
/// This is the flat, ungrouped form of the component index table: every
/// combination lists exactly `k` distinct indices at multiplicity 1. Grouping
/// equal-reliability rows to skip redundant products is a valid optimization
/// but not required for correctness, so it's left for a future pass.
pub fn enumerate_koon_combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    if k == 0 {
        return vec![Vec::new()];
    }
    if k > n {
        return Vec::new();
    }

    let mut combos = Vec::new();
    let mut current: Vec<usize> = (0..k).collect();
    loop {
        combos.push(current.clone());
        if !next_combination(&mut current, n) {
            break;
        }
    }
    combos
}

/// Advances `combo` (sorted ascending, values in `0..n`) to the next
/// combination in lexicographic order. Returns `false` once `combo` was
/// already the last one.
fn next_combination(combo: &mut [usize], n: usize) -> bool {
    let k = combo.len();
    let mut i = k;
    loop {
        if i == 0 {
            return false;
        }
        i -= 1;
        if combo[i] != i + n - k {
            break;
        }
    }
    combo[i] += 1;
    for j in i + 1..k {
        combo[j] = combo[j - 1] + 1;
    }
    true
}
