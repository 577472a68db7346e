//! K-out-of-N decomposition for non-identical components (§4.2-4.3): a
//! brute-force combinatorial enumeration path, and a recursive best-split
//! decomposition whose pivot width adapts to `min(k-1, n-k)` at every level
//! and memoizes repeated `(remaining length, k)` subproblems, keeping total
//! work polynomial in `n` instead of the exponential blow-up a fixed pivot
//! width (or an unmemoized adaptive split) would hit for `k` near `n/2`.

pub mod combinatorics;
pub mod enumeration;
pub mod recursion;
