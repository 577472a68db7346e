//! Five-component Bridge topology, with R5 as the crossover component.
//!
//! ```text
//! VAL1 = (R1 + R3 - R1*R3) * (R2 + R4 - R2*R4)
//! VAL2 = R1*R2 + R3*R4 - R1*R2*R3*R4
//! O    = R5*(VAL1 - VAL2) + VAL2
//! ```
//! This is the one Bridge formula this engine implements; it is algebraically
//! equivalent to the standard pivotal decomposition about R5 but only needs
//! products, sums, and a single final `fma`.

use crate::kernel::Backend;

/// `rows` must have exactly 5 entries, ordered R1..R5.
pub fn bridge_generic<B: Backend>(b: &B, rows: &[&[f64]; 5], t: usize, width: usize) -> B::Vector {
    let r1 = b.load(&rows[0][t..t + width]);
    let r2 = b.load(&rows[1][t..t + width]);
    let r3 = b.load(&rows[2][t..t + width]);
    let r4 = b.load(&rows[3][t..t + width]);
    let r5 = b.load(&rows[4][t..t + width]);

    let a = b.sub(b.add(r1, r3), b.mul(r1, r3));
    let c = b.sub(b.add(r2, r4), b.mul(r2, r4));
    let val1 = b.mul(a, c);

    let p12 = b.mul(r1, r2);
    let p34 = b.mul(r3, r4);
    let val2 = b.sub(b.add(p12, p34), b.mul(p12, p34));

    let diff = b.sub(val1, val2);
    b.fma(val2, r5, diff)
}

/// Closed form of [`bridge_generic`] with all five inputs equal to `r`. The
/// exact op sequence differs from feeding `r` into the generic path five
/// times, but both reduce to the same algebraic expression
/// `r*(2r-r^2)^2 + (1-r)*(2r^2-r^4)`; cross-backend/mode agreement is
/// expected within the wider 1e-11 tolerance noted for FMA-sensitive paths.
pub fn bridge_identical<B: Backend>(b: &B, r_row: &[f64], t: usize, width: usize) -> B::Vector {
    let r = b.load(&r_row[t..t + width]);
    let rr = b.mul(r, r);

    let two_r_minus_rr = b.sub(b.add(r, r), rr); // 2r - r^2
    let val1 = b.mul(two_r_minus_rr, two_r_minus_rr);

    let val2 = b.sub(b.add(rr, rr), b.mul(rr, rr)); // 2r^2 - r^4

    let diff = b.sub(val1, val2);
    b.fma(val2, r, diff)
}
