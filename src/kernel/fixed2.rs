//! Fixed 2-lane backend — maps onto a 128-bit double-pumped register
//! (`__m128d` on x86_64 via SSE2, which is baseline for that target and so
//! needs no runtime feature probe). Non-x86_64 targets get a plain
//! `[f64; 2]` fallback with identical arithmetic, so the formulas in
//! `topology/` never need to know which representation is live.

use super::Backend;

#[cfg(target_arch = "x86_64")]
mod repr {
    use core::arch::x86_64::*;

    #[derive(Clone, Copy)]
    pub struct V(pub __m128d);

    #[inline]
    pub fn splat(c: f64) -> V {
        V(unsafe { _mm_set1_pd(c) })
    }

    #[inline]
    pub fn load(src: &[f64]) -> V {
        if src.len() >= 2 {
            V(unsafe { _mm_loadu_pd(src.as_ptr()) })
        } else {
            V(unsafe { _mm_set_pd(0.0, src[0]) })
        }
    }

    #[inline]
    pub fn store(v: V, dst: &mut [f64]) {
        if dst.len() >= 2 {
            unsafe { _mm_storeu_pd(dst.as_mut_ptr(), v.0) };
        } else {
            let mut tmp = [0.0f64; 2];
            unsafe { _mm_storeu_pd(tmp.as_mut_ptr(), v.0) };
            dst[0] = tmp[0];
        }
    }

    #[inline]
    pub fn add(a: V, b: V) -> V {
        V(unsafe { _mm_add_pd(a.0, b.0) })
    }

    #[inline]
    pub fn sub(a: V, b: V) -> V {
        V(unsafe { _mm_sub_pd(a.0, b.0) })
    }

    #[inline]
    pub fn mul(a: V, b: V) -> V {
        V(unsafe { _mm_mul_pd(a.0, b.0) })
    }

    #[inline]
    pub fn fma(a: V, b: V, c: V) -> V {
        if is_x86_feature_detected!("fma") {
            #[target_feature(enable = "fma")]
            unsafe fn go(a: __m128d, b: __m128d, c: __m128d) -> __m128d {
                _mm_fmadd_pd(b, c, a)
            }
            V(unsafe { go(a.0, b.0, c.0) })
        } else {
            add(a, mul(b, c))
        }
    }

    #[inline]
    pub fn fms(a: V, b: V, c: V) -> V {
        if is_x86_feature_detected!("fma") {
            #[target_feature(enable = "fma")]
            unsafe fn go(a: __m128d, b: __m128d, c: __m128d) -> __m128d {
                _mm_fnmadd_pd(b, c, a)
            }
            V(unsafe { go(a.0, b.0, c.0) })
        } else {
            sub(a, mul(b, c))
        }
    }

    #[inline]
    pub fn cap(v: V) -> V {
        // NaN in `v` resolves to 0 here: max(0, NaN) then min(1, ...).
        let zero = splat(0.0);
        let one = splat(1.0);
        let maxed = V(unsafe { _mm_max_pd(v.0, zero.0) });
        V(unsafe { _mm_min_pd(maxed.0, one.0) })
    }
}

#[cfg(not(target_arch = "x86_64"))]
mod repr {
    #[derive(Clone, Copy)]
    pub struct V(pub [f64; 2]);

    #[inline]
    pub fn splat(c: f64) -> V {
        V([c, c])
    }

    #[inline]
    pub fn load(src: &[f64]) -> V {
        let mut d = [0.0; 2];
        let n = src.len().min(2);
        d[..n].copy_from_slice(&src[..n]);
        V(d)
    }

    #[inline]
    pub fn store(v: V, dst: &mut [f64]) {
        let n = dst.len().min(2);
        dst[..n].copy_from_slice(&v.0[..n]);
    }

    #[inline]
    pub fn add(a: V, b: V) -> V {
        V([a.0[0] + b.0[0], a.0[1] + b.0[1]])
    }

    #[inline]
    pub fn sub(a: V, b: V) -> V {
        V([a.0[0] - b.0[0], a.0[1] - b.0[1]])
    }

    #[inline]
    pub fn mul(a: V, b: V) -> V {
        V([a.0[0] * b.0[0], a.0[1] * b.0[1]])
    }

    #[inline]
    pub fn fma(a: V, b: V, c: V) -> V {
        V([
            f64::mul_add(b.0[0], c.0[0], a.0[0]),
            f64::mul_add(b.0[1], c.0[1], a.0[1]),
        ])
    }

    #[inline]
    pub fn fms(a: V, b: V, c: V) -> V {
        V([
            f64::mul_add(-b.0[0], c.0[0], a.0[0]),
            f64::mul_add(-b.0[1], c.0[1], a.0[1]),
        ])
    }

    #[inline]
    pub fn cap(v: V) -> V {
        V([
            v.0[0].max(0.0).min(1.0),
            v.0[1].max(0.0).min(1.0),
        ])
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Fixed2Backend;

impl Backend for Fixed2Backend {
    type Vector = repr::V;

    fn lanes(&self) -> usize {
        2
    }

    fn name(&self) -> &'static str {
        "fixed2"
    }

    fn splat(&self, c: f64) -> Self::Vector {
        repr::splat(c)
    }

    fn load(&self, src: &[f64]) -> Self::Vector {
        repr::load(src)
    }

    fn store(&self, v: Self::Vector, dst: &mut [f64]) {
        repr::store(v, dst)
    }

    fn add(&self, a: Self::Vector, b: Self::Vector) -> Self::Vector {
        repr::add(a, b)
    }

    fn sub(&self, a: Self::Vector, b: Self::Vector) -> Self::Vector {
        repr::sub(a, b)
    }

    fn mul(&self, a: Self::Vector, b: Self::Vector) -> Self::Vector {
        repr::mul(a, b)
    }

    fn fma(&self, a: Self::Vector, b: Self::Vector, c: Self::Vector) -> Self::Vector {
        repr::fma(a, b, c)
    }

    fn fms(&self, a: Self::Vector, b: Self::Vector, c: Self::Vector) -> Self::Vector {
        repr::fms(a, b, c)
    }

    fn cap(&self, v: Self::Vector) -> Self::Vector {
        repr::cap(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_two_lanes() {
        let b = Fixed2Backend;
        let v = b.load(&[0.25, 0.75]);
        let mut out = [0.0; 2];
        b.store(v, &mut out);
        assert_eq!(out, [0.25, 0.75]);
    }

    #[test]
    fn round_trip_one_lane() {
        let b = Fixed2Backend;
        let v = b.load(&[0.4]);
        let mut out = [0.0; 1];
        b.store(v, &mut out);
        assert_eq!(out[0], 0.4);
    }

    #[test]
    fn cap_maps_nan_to_zero() {
        let b = Fixed2Backend;
        let v = b.load(&[f64::NAN, 2.0]);
        let capped = b.cap(v);
        let mut out = [0.0; 2];
        b.store(capped, &mut out);
        assert_eq!(out, [0.0, 1.0]);
    }
}
