//! Software prefetch hints for the batching layer's strided time-axis walk.
//! Purely advisory: every implementation here is allowed to be a no-op.

/// Issues a prefetch hint for an address the batching loop will touch a few
/// strides ahead. Implementations must never fault on an out-of-bounds or
/// unmapped-adjacent address; that's the whole point of a hint.
pub trait Prefetcher {
    fn prefetch(&self, data: &[f64], offset: usize);
}

/// Default no-op prefetcher, used on targets without a cheap prefetch
/// intrinsic or when the caller doesn't care to wire one in.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopPrefetcher;

impl Prefetcher for NoopPrefetcher {
    #[inline(always)]
    fn prefetch(&self, _data: &[f64], _offset: usize) {}
}

#[cfg(target_arch = "x86_64")]
pub use x86::X86Prefetcher;

#[cfg(target_arch = "x86_64")]
mod x86 {
    use super::Prefetcher;
    use std::arch::x86_64::{_mm_prefetch, _MM_HINT_T0};

    #[derive(Clone, Copy, Debug, Default)]
    pub struct X86Prefetcher;

    impl Prefetcher for X86Prefetcher {
        #[inline(always)]
        fn prefetch(&self, data: &[f64], offset: usize) {
            if offset >= data.len() {
                return;
            }
            unsafe {
                let ptr = data.as_ptr().add(offset) as *const i8;
                _mm_prefetch(ptr, _MM_HINT_T0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_prefetcher_never_panics_out_of_bounds() {
        let p = NoopPrefetcher;
        p.prefetch(&[1.0, 2.0], 100);
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn x86_prefetcher_ignores_out_of_bounds_offset() {
        let p = X86Prefetcher;
        let data = [1.0, 2.0, 3.0];
        p.prefetch(&data, 0);
        p.prefetch(&data, 1000);
    }
}
