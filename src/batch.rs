//! Worker/batching layer (§4.4): each worker `batchIdx` owns time slots
//! `t = batchIdx*L, batchIdx*L + W*L, batchIdx*L + 2*W*L, ...` — an
//! interleaved stride of `W*L`, not a contiguous chunk — stopping as soon as
//! the next wide block would exceed `numTimes`. Since `{batchIdx + m*W :
//! batchIdx in 0..W, m >= 0}` covers every non-negative integer exactly once,
//! this partitions every full `L`-wide block across workers with no overlap
//! and no gap; only the trailing remainder shorter than `L` (if `numTimes`
//! isn't a multiple of `L`) is left over, and worker 0 sweeps that up one
//! scalar slot at a time after its own strided loop finishes. Capping happens
//! exactly once here, right before the store, never inside a topology step
//! function.

use crate::kernel::Backend;
use crate::platform::pool::ThreadPool;
use crate::platform::prefetch::Prefetcher;

/// Runs `step` over every time index in `0..len`, writing capped results
/// into `out`. Each worker walks its own interleaved stride of
/// `num_workers * backend.lanes()`.
///
/// `step(t, width)` must return an uncapped `B::Vector` computed from lanes
/// `t..t+width` of the caller's input rows.
pub fn evaluate_strided<B, F, P, T>(
    backend: &B,
    pool: &T,
    prefetcher: &P,
    len: usize,
    out: &mut [f64],
    step: F,
) where
    B: Backend + Sync,
    F: Fn(&B, usize, usize) -> B::Vector + Sync,
    P: Prefetcher + Sync,
    T: ThreadPool + ?Sized,
{
    debug_assert_eq!(out.len(), len);
    if len == 0 {
        return;
    }

    let num_workers = pool.num_workers().max(1).min(len.max(1));
    let lanes = backend.lanes();
    let stride = num_workers * lanes;

    // `out` is split by `position mod stride` below — disjoint across
    // workers — so the raw pointer only ever gets written at indices a given
    // worker owns exclusively; wrap it so the closure handed to `par_for`
    // can be `Sync` even though `*mut f64` isn't.
    struct SyncPtr(*mut f64);
    unsafe impl Sync for SyncPtr {}
    let out_ptr = SyncPtr(out.as_mut_ptr());

    pool.par_for(num_workers, &|worker| {
        let mut t = worker * lanes;
        while t + lanes <= len {
            let next = t + stride;
            if next < len {
                // SAFETY: a single-element view at `next`, strictly within
                // `out`'s allocation; prefetch never dereferences it.
                let hint = unsafe { std::slice::from_raw_parts(out_ptr.0.add(next), 1) };
                prefetcher.prefetch(hint, 0);
            }
            let raw = step(backend, t, lanes);
            let capped = backend.cap(raw);
            // SAFETY: indices `t..t+lanes` belong to this worker alone —
            // `position mod stride` uniquely identifies the owning worker,
            // so no other worker ever touches this range.
            let dst = unsafe { std::slice::from_raw_parts_mut(out_ptr.0.add(t), lanes) };
            backend.store(capped, dst);
            t += stride;
        }

        // The strided loops above collectively cover every full L-wide
        // block; only a final remainder shorter than L (if any) is left,
        // handled here by a single designated worker, one scalar slot at a
        // time, so it's never double-processed.
        if worker == 0 {
            let tail_start = (len / lanes) * lanes;
            for tt in tail_start..len {
                let raw = step(backend, tt, 1);
                let capped = backend.cap(raw);
                // SAFETY: `tt` is in the tail region, untouched by any
                // worker's strided loop above.
                let dst = unsafe { std::slice::from_raw_parts_mut(out_ptr.0.add(tt), 1) };
                backend.store(capped, dst);
            }
        }
    });
}
