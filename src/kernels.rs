//! Radix-2 butterfly kernels.
//!
//! The kernels address samples by their *global* index so that the same code serves the serial
//! transform (a single block holding everything) and the workers of the distributed transform
//! (one block out of many).
use num_complex::Complex;

use crate::bits::{butterfly_pair, local_slot, reverse_bits};
use crate::twiddles::Twiddles;
use crate::FftFloat;

/// `(a, b) -> (a + w·b, a - w·b)`
#[inline(always)]
pub(crate) fn butterfly<T: FftFloat>(
    a: Complex<T>,
    b: Complex<T>,
    w: Complex<T>,
) -> (Complex<T>, Complex<T>) {
    let x = w * b;
    (a + x, a - x)
}

/// One stage of butterflies whose operands both live in `block`.
///
/// `block` holds global indices `[first_pair * 2, first_pair * 2 + block.len())` and
/// `first_pair` is the global number of the first butterfly it owns. For the serial transform
/// this is `0` and `block` is the whole buffer.
#[multiversion::multiversion(targets(
    "x86_64+avx512f+avx512bw+avx512cd+avx512dq+avx512vl",
    "x86_64+avx2+fma",
    "x86_64+sse4.2",
    "x86+avx512f+avx512bw+avx512cd+avx512dq+avx512vl",
    "x86+avx2+fma",
    "x86+sse4.2",
    "x86+sse2",
    "aarch64+neon",
))]
pub fn butterfly_stage<T: FftFloat>(
    block: &mut [Complex<T>],
    twiddles: &Twiddles<T>,
    stage: usize,
    first_pair: usize,
) {
    let log_n = twiddles.log_n();
    let local_len = block.len();

    for k in first_pair..first_pair + local_len / 2 {
        let (index0, index1) = butterfly_pair(k, log_n, stage);
        let w = twiddles.for_butterfly(index0, stage);

        let slot0 = local_slot(index0, local_len);
        let slot1 = local_slot(index1, local_len);

        let (z0, z1) = butterfly(block[slot0], block[slot1], w);
        block[slot0] = z0;
        block[slot1] = z1;
    }
}

/// Half of one cross-process stage: each worker holds one operand of every butterfly.
///
/// `base` is the global index of the first sample of the lower worker's block. The lower worker
/// keeps `own + w·received`, the upper one keeps `received - w·own`.
#[multiversion::multiversion(targets(
    "x86_64+avx512f+avx512bw+avx512cd+avx512dq+avx512vl",
    "x86_64+avx2+fma",
    "x86_64+sse4.2",
    "x86+avx512f+avx512bw+avx512cd+avx512dq+avx512vl",
    "x86+avx2+fma",
    "x86+sse4.2",
    "x86+sse2",
    "aarch64+neon",
))]
pub fn exchange_stage<T: FftFloat>(
    own: &mut [Complex<T>],
    received: &[Complex<T>],
    twiddles: &Twiddles<T>,
    stage: usize,
    base: usize,
    lower: bool,
) {
    assert_eq!(own.len(), received.len());

    own.iter_mut()
        .zip(received.iter())
        .enumerate()
        .for_each(|(k, (z_own, z_recv))| {
            let w = twiddles.for_butterfly(base + k, stage);
            *z_own = if lower {
                *z_own + w * *z_recv
            } else {
                *z_recv - w * *z_own
            };
        });
}

/// `result[k] = buf[reverse_bits(k, log_n)]`, restoring natural order after the stage loop.
pub fn bit_reverse_permutation<T: Copy>(buf: &[Complex<T>], log_n: usize) -> Vec<Complex<T>> {
    (0..buf.len())
        .map(|k| buf[reverse_bits(k, log_n)])
        .collect()
}
