//! Integer helpers for power-of-two sizes, bit reversal and butterfly addressing.
//!
//! All the index arithmetic of the transforms lives here so that it can be checked in isolation.
//! Lengths are `2^log_n` and stages are counted from the most significant bit downward: stage
//! `j` combines elements whose indices differ only in bit `log_n - 1 - j`.

/// Exponent `e` such that `2^e == n`, found by repeated halving.
///
/// Only meaningful for powers of two; for other values this is `floor(log2(n))`.
#[inline]
pub const fn log2(n: usize) -> usize {
    let mut l = 0;
    let mut m = n;
    while m > 1 {
        m >>= 1;
        l += 1;
    }
    l
}

/// `2^e`
#[inline]
pub const fn pow2(e: usize) -> usize {
    1 << e
}

/// Reverses the low `nbits` bits of `x`. Bits above `nbits` are dropped.
#[inline]
pub const fn reverse_bits(x: usize, nbits: usize) -> usize {
    debug_assert!(nbits <= usize::BITS as usize);
    if nbits == 0 {
        return 0;
    }
    x.reverse_bits() >> (usize::BITS as usize - nbits)
}

/// Rank that `rank` trades its block with during cross-process stage `stage`.
///
/// Looks at bit `log2(workers) - 1 - stage` of `rank`: workers with the bit set pair with the
/// rank `workers >> (stage + 1)` below them, the others with the one as far above them.
#[inline]
pub const fn exchange_partner(rank: usize, workers: usize, stage: usize) -> usize {
    let p = log2(workers);
    debug_assert!(stage < p);
    let dist = workers >> (stage + 1);
    if (rank >> (p - 1 - stage)) & 1 == 1 {
        rank - dist
    } else {
        rank + dist
    }
}

/// Bit position that separates the two operands of a butterfly at `stage`.
#[inline]
pub const fn stage_shift(log_n: usize, stage: usize) -> usize {
    debug_assert!(stage < log_n);
    log_n - 1 - stage
}

/// Positions `(index0, index1)` combined by butterfly `k` of `stage`.
///
/// `index0` is `k` with a zero inserted at bit [`stage_shift`], `index1` has a one there.
#[inline]
pub const fn butterfly_pair(k: usize, log_n: usize, stage: usize) -> (usize, usize) {
    let shift = stage_shift(log_n, stage);
    let mask = (1 << shift) - 1;
    let index0 = ((k & !mask) << 1) | (k & mask);
    (index0, index0 + (1 << shift))
}

/// Index into the twiddle table for the butterfly whose lower operand is `index0`.
#[inline]
pub const fn twiddle_exponent(index0: usize, log_n: usize, stage: usize) -> usize {
    reverse_bits(index0 >> stage_shift(log_n, stage), log_n)
}

/// Storage slot of a global index inside a block of `local_len` samples.
#[inline]
pub const fn local_slot(global: usize, local_len: usize) -> usize {
    global % local_len
}
