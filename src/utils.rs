//! Conversions between interleaved complex buffers and separate real/imaginary buffers
use bytemuck::cast_slice;
use num_complex::Complex;

use crate::FftFloat;

/// Separates `[z0, z1, ...]` into `([z0.re, z1.re, ...], [z0.im, z1.im, ...])`
pub fn deinterleave_complex<T: FftFloat>(signal: &[Complex<T>]) -> (Vec<T>, Vec<T>) {
    let scalars: &[T] = cast_slice(signal);
    scalars.chunks_exact(2).map(|c| (c[0], c[1])).unzip()
}

/// Combines separate real and imaginary buffers into one complex buffer.
///
/// # Panics
///
/// Panics if `reals.len() != imags.len()`.
pub fn combine_re_im<T: FftFloat>(reals: &[T], imags: &[T]) -> Vec<Complex<T>> {
    assert_eq!(reals.len(), imags.len());

    reals
        .iter()
        .zip(imags.iter())
        .map(|(z_re, z_im)| Complex::new(*z_re, *z_im))
        .collect()
}
