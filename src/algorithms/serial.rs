//! Serial radix-2 FFT
//!
//! Input is processed in natural order. After the `log2(N)` stages the buffer holds the spectrum
//! in bit-reversed order, which a separate permutation pass turns into natural order.
use num_complex::Complex;

use crate::bits::log2;
use crate::error::FftError;
use crate::kernels::{bit_reverse_permutation, butterfly_stage};
use crate::twiddles::Twiddles;
use crate::utils::{combine_re_im, deinterleave_complex};
use crate::FftFloat;

/// Forward FFT of `signal`, returned in natural order.
///
/// # Errors
///
/// Returns [`FftError::InvalidLength`] if the length of `signal` is zero or not a power of two.
pub fn fft_serial<T: FftFloat>(signal: &[Complex<T>]) -> Result<Vec<Complex<T>>, FftError> {
    let twiddles = Twiddles::new(signal.len())?;
    let mut buffer = signal.to_vec();
    fft_serial_with_twiddles(&mut buffer, &twiddles)
}

/// Forward FFT with a pre-computed twiddle table.
///
/// `buffer` is used as the working area and is left in bit-reversed order; the
/// naturally-ordered result is returned.
///
/// # Errors
///
/// * [`FftError::InvalidLength`] if `buffer.len()` is zero or not a power of two
/// * [`FftError::LengthMismatch`] if `twiddles` was built for another length
pub fn fft_serial_with_twiddles<T: FftFloat>(
    buffer: &mut [Complex<T>],
    twiddles: &Twiddles<T>,
) -> Result<Vec<Complex<T>>, FftError> {
    let len = buffer.len();
    if !len.is_power_of_two() {
        return Err(FftError::InvalidLength(len));
    }
    if twiddles.len() != len {
        return Err(FftError::LengthMismatch(len, twiddles.len()));
    }

    let log_n = log2(len);
    for stage in 0..log_n {
        butterfly_stage(buffer, twiddles, stage, 0);
    }

    Ok(bit_reverse_permutation(buffer, log_n))
}

/// Forward FFT on separate real and imaginary buffers, in place.
///
/// # Errors
///
/// * [`FftError::LengthMismatch`] if `reals.len() != imags.len()`
/// * [`FftError::InvalidLength`] if the length is zero or not a power of two
pub fn fft_serial_re_im<T: FftFloat>(reals: &mut [T], imags: &mut [T]) -> Result<(), FftError> {
    if reals.len() != imags.len() {
        return Err(FftError::LengthMismatch(reals.len(), imags.len()));
    }

    let spectrum = fft_serial(&combine_re_im(reals, imags))?;
    let (out_re, out_im) = deinterleave_complex(&spectrum);
    reals.copy_from_slice(&out_re);
    imags.copy_from_slice(&out_im);
    Ok(())
}
