//! Twiddle factor table.
//!
//! Every worker builds its own copy from the transform length alone. The construction is
//! deterministic, so all copies are identical without any communication.
use num_complex::Complex;

use crate::bits::{log2, twiddle_exponent};
use crate::error::FftError;
use crate::FftFloat;

/// The `N` roots of unity `exp(-2πi·j/N)` for a transform of length `N`.
#[derive(Debug, Clone, PartialEq)]
pub struct Twiddles<T> {
    roots: Vec<Complex<T>>,
    log_n: usize,
}

impl<T: FftFloat> Twiddles<T> {
    /// Build the table for a transform of `len` points.
    ///
    /// # Errors
    ///
    /// Returns [`FftError::InvalidLength`] if `len` is zero or not a power of two.
    pub fn new(len: usize) -> Result<Self, FftError> {
        if !len.is_power_of_two() {
            return Err(FftError::InvalidLength(len));
        }

        Ok(Self {
            roots: generate_twiddles(len),
            log_n: log2(len),
        })
    }

    /// Twiddle factor for the butterfly whose lower operand sits at global index `index0`.
    ///
    /// The stage loop walks bits from most to least significant, so the exponent is the
    /// bit-reversed prefix of `index0` rather than `index0` itself.
    #[inline]
    pub fn for_butterfly(&self, index0: usize, stage: usize) -> Complex<T> {
        self.roots[twiddle_exponent(index0, self.log_n, stage)]
    }
}

impl<T> Twiddles<T> {
    /// Length of the transform this table was built for
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Always `false`, a table holds at least one root.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// `log2` of [`Self::len`], the number of stages
    pub fn log_n(&self) -> usize {
        self.log_n
    }

    /// The whole table in natural order, `roots()[j] = exp(-2πij/N)`
    pub fn roots(&self) -> &[Complex<T>] {
        &self.roots
    }
}

/// `exp(-2πi·j/len)` for `j` in `0..len`.
///
/// Each root is evaluated directly from its angle instead of by repeated rotation, so large
/// tables don't accumulate rounding error.
pub(crate) fn generate_twiddles<T: FftFloat>(len: usize) -> Vec<Complex<T>> {
    let angle_mult = -T::TAU() / T::from_usize(len);
    (0..len)
        .map(|j| {
            let (sin, cos) = (angle_mult * T::from_usize(j)).sin_cos();
            Complex::new(cos, sin)
        })
        .collect()
}
