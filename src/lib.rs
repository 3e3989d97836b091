//! Radix-2 Cooley-Tukey FFT for power-of-two lengths, serial and distributed.
//!
//! The serial transform runs `log2(N)` stages of in-place butterflies over one buffer and then
//! restores natural order with a bit-reversal permutation.
//!
//! The distributed transform splits the sequence into `P` contiguous blocks, one per worker.
//! The first `log2(P)` stages pair samples that live on different workers, so each worker trades
//! its whole block with a partner and keeps one half of every butterfly. The remaining stages
//! stay inside a block and run exactly like the serial ones. The blocks are finally gathered at
//! rank [`ROOT`], which applies the permutation. Workers talk through a [`Communicator`], so the
//! same algorithm runs over in-process channels or TCP.
//!
//! ```
//! use distfft::{fft_serial, fft_threaded};
//! use num_complex::Complex64;
//!
//! let signal: Vec<Complex64> = (0..16)
//!     .map(|j| Complex64::new((2.0 * j as f64).sin(), (3.0 * j as f64).cos()))
//!     .collect();
//!
//! let serial = fft_serial(&signal).unwrap();
//! let distributed = fft_threaded(&signal, 4).unwrap();
//! assert!(serial
//!     .iter()
//!     .zip(&distributed)
//!     .all(|(a, b)| (a - b).norm() < 1e-9));
//! ```
use std::fmt::Debug;

use bytemuck::Pod;
use num_traits::{Float, FloatConst};

pub use crate::algorithms::distributed::{fft_distributed, fft_distributed_with_twiddles, ROOT};
pub use crate::algorithms::serial::{fft_serial, fft_serial_re_im, fft_serial_with_twiddles};
pub use crate::comm::channel::ChannelCommunicator;
pub use crate::comm::tcp::TcpCommunicator;
pub use crate::comm::Communicator;
pub use crate::error::FftError;
pub use crate::parallel::{fft_threaded, run_workers};
pub use crate::partition::Partition;
pub use crate::twiddles::Twiddles;

pub mod algorithms;
pub mod bits;
pub mod comm;
mod error;
pub mod kernels;
pub mod parallel;
pub mod partition;
pub mod twiddles;
pub mod utils;

/// Floating point types the transforms run on.
///
/// Implemented for `f32` and `f64`. `Pod` lets blocks travel over byte-oriented transports
/// without copying.
pub trait FftFloat: Float + FloatConst + Pod + Send + Sync + Debug + 'static {
    /// Lossy conversion used for indices and lengths
    fn from_usize(n: usize) -> Self;
}

macro_rules! impl_fft_float {
    ($($precision:ty),*) => {
        $(
            impl FftFloat for $precision {
                #[inline]
                fn from_usize(n: usize) -> Self {
                    n as $precision
                }
            }
        )*
    };
}

impl_fft_float!(f32, f64);
