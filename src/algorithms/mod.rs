//! FFT Algorithm Implementations
//!
//! Both algorithms run the same radix-2 stages: input in natural order, butterflies from the
//! largest distance (`N/2`) down to `1`, output bit-reversed until the final permutation.
//!
//! ## Available Algorithms
//!
//! - **Serial**: all stages over one buffer in a single thread of control.
//!
//! - **Distributed**: the buffer is split into one block per worker. Stages whose butterflies
//!   span two blocks are computed after a pairwise exchange of blocks; the others run locally
//!   exactly like the serial stages. The result is assembled at a single root worker.

pub mod distributed;
pub mod serial;
