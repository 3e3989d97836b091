//! Message passing between the workers of a distributed transform.
//!
//! The algorithm needs exactly two collective operations: a symmetric pairwise exchange of whole
//! blocks and a gather of all blocks at one rank. Any transport that provides them with blocking
//! semantics can run the transform.
//!
//! ## Available transports
//!
//! - [`channel::ChannelCommunicator`]: workers are threads of one process, connected by channels.
//! - [`tcp::TcpCommunicator`]: workers are separate processes (or hosts), connected by TCP.
use num_complex::Complex;

use crate::error::FftError;

pub mod channel;
pub mod tcp;

/// One worker's endpoint into a fixed group of `size()` workers.
pub trait Communicator<T> {
    /// This worker's rank, in `[0, size())`
    fn rank(&self) -> usize;

    /// Number of workers in the group
    fn size(&self) -> usize;

    /// Sends `send` to `partner` and fills `recv` with the block `partner` sent back.
    ///
    /// Both workers call this with each other as partner. Neither returns before both blocks
    /// have been delivered, and the call must not deadlock regardless of which side gets there
    /// first.
    ///
    /// # Errors
    ///
    /// Fails if there is no link to `partner`, the link breaks, or the received block does not
    /// have `recv.len()` samples.
    fn exchange(
        &mut self,
        partner: usize,
        send: &[Complex<T>],
        recv: &mut [Complex<T>],
    ) -> Result<(), FftError>;

    /// Collects every worker's `block` in rank order at `root`.
    ///
    /// All workers must call this with the same `root` and equally sized blocks. Returns the
    /// concatenated blocks at `root` and `None` everywhere else.
    ///
    /// # Errors
    ///
    /// Fails if a link breaks or a block has the wrong length.
    fn gather(
        &mut self,
        root: usize,
        block: &[Complex<T>],
    ) -> Result<Option<Vec<Complex<T>>>, FftError>;
}
