//! Distributed-memory radix-2 FFT
//!
//! The sequence is split into `P` contiguous blocks, one per worker. Stage `j` pairs samples
//! `2^(log2(N) - 1 - j)` apart, so:
//!
//! 1. The first `log2(P)` stages pair samples owned by two different workers. Each worker trades
//!    its whole block with its partner and computes the half of every butterfly it keeps.
//! 2. The remaining stages only pair samples inside one block and run exactly like the serial
//!    stages, without any communication.
//! 3. The blocks, now holding the spectrum in bit-reversed order, are gathered at [`ROOT`], which
//!    restores natural order.
//!
//! Every exchange blocks until both partners have reached it, so the workers move through the
//! exchange stages in lock-step. The local stages run fully in parallel.
use std::ops::Range;

use num_complex::Complex;

use crate::bits::exchange_partner;
use crate::comm::Communicator;
use crate::error::FftError;
use crate::kernels::{bit_reverse_permutation, butterfly_stage, exchange_stage};
use crate::partition::Partition;
use crate::twiddles::Twiddles;
use crate::FftFloat;

/// Rank that receives the finished transform
pub const ROOT: usize = 0;

/// Runs this worker's part of a distributed FFT of `len` points.
///
/// Must be called collectively by every worker of `comm`. `input` is asked once for this worker's
/// block, given as the range of global indices it covers. Each worker builds its own twiddle
/// table.
///
/// Returns the spectrum in natural order at [`ROOT`] and `None` at every other rank.
///
/// # Errors
///
/// * configuration errors (see [`Partition::new`]) if `len` and `comm.size()` don't form a
///   valid partition, before anything is exchanged
/// * [`FftError::LengthMismatch`] if `input` returns a block of the wrong length
/// * communication errors from `comm`; the transform is abandoned
pub fn fft_distributed<T, C, F>(
    comm: &mut C,
    len: usize,
    input: F,
) -> Result<Option<Vec<Complex<T>>>, FftError>
where
    T: FftFloat,
    C: Communicator<T>,
    F: FnOnce(Range<usize>) -> Vec<Complex<T>>,
{
    let partition = Partition::new(len, comm.size())?;
    partition.check_rank(comm.rank())?;

    let twiddles = Twiddles::new(len)?;
    let block = input(partition.block(comm.rank()));
    fft_distributed_with_twiddles(comm, &partition, &twiddles, block)
}

/// Runs this worker's part of a distributed FFT on its own `block`.
///
/// # Errors
///
/// * [`FftError::WorkerCountMismatch`] if `comm` does not have `partition.workers()` workers
/// * [`FftError::InvalidRank`] if `comm.rank()` is not a rank of `partition`
/// * [`FftError::LengthMismatch`] if `block` or `twiddles` do not match `partition`
/// * communication errors from `comm`
pub fn fft_distributed_with_twiddles<T, C>(
    comm: &mut C,
    partition: &Partition,
    twiddles: &Twiddles<T>,
    mut block: Vec<Complex<T>>,
) -> Result<Option<Vec<Complex<T>>>, FftError>
where
    T: FftFloat,
    C: Communicator<T>,
{
    let rank = comm.rank();
    let workers = partition.workers();
    let local_len = partition.local_len();

    if comm.size() != workers {
        return Err(FftError::WorkerCountMismatch(workers, comm.size()));
    }
    partition.check_rank(rank)?;
    if block.len() != local_len {
        return Err(FftError::LengthMismatch(local_len, block.len()));
    }
    if twiddles.len() != partition.len() {
        return Err(FftError::LengthMismatch(partition.len(), twiddles.len()));
    }

    let mut received = vec![Complex::new(T::zero(), T::zero()); local_len];

    for stage in partition.exchange_stages() {
        let partner = exchange_partner(rank, workers, stage);
        comm.exchange(partner, &block, &mut received)?;

        let base = rank.min(partner) * local_len;
        exchange_stage(
            &mut block,
            &received,
            twiddles,
            stage,
            base,
            partner > rank,
        );
    }

    let first_pair = rank * local_len / 2;
    for stage in partition.local_stages() {
        butterfly_stage(&mut block, twiddles, stage, first_pair);
    }

    let gathered = comm.gather(ROOT, &block)?;
    Ok(gathered.map(|buf| bit_reverse_permutation(&buf, partition.log_n())))
}
