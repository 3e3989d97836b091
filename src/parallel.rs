//! Running a group of workers on threads of the current process

use std::thread;

use num_complex::Complex;

use crate::algorithms::distributed::{fft_distributed, ROOT};
use crate::comm::channel::ChannelCommunicator;
use crate::error::FftError;
use crate::partition::Partition;
use crate::FftFloat;

/// Runs `worker` once per communicator, each on its own scoped thread, and collects the results
/// in rank order.
///
/// # Errors
///
/// Returns [`FftError::WorkerPanicked`] with the lowest rank whose thread panicked.
pub fn run_workers<C, R, F>(comms: Vec<C>, worker: F) -> Result<Vec<R>, FftError>
where
    C: Send,
    R: Send,
    F: Fn(C) -> R + Sync,
{
    thread::scope(|s| {
        let handles: Vec<_> = comms
            .into_iter()
            .map(|comm| {
                let worker = &worker;
                s.spawn(move || worker(comm))
            })
            .collect();

        // join every thread before looking at the results, a panicked thread left unjoined
        // would make the scope itself panic
        let joined: Vec<_> = handles.into_iter().map(|handle| handle.join()).collect();
        joined
            .into_iter()
            .enumerate()
            .map(|(rank, result)| result.map_err(|_| FftError::WorkerPanicked(rank)))
            .collect()
    })
}

/// Distributed FFT of `signal` on `workers` threads connected by channels.
///
/// Every worker slices its own block out of `signal`; the spectrum gathered at [`ROOT`] is
/// returned.
///
/// # Errors
///
/// Any configuration or communication error of the workers. If several workers fail, the error
/// of the lowest rank is returned.
pub fn fft_threaded<T: FftFloat>(
    signal: &[Complex<T>],
    workers: usize,
) -> Result<Vec<Complex<T>>, FftError> {
    Partition::new(signal.len(), workers)?;

    let mesh = ChannelCommunicator::mesh(workers);
    let results = run_workers(mesh, |mut comm| {
        fft_distributed(&mut comm, signal.len(), |range| signal[range].to_vec())
    })?;

    let mut root = None;
    for (rank, result) in results.into_iter().enumerate() {
        let output = result?;
        if rank == ROOT {
            root = output;
        }
    }
    root.ok_or(FftError::MissingResult)
}
