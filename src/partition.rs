//! How a transform of `N` points is split across `P` workers.
use std::ops::Range;

use crate::bits::log2;
use crate::error::FftError;

/// Validated `(N, P)` configuration of a distributed transform.
///
/// Worker `rank` owns the contiguous block of `N / P` samples starting at global index
/// `rank * N / P`. Of the `log2(N)` stages, the first `log2(P)` combine samples from two
/// different blocks and the rest stay inside one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    len: usize,
    workers: usize,
    log_n: usize,
    log_workers: usize,
}

impl Partition {
    /// # Errors
    ///
    /// * [`FftError::InvalidLength`] if `len` is zero or not a power of two
    /// * [`FftError::InvalidWorkerCount`] if `workers` is zero or not a power of two
    /// * [`FftError::TooManyWorkers`] if `workers > len`
    pub fn new(len: usize, workers: usize) -> Result<Self, FftError> {
        if !len.is_power_of_two() {
            return Err(FftError::InvalidLength(len));
        }
        if !workers.is_power_of_two() {
            return Err(FftError::InvalidWorkerCount(workers));
        }
        if workers > len {
            return Err(FftError::TooManyWorkers(workers, len));
        }

        Ok(Self {
            len,
            workers,
            log_n: log2(len),
            log_workers: log2(workers),
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`, a partition covers at least one sample.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Number of stages, `log2(N)`
    pub fn log_n(&self) -> usize {
        self.log_n
    }

    /// Samples per worker, `N / P`
    pub fn local_len(&self) -> usize {
        self.len >> self.log_workers
    }

    /// Global indices owned by `rank`
    pub fn block(&self, rank: usize) -> Range<usize> {
        let start = rank * self.local_len();
        start..start + self.local_len()
    }

    /// Stages whose butterflies span two workers
    pub fn exchange_stages(&self) -> Range<usize> {
        0..self.log_workers
    }

    /// Stages whose butterflies stay inside one block
    pub fn local_stages(&self) -> Range<usize> {
        self.log_workers..self.log_n
    }

    /// # Errors
    ///
    /// Returns [`FftError::InvalidRank`] if `rank` is not one of this partition's workers.
    pub fn check_rank(&self, rank: usize) -> Result<(), FftError> {
        if rank < self.workers {
            Ok(())
        } else {
            Err(FftError::InvalidRank(rank, self.workers))
        }
    }
}
