//! Errors reported by the transforms and the message-passing layer
use std::error::Error;
use std::fmt::Formatter;

/// Everything that can stop a transform.
///
/// Configuration errors are detected before any butterfly runs. Communication errors abort the
/// whole computation; there is no partial result and nothing is retried.
#[derive(Debug)]
pub enum FftError {
    /// Transform length is zero or not a power of two
    InvalidLength(usize),
    /// Worker count is zero or not a power of two
    InvalidWorkerCount(usize),
    /// More workers than samples: `(workers, len)`
    TooManyWorkers(usize, usize),
    /// Rank outside of `[0, workers)`: `(rank, workers)`
    InvalidRank(usize, usize),
    /// Communicator size does not match the partition: `(expected, actual)`
    WorkerCountMismatch(usize, usize),
    /// Buffer or message has the wrong number of samples: `(expected, actual)`
    LengthMismatch(usize, usize),
    /// No link exists to this peer
    InvalidPartner(usize),
    /// Peer went away before the exchange completed
    Disconnected(usize),
    /// Transport I/O failure
    Io(std::io::Error),
    /// Worker thread panicked
    WorkerPanicked(usize),
    /// Root worker finished without producing the gathered result
    MissingResult,
}

impl Error for FftError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FftError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for FftError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FftError::InvalidLength(len) => f.write_fmt(format_args!(
                "Transform length must be a non-zero power of two, but it was {len}"
            )),
            FftError::InvalidWorkerCount(workers) => f.write_fmt(format_args!(
                "Worker count must be a non-zero power of two, but it was {workers}"
            )),
            FftError::TooManyWorkers(workers, len) => f.write_fmt(format_args!(
                "Cannot split {len} samples across {workers} workers"
            )),
            FftError::InvalidRank(rank, workers) => f.write_fmt(format_args!(
                "Rank {rank} is out of range for {workers} workers"
            )),
            FftError::WorkerCountMismatch(expected, actual) => f.write_fmt(format_args!(
                "Expected {expected} workers, but the communicator has {actual}"
            )),
            FftError::LengthMismatch(expected, actual) => f.write_fmt(format_args!(
                "Expected {expected} samples, but got {actual}"
            )),
            FftError::InvalidPartner(peer) => {
                f.write_fmt(format_args!("No link to worker {peer}"))
            }
            FftError::Disconnected(peer) => {
                f.write_fmt(format_args!("Worker {peer} disconnected during an exchange"))
            }
            FftError::Io(err) => f.write_fmt(format_args!("Transport failure: {err}")),
            FftError::WorkerPanicked(rank) => f.write_fmt(format_args!("Worker {rank} panicked")),
            FftError::MissingResult => f.write_str("Root worker produced no result"),
        }
    }
}

impl From<std::io::Error> for FftError {
    fn from(err: std::io::Error) -> Self {
        FftError::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_values() {
        assert_eq!(
            FftError::TooManyWorkers(16, 8).to_string(),
            "Cannot split 8 samples across 16 workers"
        );
        assert_eq!(
            FftError::LengthMismatch(4, 3).to_string(),
            "Expected 4 samples, but got 3"
        );
    }

    #[test]
    fn io_errors_keep_their_source() {
        let err: FftError = std::io::Error::other("boom").into();
        assert!(err.source().is_some());
        assert!(FftError::MissingResult.source().is_none());
    }
}
