//! In-process transport: every ordered pair of workers gets its own channel.
use std::sync::mpsc::{self, Receiver, Sender};

use num_complex::Complex;
use num_traits::Zero;

use crate::comm::Communicator;
use crate::error::FftError;

type Block<T> = Vec<Complex<T>>;

/// Endpoint of a worker that runs on a thread of the current process.
///
/// Channels are unbounded, so a send never blocks and an exchange is "send, then receive" on
/// both sides. Messages between two workers arrive in the order they were sent.
pub struct ChannelCommunicator<T> {
    rank: usize,
    // indexed by destination rank
    senders: Vec<Option<Sender<Block<T>>>>,
    // indexed by source rank
    receivers: Vec<Option<Receiver<Block<T>>>>,
}

impl<T: Send> ChannelCommunicator<T> {
    /// Fully connected group of `workers` endpoints, in rank order.
    pub fn mesh(workers: usize) -> Vec<Self> {
        let mut senders: Vec<Vec<Option<Sender<Block<T>>>>> = (0..workers)
            .map(|_| (0..workers).map(|_| None).collect())
            .collect();
        let mut receivers: Vec<Vec<Option<Receiver<Block<T>>>>> = (0..workers)
            .map(|_| (0..workers).map(|_| None).collect())
            .collect();

        for src in 0..workers {
            for dst in 0..workers {
                if src != dst {
                    let (tx, rx) = mpsc::channel();
                    senders[src][dst] = Some(tx);
                    receivers[dst][src] = Some(rx);
                }
            }
        }

        senders
            .into_iter()
            .zip(receivers)
            .enumerate()
            .map(|(rank, (senders, receivers))| Self {
                rank,
                senders,
                receivers,
            })
            .collect()
    }
}

impl<T: Copy> ChannelCommunicator<T> {
    fn send(&self, peer: usize, block: &[Complex<T>]) -> Result<(), FftError> {
        self.senders
            .get(peer)
            .and_then(Option::as_ref)
            .ok_or(FftError::InvalidPartner(peer))?
            .send(block.to_vec())
            .map_err(|_| FftError::Disconnected(peer))
    }

    fn recv(&self, peer: usize, out: &mut [Complex<T>]) -> Result<(), FftError> {
        let block = self
            .receivers
            .get(peer)
            .and_then(Option::as_ref)
            .ok_or(FftError::InvalidPartner(peer))?
            .recv()
            .map_err(|_| FftError::Disconnected(peer))?;

        if block.len() != out.len() {
            return Err(FftError::LengthMismatch(out.len(), block.len()));
        }
        out.copy_from_slice(&block);
        Ok(())
    }
}

impl<T: Copy + Zero> Communicator<T> for ChannelCommunicator<T> {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.senders.len()
    }

    fn exchange(
        &mut self,
        partner: usize,
        send: &[Complex<T>],
        recv: &mut [Complex<T>],
    ) -> Result<(), FftError> {
        self.send(partner, send)?;
        self.recv(partner, recv)
    }

    fn gather(
        &mut self,
        root: usize,
        block: &[Complex<T>],
    ) -> Result<Option<Vec<Complex<T>>>, FftError> {
        if root >= self.size() {
            return Err(FftError::InvalidRank(root, self.size()));
        }
        if self.rank != root {
            self.send(root, block)?;
            return Ok(None);
        }

        let local_len = block.len();
        let mut gathered = vec![Complex::new(T::zero(), T::zero()); local_len * self.size()];
        for (rank, chunk) in gathered.chunks_exact_mut(local_len.max(1)).enumerate() {
            if rank == root {
                chunk.copy_from_slice(block);
            } else {
                self.recv(rank, chunk)?;
            }
        }
        Ok(Some(gathered))
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    fn block(rank: usize, len: usize) -> Vec<Complex<f64>> {
        (0..len)
            .map(|k| Complex::new(rank as f64, k as f64))
            .collect()
    }

    #[test]
    fn mesh_ranks() {
        let mesh = ChannelCommunicator::<f64>::mesh(4);
        assert_eq!(mesh.len(), 4);
        for (rank, comm) in mesh.iter().enumerate() {
            assert_eq!(comm.rank(), rank);
            assert_eq!(comm.size(), 4);
        }
    }

    #[test]
    fn pairwise_exchange() {
        let mut mesh = ChannelCommunicator::<f64>::mesh(2);
        let mut b = mesh.pop().unwrap();
        let mut a = mesh.pop().unwrap();

        let handle = thread::spawn(move || {
            let mut recv = vec![Complex::zero(); 3];
            b.exchange(0, &block(1, 3), &mut recv).unwrap();
            recv
        });

        let mut recv = vec![Complex::zero(); 3];
        a.exchange(1, &block(0, 3), &mut recv).unwrap();

        assert_eq!(recv, block(1, 3));
        assert_eq!(handle.join().unwrap(), block(0, 3));
    }

    #[test]
    fn gather_in_rank_order() {
        let mesh = ChannelCommunicator::<f64>::mesh(4);
        let results: Vec<_> = thread::scope(|s| {
            let handles: Vec<_> = mesh
                .into_iter()
                .map(|mut comm| {
                    s.spawn(move || {
                        let rank = comm.rank();
                        comm.gather(0, &block(rank, 2)).unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let expected: Vec<_> = (0..4).flat_map(|rank| block(rank, 2)).collect();
        assert_eq!(results[0].as_ref(), Some(&expected));
        assert!(results[1..].iter().all(Option::is_none));
    }

    #[test]
    fn invalid_partner() {
        let mut mesh = ChannelCommunicator::<f64>::mesh(2);
        let mut recv = vec![Complex::zero(); 1];
        assert!(matches!(
            mesh[0].exchange(0, &block(0, 1), &mut recv),
            Err(FftError::InvalidPartner(0))
        ));
        assert!(matches!(
            mesh[0].exchange(5, &block(0, 1), &mut recv),
            Err(FftError::InvalidPartner(5))
        ));
    }

    #[test]
    fn dropped_peer_disconnects() {
        let mut mesh = ChannelCommunicator::<f64>::mesh(2);
        drop(mesh.pop());
        let mut recv = vec![Complex::zero(); 1];
        assert!(matches!(
            mesh[0].exchange(1, &block(0, 1), &mut recv),
            Err(FftError::Disconnected(1))
        ));
    }

    #[test]
    fn wrong_block_length() {
        let mesh = ChannelCommunicator::<f64>::mesh(2);
        mesh[1].send(0, &block(1, 3)).unwrap();
        let mut recv = vec![Complex::zero(); 2];
        assert!(matches!(
            mesh[0].recv(1, &mut recv),
            Err(FftError::LengthMismatch(2, 3))
        ));
    }
}
