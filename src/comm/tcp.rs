//! TCP transport for workers running as separate processes.
//!
//! Every pair of workers shares one stream. The higher rank connects to the lower rank's listener
//! and announces itself with its rank as a little-endian `u64`. A block travels as a frame: the
//! sample count as a little-endian `u64`, followed by the raw samples. Samples are sent in native
//! byte order, so all workers must run on machines of the same endianness.
use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use bytemuck::{cast_slice, cast_slice_mut};
use num_complex::Complex;

use crate::comm::Communicator;
use crate::error::FftError;
use crate::FftFloat;

/// Peers are started independently, so a listener may not be up yet when we dial it.
const CONNECT_ATTEMPTS: usize = 50;
const CONNECT_BACKOFF: Duration = Duration::from_millis(100);

/// Endpoint of a worker connected to its peers over TCP.
#[derive(Debug)]
pub struct TcpCommunicator {
    rank: usize,
    // indexed by peer rank, `None` at our own rank
    streams: Vec<Option<TcpStream>>,
}

impl TcpCommunicator {
    /// Connects worker `rank` to every other worker.
    ///
    /// `peers[r]` is the address worker `r` listens on and `listener` must be bound to
    /// `peers[rank]`. Blocks until the whole mesh is established.
    ///
    /// # Errors
    ///
    /// * [`FftError::InvalidRank`] if `rank >= peers.len()`
    /// * [`FftError::InvalidPartner`] if an incoming connection announces an unexpected rank
    /// * [`FftError::Io`] if a connection cannot be established
    pub fn connect(
        rank: usize,
        listener: &TcpListener,
        peers: &[SocketAddr],
    ) -> Result<Self, FftError> {
        let size = peers.len();
        if rank >= size {
            return Err(FftError::InvalidRank(rank, size));
        }

        let mut streams: Vec<Option<TcpStream>> = (0..size).map(|_| None).collect();

        for (peer, addr) in peers.iter().enumerate().take(rank) {
            let mut stream = dial(*addr)?;
            stream.write_all(&(rank as u64).to_le_bytes())?;
            stream.set_nodelay(true)?;
            streams[peer] = Some(stream);
        }

        for _ in rank + 1..size {
            let (mut stream, _) = listener.accept()?;
            let mut id = [0u8; 8];
            stream.read_exact(&mut id)?;
            let peer = u64::from_le_bytes(id) as usize;
            if peer <= rank || peer >= size || streams[peer].is_some() {
                return Err(FftError::InvalidPartner(peer));
            }
            stream.set_nodelay(true)?;
            streams[peer] = Some(stream);
        }

        Ok(Self { rank, streams })
    }

    fn stream(&mut self, peer: usize) -> Result<&mut TcpStream, FftError> {
        self.streams
            .get_mut(peer)
            .and_then(Option::as_mut)
            .ok_or(FftError::InvalidPartner(peer))
    }
}

fn dial(addr: SocketAddr) -> Result<TcpStream, FftError> {
    let mut attempt = 1;
    loop {
        match TcpStream::connect(addr) {
            Ok(stream) => return Ok(stream),
            Err(err) if attempt < CONNECT_ATTEMPTS => {
                if err.kind() != io::ErrorKind::ConnectionRefused {
                    return Err(err.into());
                }
                attempt += 1;
                thread::sleep(CONNECT_BACKOFF);
            }
            Err(err) => return Err(err.into()),
        }
    }
}

fn write_block<T: FftFloat>(stream: &mut impl Write, block: &[Complex<T>]) -> io::Result<()> {
    stream.write_all(&(block.len() as u64).to_le_bytes())?;
    stream.write_all(cast_slice(block))?;
    stream.flush()
}

fn read_block<T: FftFloat>(
    stream: &mut impl Read,
    peer: usize,
    out: &mut [Complex<T>],
) -> Result<(), FftError> {
    let mut header = [0u8; 8];
    read_exact(stream, peer, &mut header)?;
    let len = u64::from_le_bytes(header) as usize;
    if len != out.len() {
        return Err(FftError::LengthMismatch(out.len(), len));
    }
    read_exact(stream, peer, cast_slice_mut(out))
}

fn read_exact(stream: &mut impl Read, peer: usize, buf: &mut [u8]) -> Result<(), FftError> {
    stream.read_exact(buf).map_err(|err| match err.kind() {
        io::ErrorKind::UnexpectedEof => FftError::Disconnected(peer),
        _ => FftError::Io(err),
    })
}

impl<T: FftFloat> Communicator<T> for TcpCommunicator {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.streams.len()
    }

    /// Writes on a helper thread while reading on the calling one, so two workers exchanging
    /// blocks larger than the socket buffers cannot block each other.
    fn exchange(
        &mut self,
        partner: usize,
        send: &[Complex<T>],
        recv: &mut [Complex<T>],
    ) -> Result<(), FftError> {
        let stream = self.stream(partner)?;
        let mut writer = stream.try_clone()?;

        thread::scope(|s| -> Result<(), FftError> {
            let sending = s.spawn(move || write_block(&mut writer, send));

            let received = read_block(&mut *stream, partner, recv);
            if received.is_err() {
                // unblock the writer if the peer stopped reading
                let _ = stream.shutdown(Shutdown::Both);
            }

            let sent = sending
                .join()
                .map_err(|_| io::Error::other("sender thread panicked"))?;
            received?;
            sent.map_err(FftError::from)
        })
    }

    fn gather(
        &mut self,
        root: usize,
        block: &[Complex<T>],
    ) -> Result<Option<Vec<Complex<T>>>, FftError> {
        let size = self.streams.len();
        if root >= size {
            return Err(FftError::InvalidRank(root, size));
        }
        if self.rank != root {
            write_block(self.stream(root)?, block)?;
            return Ok(None);
        }

        let local_len = block.len();
        let mut gathered = vec![Complex::new(T::zero(), T::zero()); local_len * size];
        for (rank, chunk) in gathered.chunks_exact_mut(local_len.max(1)).enumerate() {
            if rank == root {
                chunk.copy_from_slice(block);
            } else {
                read_block(self.stream(rank)?, rank, chunk)?;
            }
        }
        Ok(Some(gathered))
    }
}

#[cfg(test)]
mod tests {
    use utilities::{assert_float_closeness, gen_random_signal};

    use super::*;
    use crate::algorithms::distributed::{fft_distributed, ROOT};
    use crate::algorithms::serial::fft_serial;

    /// Binds one listener per worker on an ephemeral localhost port.
    fn listeners(workers: usize) -> (Vec<TcpListener>, Vec<SocketAddr>) {
        let listeners: Vec<_> = (0..workers)
            .map(|_| TcpListener::bind("127.0.0.1:0").unwrap())
            .collect();
        let addrs = listeners.iter().map(|l| l.local_addr().unwrap()).collect();
        (listeners, addrs)
    }

    fn block(rank: usize, len: usize) -> Vec<Complex<f64>> {
        (0..len)
            .map(|k| Complex::new(rank as f64, -(k as f64)))
            .collect()
    }

    #[test]
    fn mesh_and_gather() {
        let (listeners, addrs) = listeners(4);
        let results: Vec<_> = thread::scope(|s| {
            let handles: Vec<_> = listeners
                .iter()
                .enumerate()
                .map(|(rank, listener)| {
                    let addrs = &addrs;
                    s.spawn(move || {
                        let mut comm = TcpCommunicator::connect(rank, listener, addrs).unwrap();
                        assert_eq!(Communicator::<f64>::rank(&comm), rank);
                        assert_eq!(Communicator::<f64>::size(&comm), 4);
                        comm.gather(0, &block(rank, 3)).unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let expected: Vec<_> = (0..4).flat_map(|rank| block(rank, 3)).collect();
        assert_eq!(results[0].as_ref(), Some(&expected));
        assert!(results[1..].iter().all(Option::is_none));
    }

    #[test]
    fn large_exchange_does_not_deadlock() {
        // far larger than any socket buffer
        const LEN: usize = 1 << 20;
        let (listeners, addrs) = listeners(2);
        let received: Vec<_> = thread::scope(|s| {
            let handles: Vec<_> = listeners
                .iter()
                .enumerate()
                .map(|(rank, listener)| {
                    let addrs = &addrs;
                    s.spawn(move || {
                        let mut comm = TcpCommunicator::connect(rank, listener, addrs).unwrap();
                        let mut recv = vec![Complex::new(0.0, 0.0); LEN];
                        comm.exchange(1 - rank, &block(rank, LEN), &mut recv)
                            .unwrap();
                        recv
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(received[0], block(1, LEN));
        assert_eq!(received[1], block(0, LEN));
    }

    #[test]
    fn distributed_fft_over_tcp() {
        let signal = gen_random_signal::<f64>(1 << 12);
        let serial = fft_serial(&signal).unwrap();

        for workers in [1, 2, 4, 8] {
            let (listeners, addrs) = listeners(workers);
            let results: Vec<_> = thread::scope(|s| {
                let handles: Vec<_> = listeners
                    .iter()
                    .enumerate()
                    .map(|(rank, listener)| {
                        let addrs = &addrs;
                        let signal = &signal;
                        s.spawn(move || {
                            let mut comm =
                                TcpCommunicator::connect(rank, listener, addrs).unwrap();
                            fft_distributed(&mut comm, signal.len(), |range| {
                                signal[range].to_vec()
                            })
                            .unwrap()
                        })
                    })
                    .collect();
                handles.into_iter().map(|h| h.join().unwrap()).collect()
            });

            let root = results[ROOT].as_ref().unwrap();
            assert_eq!(root.len(), serial.len());
            root.iter().zip(serial.iter()).for_each(|(a, e)| {
                assert_float_closeness(a.re, e.re, 1e-9);
                assert_float_closeness(a.im, e.im, 1e-9);
            });
            assert!(results.iter().skip(1).all(Option::is_none));
        }
    }

    #[test]
    fn closed_peer_disconnects() {
        let (listeners, addrs) = listeners(2);
        let result = thread::scope(|s| {
            let peer = s.spawn(|| {
                // connect, then leave without exchanging anything
                TcpCommunicator::connect(1, &listeners[1], &addrs).unwrap();
            });
            let mut comm = TcpCommunicator::connect(0, &listeners[0], &addrs).unwrap();
            peer.join().unwrap();
            let mut recv = vec![Complex::new(0.0, 0.0); 4];
            comm.exchange(1, &block(0, 4), &mut recv)
        });

        assert!(matches!(
            result,
            Err(FftError::Disconnected(1)) | Err(FftError::Io(_))
        ));
    }

    #[test]
    fn rank_out_of_range() {
        let (listeners, addrs) = listeners(2);
        assert!(matches!(
            TcpCommunicator::connect(2, &listeners[0], &addrs),
            Err(FftError::InvalidRank(2, 2))
        ));
    }
}
