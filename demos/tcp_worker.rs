//! One worker of a distributed FFT over TCP. Start one process per address, e.g.
//!
//! ```text
//! tcp_worker 0 14 127.0.0.1:7000,127.0.0.1:7001 &
//! tcp_worker 1 14 127.0.0.1:7000,127.0.0.1:7001
//! ```
//!
//! Usage: `tcp_worker <rank> <log_n> <addr0,addr1,...>`
use std::env;
use std::net::{SocketAddr, TcpListener};
use std::str::FromStr;
use std::time::Instant;

use distfft::{fft_distributed, fft_serial, TcpCommunicator, ROOT};
use utilities::{test_signal, transform_error};

fn main() {
    let args: Vec<String> = env::args().collect();
    assert!(
        args.len() >= 4,
        "Usage {} <rank> <log_n> <addr0,addr1,...>",
        args[0]
    );

    let rank = usize::from_str(&args[1]).unwrap();
    let log_n = usize::from_str(&args[2]).unwrap();
    let peers: Vec<SocketAddr> = args[3]
        .split(',')
        .map(|addr| SocketAddr::from_str(addr).unwrap())
        .collect();
    assert!(
        rank < peers.len(),
        "rank {rank} out of range for {} workers",
        peers.len()
    );
    let big_n = 1 << log_n;

    let listener = TcpListener::bind(peers[rank]).unwrap();
    let mut comm = TcpCommunicator::connect(rank, &listener, &peers).unwrap();

    // every worker computes the whole input series and keeps its own slice
    let signal = test_signal::<f64>(big_n);

    let now = Instant::now();
    let result = fft_distributed(&mut comm, big_n, |range| signal[range].to_vec()).unwrap();
    let elapsed = now.elapsed();

    if rank == ROOT {
        let expected = fft_serial(&signal).unwrap();
        let spectrum = result.unwrap();
        println!("N = {big_n}, workers = {}", peers.len());
        println!("error vs fft_serial = {:e}", transform_error(&spectrum, &expected));
        println!("time for fft_distributed = {elapsed:?}");
    }
}
