//! Sweeps transform sizes and compares the serial and the threaded distributed FFT with rustfft.
//!
//! Usage: `sweep [workers] [max_log_n]`
use std::env;
use std::str::FromStr;
use std::time::Instant;

use distfft::{fft_serial, fft_threaded};
use utilities::{reference_fft, test_signal, transform_error};

fn main() {
    let args: Vec<String> = env::args().collect();
    let workers = args.get(1).map_or(4, |w| usize::from_str(w).unwrap());
    let max_log_n = args.get(2).map_or(20, |n| usize::from_str(n).unwrap());

    for log_n in 7..=max_log_n {
        let big_n = 1 << log_n;
        println!("N = {big_n}");

        let signal = test_signal::<f64>(big_n);

        let now = Instant::now();
        let expected = reference_fft(&signal);
        println!("time for rustfft = {:?}", now.elapsed());

        let now = Instant::now();
        let serial = fft_serial(&signal).unwrap();
        let elapsed = now.elapsed();
        println!("error for fft_serial = {:e}", transform_error(&serial, &expected));
        println!("time for fft_serial = {elapsed:?}");

        let now = Instant::now();
        let threaded = fft_threaded(&signal, workers).unwrap();
        let elapsed = now.elapsed();
        println!(
            "error for fft_threaded ({workers} workers) = {:e}",
            transform_error(&threaded, &expected)
        );
        println!("time for fft_threaded = {elapsed:?}\n");
    }
}
