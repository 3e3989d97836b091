pub extern crate rustfft;

// export rustfft to the tests of the main crate
use rand::distr::uniform::SampleUniform;
use rand::Rng;
use rustfft::num_complex::Complex;
use rustfft::num_traits::Float;

/// Asserts that two fp numbers are approximately equal.
///
/// # Panics
///
/// Panics if `actual` and `expected` are too far from each other
#[allow(dead_code)]
#[track_caller]
pub fn assert_float_closeness<T: Float + std::fmt::Display>(actual: T, expected: T, epsilon: T) {
    if (actual - expected).abs() >= epsilon {
        panic!(
            "Assertion failed: {actual} too far from expected value {expected} (with epsilon {epsilon})",
        );
    }
}

/// Generate a random, complex, signal with components in `[-1, 1)`
pub fn gen_random_signal<T>(len: usize) -> Vec<Complex<T>>
where
    T: Float + SampleUniform,
{
    let mut rng = rand::rng();
    let low = T::from(-1.0).unwrap();
    let high = T::from(1.0).unwrap();

    (0..len)
        .map(|_| Complex::new(rng.random_range(low..high), rng.random_range(low..high)))
        .collect()
}

/// The benchmark series `x[j] = sin(2j) + i·cos(3j)`
pub fn test_signal<T: Float>(len: usize) -> Vec<Complex<T>> {
    (0..len)
        .map(|j| {
            let j = j as f64;
            Complex::new(
                T::from((2.0 * j).sin()).unwrap(),
                T::from((3.0 * j).cos()).unwrap(),
            )
        })
        .collect()
}

/// Textbook O(N²) DFT, only meant as an oracle for small sizes
pub fn dft_naive(signal: &[Complex<f64>]) -> Vec<Complex<f64>> {
    let n = signal.len();
    (0..n)
        .map(|j| {
            signal
                .iter()
                .enumerate()
                .map(|(k, x)| {
                    // reduce the exponent first, j * k grows quickly
                    let angle = -2.0 * std::f64::consts::PI * ((j * k) % n) as f64 / n as f64;
                    Complex::from_polar(1.0, angle) * x
                })
                .sum()
        })
        .collect()
}

/// Forward transform computed by `rustfft`
pub fn reference_fft(signal: &[Complex<f64>]) -> Vec<Complex<f64>> {
    let mut buffer = signal.to_vec();
    let mut planner = rustfft::FftPlanner::new();
    planner.plan_fft_forward(buffer.len()).process(&mut buffer);
    buffer
}

/// `sqrt(Σ (Δre² + Δim²))` between two spectra
///
/// # Panics
///
/// Panics if the spectra differ in length
pub fn transform_error(actual: &[Complex<f64>], expected: &[Complex<f64>]) -> f64 {
    assert_eq!(actual.len(), expected.len());
    actual
        .iter()
        .zip(expected.iter())
        .map(|(a, e)| (a.re - e.re).powi(2) + (a.im - e.im).powi(2))
        .sum::<f64>()
        .sqrt()
}
