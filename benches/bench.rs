use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use distfft::{fft_serial_with_twiddles, fft_threaded, Twiddles};
use utilities::gen_random_signal;
use utilities::rustfft::FftPlanner;

const LENGTHS: &[usize] = &[6, 8, 10, 12, 14, 16, 18, 20];
const WORKERS: &[usize] = &[2, 4, 8];

fn benchmark_serial_f64(c: &mut Criterion) {
    let mut group = c.benchmark_group("Serial f64");

    for n in LENGTHS.iter() {
        let len = 1 << n;
        group.throughput(Throughput::Elements(len as u64));

        let id = "distfft serial";
        let twiddles = Twiddles::<f64>::new(len).unwrap();

        group.bench_function(BenchmarkId::new(id, len), |b| {
            b.iter_batched(
                || gen_random_signal::<f64>(len),
                |mut signal| fft_serial_with_twiddles(&mut signal, &twiddles).unwrap(),
                BatchSize::SmallInput,
            );
        });

        let id = "RustFFT FFT Forward";
        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(len);

        group.bench_function(BenchmarkId::new(id, len), |b| {
            b.iter_batched(
                || gen_random_signal::<f64>(len),
                |mut signal| {
                    fft.process(&mut signal);
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn benchmark_threaded_f64(c: &mut Criterion) {
    let mut group = c.benchmark_group("Threaded f64");

    for n in LENGTHS.iter() {
        let len = 1 << n;
        group.throughput(Throughput::Elements(len as u64));

        for &workers in WORKERS {
            let id = format!("distfft {workers} workers");
            group.bench_function(BenchmarkId::new(id, len), |b| {
                b.iter_batched(
                    || gen_random_signal::<f64>(len),
                    |signal| fft_threaded(&signal, workers).unwrap(),
                    BatchSize::SmallInput,
                );
            });
        }
    }
    group.finish();
}

fn benchmark_serial_f32(c: &mut Criterion) {
    let mut group = c.benchmark_group("Serial f32");

    for n in LENGTHS.iter() {
        let len = 1 << n;
        group.throughput(Throughput::Elements(len as u64));

        let twiddles = Twiddles::<f32>::new(len).unwrap();
        group.bench_function(BenchmarkId::new("distfft serial", len), |b| {
            b.iter_batched(
                || gen_random_signal::<f32>(len),
                |mut signal| fft_serial_with_twiddles(&mut signal, &twiddles).unwrap(),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_serial_f64,
    benchmark_threaded_f64,
    benchmark_serial_f32
);
criterion_main!(benches);
