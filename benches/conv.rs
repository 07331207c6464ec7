use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use convcheck::config::{NormalParams, DEFAULT_SEED};
use convcheck::conv::{conv2_full_fft_batched, conv2d};
use convcheck::metrics::benchmark::flops;
use convcheck::metrics::BENCH_CASES;
use convcheck::tensor::{random_normal, seeded_rng, Matrix, MatrixBatch};

fn conv2_sections(c: &mut Criterion) {
    for case in BENCH_CASES {
        let mut group = c.benchmark_group(format!("s{}", case.name));
        group.sample_size(10);

        for &(n, k) in case.sizes {
            let mut rng = seeded_rng(DEFAULT_SEED);
            let input: Matrix<f32> = random_normal(n, n, &NormalParams::default(), &mut rng).unwrap();
            let kernel: Matrix<f32> = random_normal(k, k, &NormalParams::default(), &mut rng).unwrap();
            group.throughput(Throughput::Elements(flops(n, k)));

            for &algorithm in case.algorithms {
                group.bench_with_input(
                    BenchmarkId::new(algorithm.to_string(), format!("{n}x{k}")),
                    &(input.view(), kernel.view()),
                    |b, &(input, kernel)| b.iter(|| conv2d(algorithm, case.mode, black_box(input), kernel).unwrap()),
                );
            }
        }
        group.finish();
    }
}

/// Amortization of the shared input transform across a kernel batch.
fn fft_batch(c: &mut Criterion) {
    let (n, k) = (64, 9);
    let mut rng = seeded_rng(DEFAULT_SEED);
    let input: Matrix<f32> = random_normal(n, n, &NormalParams::default(), &mut rng).unwrap();

    let mut group = c.benchmark_group("sconv2_full_fft_batched");
    group.sample_size(10);
    for batch in [1usize, 4, 16] {
        let kernels: MatrixBatch<f32> = random_normal::<f32, _>(batch * k, k, &NormalParams::default(), &mut rng)
            .unwrap()
            .into_shape_with_order((batch, k, k))
            .unwrap();
        group.throughput(Throughput::Elements(flops(n, k) * batch as u64));
        group.bench_with_input(BenchmarkId::from_parameter(batch), &kernels, |b, kernels| {
            b.iter(|| conv2_full_fft_batched(black_box(input.view()), kernels.view()).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, conv2_sections, fft_batch);
criterion_main!(benches);
