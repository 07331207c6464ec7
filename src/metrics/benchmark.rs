use std::hint::black_box;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::NormalParams;
use crate::conv::{conv2d, ConvAlgorithm, ConvMode};
use crate::error::{ConvError, Result};
use crate::tensor::{random_normal, seeded_rng, Element, ElementType, Matrix};

/// `(input, kernel)` sizes swept by both convolution sections.
pub const CONV2_SIZES: &[(usize, usize)] = &[
    (12, 5),
    (16, 5),
    (16, 9),
    (28, 9),
    (50, 17),
    (128, 17),
    (128, 31),
    (256, 31),
];

/// One benchmark section: a mode, a size sweep and the algorithms timed on it.
#[derive(Debug, Clone, Copy)]
pub struct BenchCase {
    pub name: &'static str,
    pub mode: ConvMode,
    pub sizes: &'static [(usize, usize)],
    pub algorithms: &'static [ConvAlgorithm],
}

pub const BENCH_CASES: &[BenchCase] = &[
    BenchCase {
        name: "conv2_valid",
        mode: ConvMode::Valid,
        sizes: CONV2_SIZES,
        algorithms: &[ConvAlgorithm::Direct, ConvAlgorithm::Gemm, ConvAlgorithm::Fft],
    },
    BenchCase {
        name: "conv2_full",
        mode: ConvMode::Full,
        sizes: CONV2_SIZES,
        algorithms: &[ConvAlgorithm::Direct, ConvAlgorithm::Gemm, ConvAlgorithm::Fft],
    },
];

/// Nominal floating-point operation count of an `n x n` by `k x k` convolution.
pub fn flops(n: usize, k: usize) -> u64 {
    2 * (n * n * k * k) as u64
}

/// Timing of one algorithm on one size.
#[derive(Debug, Clone)]
pub struct BenchTiming {
    pub case: &'static str,
    pub algorithm: ConvAlgorithm,
    pub element: ElementType,
    pub input: usize,
    pub kernel: usize,
    pub iterations: usize,
    pub total: Duration,
}

impl BenchTiming {
    pub fn per_iteration(&self) -> Duration {
        self.total / self.iterations.max(1) as u32
    }

    pub fn gflops(&self) -> f64 {
        let secs = self.per_iteration().as_secs_f64();
        if secs > 0.0 {
            flops(self.input, self.kernel) as f64 / secs / 1e9
        } else {
            0.0
        }
    }
}

/// Time every algorithm of `case` on every size, `iterations` runs each.
pub fn run_benchmark<T: Element>(case: &BenchCase, iterations: usize, seed: u64) -> Result<Vec<BenchTiming>> {
    if iterations == 0 {
        return Err(ConvError::config("iterations must be at least 1"));
    }
    let mut rng = seeded_rng(seed);
    let mut timings = Vec::with_capacity(case.sizes.len() * case.algorithms.len());

    for &(n, k) in case.sizes {
        let input: Matrix<T> = random_normal(n, n, &NormalParams::default(), &mut rng)?;
        let kernel: Matrix<T> = random_normal(k, k, &NormalParams::default(), &mut rng)?;

        for &algorithm in case.algorithms {
            // warm-up, and surfaces shape errors before timing
            conv2d(algorithm, case.mode, input.view(), kernel.view())?;

            let start = Instant::now();
            for _ in 0..iterations {
                black_box(conv2d(algorithm, case.mode, black_box(input.view()), kernel.view())?);
            }
            let total = start.elapsed();
            debug!(case = case.name, %algorithm, n, k, ?total, "benchmark");

            timings.push(BenchTiming {
                case: case.name,
                algorithm,
                element: T::TYPE,
                input: n,
                kernel: k,
                iterations,
                total,
            });
        }
    }
    Ok(timings)
}

/// Print a formatted benchmark report to stdout.
pub fn print_report(timings: &[BenchTiming]) {
    println!(
        "\n{:<12} {:<7} {:<8} {:>6} {:>6} {:>12} {:>9}",
        "Section", "Type", "Algo", "Input", "Kernel", "Time", "GFLOPS"
    );
    for t in timings {
        let us = t.per_iteration().as_nanos() as f64 / 1000.0;
        println!(
            "{:<12} {:<7} {:<8} {:>6} {:>6} {:>10.2}us {:>9.3}",
            t.case,
            t.element,
            t.algorithm.to_string(),
            t.input,
            t.kernel,
            us,
            t.gflops()
        );
    }
}
