//! Property-based cross-checks of the GEMM and FFT engines against the direct reference.

use convcheck::conv::{conv2_full_direct, conv2_full_fft_batched, conv2_valid_direct, conv2_valid_gemm};
use convcheck::tensor::{Matrix, MatrixBatch};
use ndarray::Axis;
use proptest::prelude::*;

/// `(v1, v2, k1, k2)` with the kernel fitting inside the input.
fn valid_shape() -> impl Strategy<Value = (usize, usize, usize, usize)> {
    (1usize..=12, 1usize..=12).prop_flat_map(|(v1, v2)| (Just(v1), Just(v2), 1..=v1, 1..=v2))
}

fn matrix(rows: usize, cols: usize) -> impl Strategy<Value = Matrix<f64>> {
    prop::collection::vec(-10.0f64..10.0, rows * cols)
        .prop_map(move |data| Matrix::from_shape_vec((rows, cols), data).unwrap())
}

fn valid_problem() -> impl Strategy<Value = (Matrix<f64>, Matrix<f64>)> {
    valid_shape().prop_flat_map(|(v1, v2, k1, k2)| (matrix(v1, v2), matrix(k1, k2)))
}

fn full_problem() -> impl Strategy<Value = (Matrix<f64>, MatrixBatch<f64>)> {
    (1usize..=10, 1usize..=10, 1usize..=6, 1usize..=6, 0usize..=3).prop_flat_map(|(v1, v2, k1, k2, n)| {
        let kernels = prop::collection::vec(-10.0f64..10.0, n * k1 * k2)
            .prop_map(move |data| MatrixBatch::from_shape_vec((n, k1, k2), data).unwrap());
        (matrix(v1, v2), kernels)
    })
}

fn max_abs(m: &Matrix<f64>) -> f64 {
    m.iter().fold(1.0f64, |acc, v| acc.max(v.abs()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn gemm_valid_matches_direct((input, kernel) in valid_problem()) {
        let direct = conv2_valid_direct(input.view(), kernel.view()).unwrap();
        let gemm = conv2_valid_gemm(input.view(), kernel.view()).unwrap();
        prop_assert_eq!(gemm.dim(), (input.nrows() - kernel.nrows() + 1, input.ncols() - kernel.ncols() + 1));

        let scale = max_abs(&direct);
        for (d, g) in direct.iter().zip(gemm.iter()) {
            prop_assert!((d - g).abs() <= 1e-10 * scale, "{} vs {}", d, g);
        }
    }

    #[test]
    fn fft_full_batched_matches_direct((input, kernels) in full_problem()) {
        let out = conv2_full_fft_batched(input.view(), kernels.view()).unwrap();
        let (n, k1, k2) = kernels.dim();
        prop_assert_eq!(out.dim(), (n, input.nrows() + k1 - 1, input.ncols() + k2 - 1));

        for (k, slice) in out.axis_iter(Axis(0)).enumerate() {
            let direct = conv2_full_direct(input.view(), kernels.index_axis(Axis(0), k)).unwrap();
            let scale = max_abs(&direct);
            for (d, f) in direct.iter().zip(slice.iter()) {
                prop_assert!((d - f).abs() <= 1e-9 * scale, "kernel {}: {} vs {}", k, d, f);
            }
        }
    }

    #[test]
    fn zero_kernel_gives_zero((input, kernel) in valid_problem()) {
        let zero = Matrix::<f64>::zeros(kernel.dim());
        let gemm = conv2_valid_gemm(input.view(), zero.view()).unwrap();
        prop_assert!(gemm.iter().all(|&v| v == 0.0));

        let fft = conv2_full_fft_batched(input.view(), zero.view().insert_axis(Axis(0))).unwrap();
        prop_assert!(fft.iter().all(|&v| v == 0.0));
    }
}
