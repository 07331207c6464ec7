/// FFT-based full convolution.
///
/// Zero-pads the input and every kernel of a batch to the full output size,
/// transforms them once, then for each kernel multiplies in the frequency domain
/// and inverse transforms back. The input transform is shared by the whole batch.

use std::sync::Arc;

use ndarray::{s, ArrayView2, ArrayView3, ArrayViewMut3, Axis};
use num_complex::Complex;
use num_traits::Zero;
use rustfft::{Fft, FftPlanner};
use tracing::debug;

use super::ConvShape;
use crate::error::{ConvError, Result};
use crate::tensor::{Element, Matrix, MatrixBatch};

/// Planned 2D transform over `rows x cols` row-major planes.
///
/// Buffers may hold any number of planes back to back; each plane is
/// transformed independently (rows first, then columns).
struct Fft2d<T: Element> {
    rows: usize,
    cols: usize,
    row_forward: Arc<dyn Fft<T>>,
    col_forward: Arc<dyn Fft<T>>,
    row_inverse: Arc<dyn Fft<T>>,
    col_inverse: Arc<dyn Fft<T>>,
}

impl<T: Element> Fft2d<T> {
    fn new(rows: usize, cols: usize) -> Self {
        let mut planner = FftPlanner::new();
        Fft2d {
            rows,
            cols,
            row_forward: planner.plan_fft_forward(cols),
            col_forward: planner.plan_fft_forward(rows),
            row_inverse: planner.plan_fft_inverse(cols),
            col_inverse: planner.plan_fft_inverse(rows),
        }
    }

    fn plane_len(&self) -> usize {
        self.rows * self.cols
    }

    fn forward(&self, data: &mut [Complex<T>]) {
        self.process(data, self.row_forward.as_ref(), self.col_forward.as_ref());
    }

    /// Inverse transform, normalized by `1 / (rows * cols)`.
    fn inverse(&self, data: &mut [Complex<T>]) {
        self.process(data, self.row_inverse.as_ref(), self.col_inverse.as_ref());
        let scale = T::cast(1.0 / self.plane_len() as f64);
        for v in data.iter_mut() {
            *v = *v * scale;
        }
    }

    fn process(&self, data: &mut [Complex<T>], row: &dyn Fft<T>, col: &dyn Fft<T>) {
        let plane = self.plane_len();
        debug_assert_eq!(data.len() % plane, 0);

        let scratch_len = row.get_inplace_scratch_len().max(col.get_inplace_scratch_len());
        let mut scratch = vec![Complex::zero(); scratch_len];
        let mut column = vec![Complex::zero(); plane];

        for slice in data.chunks_exact_mut(plane) {
            row.process_with_scratch(slice, &mut scratch);

            transpose(slice, &mut column, self.rows, self.cols);
            col.process_with_scratch(&mut column, &mut scratch);
            transpose(&column, slice, self.cols, self.rows);
        }
    }
}

/// `dst[c * rows + r] = src[r * cols + c]`
fn transpose<T: Copy>(src: &[T], dst: &mut [T], rows: usize, cols: usize) {
    for r in 0..rows {
        for c in 0..cols {
            dst[c * rows + r] = src[r * cols + c];
        }
    }
}

/// Batched FFT full convolution.
///
/// All kernels share one shape `(k1, k2)`. Output shape is
/// `(K, v1 + k1 - 1, v2 + k2 - 1)`; `K = 0` yields an empty batch.
pub fn conv2_full_fft_batched<T: Element>(
    input: ArrayView2<'_, T>,
    kernels: ArrayView3<'_, T>,
) -> Result<MatrixBatch<T>> {
    let (n, k1, k2) = kernels.dim();
    let (f1, f2) = ConvShape::new(input.dim(), (k1, k2))?.full();
    let mut output = MatrixBatch::zeros((n, f1, f2));
    full_fft_batched(input, kernels, output.view_mut());
    Ok(output)
}

/// Same as [`conv2_full_fft_batched`], writing into a declared output batch.
///
/// Fails with `InvalidDimension` if `output` is not `(K, v1 + k1 - 1, v2 + k2 - 1)`.
pub fn conv2_full_fft_batched_into<T: Element>(
    input: ArrayView2<'_, T>,
    kernels: ArrayView3<'_, T>,
    output: ArrayViewMut3<'_, T>,
) -> Result<()> {
    let (n, k1, k2) = kernels.dim();
    let (f1, f2) = ConvShape::new(input.dim(), (k1, k2))?.full();
    if output.dim() != (n, f1, f2) {
        return Err(ConvError::dimension(format!(
            "output batch is {:?}, full convolution produces {:?}",
            output.dim(),
            (n, f1, f2)
        )));
    }
    full_fft_batched(input, kernels, output);
    Ok(())
}

/// Single-kernel FFT full convolution (a batch of one).
pub fn conv2_full_fft<T: Element>(input: ArrayView2<'_, T>, kernel: ArrayView2<'_, T>) -> Result<Matrix<T>> {
    let batch = conv2_full_fft_batched(input, kernel.insert_axis(Axis(0)))?;
    Ok(batch.index_axis_move(Axis(0), 0))
}

/// Valid convolution cropped out of the FFT full convolution.
pub fn conv2_valid_fft<T: Element>(input: ArrayView2<'_, T>, kernel: ArrayView2<'_, T>) -> Result<Matrix<T>> {
    let (v1, v2) = input.dim();
    let (k1, k2) = kernel.dim();
    ConvShape::new((v1, v2), (k1, k2))?.valid()?;

    let full = conv2_full_fft(input, kernel)?;
    Ok(full.slice(s![k1 - 1..v1, k2 - 1..v2]).to_owned())
}

/// Shapes have been validated by the caller.
fn full_fft_batched<T: Element>(input: ArrayView2<'_, T>, kernels: ArrayView3<'_, T>, mut output: ArrayViewMut3<'_, T>) {
    let (n, f1, f2) = output.dim();
    if n == 0 {
        return;
    }
    let (v1, v2) = input.dim();
    let (_, k1, k2) = kernels.dim();
    // anything smaller wraps around (circular convolution)
    assert_eq!((f1, f2), (v1 + k1 - 1, v2 + k2 - 1), "FFT planes must cover the full convolution");
    debug!(kernels = n, rows = f1, cols = f2, "fft batched full convolution");

    let fft = Fft2d::new(f1, f2);
    let plane = fft.plane_len();

    let mut input_freq = vec![Complex::zero(); plane];
    for ((r, c), &v) in input.indexed_iter() {
        input_freq[r * f2 + c] = Complex::new(v, T::zero());
    }

    let mut kernel_freq = vec![Complex::zero(); n * plane];
    for ((k, r, c), &v) in kernels.indexed_iter() {
        kernel_freq[k * plane + r * f2 + c] = Complex::new(v, T::zero());
    }

    fft.forward(&mut input_freq);
    fft.forward(&mut kernel_freq);

    let mut product = vec![Complex::zero(); plane];
    for (k, kernel_plane) in kernel_freq.chunks_exact(plane).enumerate() {
        for ((dst, &a), &b) in product.iter_mut().zip(&input_freq).zip(kernel_plane) {
            *dst = a * b;
        }
        fft.inverse(&mut product);

        let mut out = output.index_axis_mut(Axis(0), k);
        for (dst, src) in out.iter_mut().zip(&product) {
            *dst = src.re;
        }
    }
}
