/// Im2col + GEMM convolution.
///
/// Unfolds input patches into a column matrix, then performs one dense matrix
/// multiply against the flipped kernel(s) so every output position is computed
/// by a single GEMM call instead of a per-pixel multiply-accumulate loop.

use ndarray::{s, ArrayView2, ArrayView3, ArrayViewMut2};
use tracing::debug;

use super::ConvShape;
use crate::error::{ConvError, Result};
use crate::tensor::{flip, zero_pad, Element, Matrix, MatrixBatch};

/// Unfold input patches into a column matrix.
///
/// Output shape: rows = `k1 * k2`, cols = `out_h * out_w` (valid output positions
/// in row-major order). Row `kh * k2 + kw` holds `input[oh + kh][ow + kw]`, which
/// matches the row-major flattening of a kernel flipped along both axes.
pub fn im2col<T: Element>(input: ArrayView2<'_, T>, k1: usize, k2: usize) -> Result<Matrix<T>> {
    let (out_h, out_w) = ConvShape::new(input.dim(), (k1, k2))?.valid()?;
    let mut col = Matrix::zeros((k1 * k2, out_h * out_w));
    unfold(input, k1, k2, out_h, out_w, col.view_mut());
    Ok(col)
}

/// Same as [`im2col`], writing into a caller-provided `(k1*k2, out_h*out_w)` buffer.
pub fn im2col_into<T: Element>(
    input: ArrayView2<'_, T>,
    k1: usize,
    k2: usize,
    col: ArrayViewMut2<'_, T>,
) -> Result<()> {
    let (out_h, out_w) = ConvShape::new(input.dim(), (k1, k2))?.valid()?;
    let expected = (k1 * k2, out_h * out_w);
    if col.dim() != expected {
        return Err(ConvError::dimension(format!(
            "column buffer is {:?}, expected {:?}",
            col.dim(),
            expected
        )));
    }
    unfold(input, k1, k2, out_h, out_w, col);
    Ok(())
}

fn unfold<T: Element>(
    input: ArrayView2<'_, T>,
    k1: usize,
    k2: usize,
    out_h: usize,
    out_w: usize,
    mut col: ArrayViewMut2<'_, T>,
) {
    for kh in 0..k1 {
        for kw in 0..k2 {
            let window = input.slice(s![kh..kh + out_h, kw..kw + out_w]);
            let mut row = col.row_mut(kh * k2 + kw);
            for (dst, &src) in row.iter_mut().zip(window.iter()) {
                *dst = src;
            }
        }
    }
}

/// Flip every kernel of the batch and flatten each one into a row: `K x (k1*k2)`.
fn flipped_rows<T: Element>(kernels: ArrayView3<'_, T>) -> Matrix<T> {
    let (n, k1, k2) = kernels.dim();
    Matrix::from_shape_fn((n, k1 * k2), |(k, p)| kernels[[k, k1 - 1 - p / k2, k2 - 1 - p % k2]])
}

/// Im2col + GEMM valid convolution.
///
/// Output shape is `(v1 - k1 + 1, v2 - k2 + 1)`.
pub fn conv2_valid_gemm<T: Element>(input: ArrayView2<'_, T>, kernel: ArrayView2<'_, T>) -> Result<Matrix<T>> {
    let (k1, k2) = kernel.dim();
    let (out_h, out_w) = ConvShape::new(input.dim(), (k1, k2))?.valid()?;
    debug!(rows = out_h, cols = out_w, k1, k2, "gemm valid convolution");

    let prepared = flip(kernel).into_shape_with_order((1, k1 * k2))?;
    let col = im2col(input, k1, k2)?;

    // (1 x k1k2) * (k1k2 x out_h*out_w)
    let flat = prepared.dot(&col);
    Ok(flat.into_shape_with_order((out_h, out_w))?)
}

/// Same as [`conv2_valid_gemm`], writing into a declared output.
///
/// Fails with `InvalidDimension` if `output` is not `(v1 - k1 + 1, v2 - k2 + 1)`.
pub fn conv2_valid_gemm_into<T: Element>(
    input: ArrayView2<'_, T>,
    kernel: ArrayView2<'_, T>,
    mut output: ArrayViewMut2<'_, T>,
) -> Result<()> {
    let expected = ConvShape::new(input.dim(), kernel.dim())?.valid()?;
    if output.dim() != expected {
        return Err(ConvError::dimension(format!(
            "output is {:?}, valid convolution produces {:?}",
            output.dim(),
            expected
        )));
    }
    output.assign(&conv2_valid_gemm(input, kernel)?);
    Ok(())
}

/// Valid convolution of one input with a batch of kernels using a single GEMM.
///
/// The flipped kernels form a `K x (k1*k2)` matrix multiplied by the shared
/// patch matrix. Output shape is `(K, v1 - k1 + 1, v2 - k2 + 1)`.
pub fn conv2_valid_gemm_batched<T: Element>(
    input: ArrayView2<'_, T>,
    kernels: ArrayView3<'_, T>,
) -> Result<MatrixBatch<T>> {
    let (n, k1, k2) = kernels.dim();
    let (out_h, out_w) = ConvShape::new(input.dim(), (k1, k2))?.valid()?;
    if n == 0 {
        return Ok(MatrixBatch::zeros((0, out_h, out_w)));
    }
    debug!(kernels = n, rows = out_h, cols = out_w, "gemm batched valid convolution");

    let weights = flipped_rows(kernels);
    let col = im2col(input, k1, k2)?;

    // (K x k1k2) * (k1k2 x out_h*out_w)
    let flat = weights.dot(&col);
    Ok(flat.into_shape_with_order((n, out_h, out_w))?)
}

/// Full convolution through the GEMM engine.
///
/// The input is zero-padded by `k - 1` on every side, after which the valid
/// convolution of the padded input is exactly the full convolution.
pub fn conv2_full_gemm<T: Element>(input: ArrayView2<'_, T>, kernel: ArrayView2<'_, T>) -> Result<Matrix<T>> {
    let (v1, v2) = input.dim();
    let (k1, k2) = kernel.dim();
    ConvShape::new((v1, v2), (k1, k2))?;

    let padded = zero_pad(input, k1 - 1, k2 - 1, v1 + 2 * (k1 - 1), v2 + 2 * (k2 - 1))?;
    conv2_valid_gemm(padded.view(), kernel)
}
