use ndarray::{s, Array2, Array3, ArrayBase, ArrayView2, Axis, Data, Dimension};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use super::Element;
use crate::config::NormalParams;
use crate::error::{ConvError, Result};

/// Dense row-major 2D buffer.
pub type Matrix<T> = Array2<T>;

/// Rank-3 buffer whose leading axis indexes independent matrices (a kernel batch
/// or the output batch it produces).
pub type MatrixBatch<T> = Array3<T>;

/// Deterministic generator used for every random matrix in the crate.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Fill a `rows x cols` matrix with samples from `N(mean, variance)`.
pub fn random_normal<T, R>(rows: usize, cols: usize, params: &NormalParams, rng: &mut R) -> Result<Matrix<T>>
where
    T: Element,
    R: Rng + ?Sized,
{
    params.validate()?;
    let dist = Normal::new(params.mean, params.std_dev())
        .map_err(|e| ConvError::config(format!("normal distribution {params:?}: {e}")))?;
    Ok(Matrix::from_shape_simple_fn((rows, cols), || T::cast(dist.sample(&mut *rng))))
}

/// Copy of `kernel` reversed along both axes.
///
/// The result is always in standard (row-major) layout, so it can be reshaped
/// without copying.
pub fn flip<T: Element>(kernel: ArrayView2<'_, T>) -> Matrix<T> {
    let (k1, k2) = kernel.dim();
    Matrix::from_shape_fn((k1, k2), |(r, c)| kernel[[k1 - 1 - r, k2 - 1 - c]])
}

/// Embed `input` in a zero matrix of shape `(rows, cols)` with its top-left
/// corner at `(top, left)`.
pub fn zero_pad<T: Element>(
    input: ArrayView2<'_, T>,
    top: usize,
    left: usize,
    rows: usize,
    cols: usize,
) -> Result<Matrix<T>> {
    let (v1, v2) = input.dim();
    if top + v1 > rows || left + v2 > cols {
        return Err(ConvError::dimension(format!(
            "cannot place {v1}x{v2} at ({top},{left}) inside {rows}x{cols}"
        )));
    }
    let mut padded = Matrix::zeros((rows, cols));
    padded.slice_mut(s![top..top + v1, left..left + v2]).assign(&input);
    Ok(padded)
}

/// Stack separately allocated kernels into one batch.
///
/// Every kernel must share one shape; an empty list has no shape to infer and
/// is rejected as well (build `MatrixBatch::zeros((0, k1, k2))` instead).
pub fn stack_kernels<T: Element>(kernels: &[Matrix<T>]) -> Result<MatrixBatch<T>> {
    let first = kernels
        .first()
        .ok_or_else(|| ConvError::dimension("kernel batch is empty, shape cannot be inferred"))?;
    let shape = first.dim();
    if let Some((idx, bad)) = kernels.iter().enumerate().find(|(_, k)| k.dim() != shape) {
        return Err(ConvError::dimension(format!(
            "kernel {idx} is {}x{}, batch shape is {}x{}",
            bad.nrows(),
            bad.ncols(),
            shape.0,
            shape.1
        )));
    }
    let views: Vec<_> = kernels.iter().map(|k| k.view()).collect();
    Ok(ndarray::stack(Axis(0), &views)?)
}

/// Arithmetic mean, accumulated in `f64`. Empty arrays have mean 0.
pub fn mean<S, D>(a: &ArrayBase<S, D>) -> f64
where
    S: Data,
    S::Elem: Element,
    D: Dimension,
{
    if a.is_empty() {
        return 0.0;
    }
    a.iter().map(|&v| v.widen()).sum::<f64>() / a.len() as f64
}

/// Population standard deviation, accumulated in `f64`.
pub fn stddev<S, D>(a: &ArrayBase<S, D>) -> f64
where
    S: Data,
    S::Elem: Element,
    D: Dimension,
{
    if a.is_empty() {
        return 0.0;
    }
    let m = mean(a);
    let var = a
        .iter()
        .map(|&v| {
            let d = v.widen() - m;
            d * d
        })
        .sum::<f64>()
        / a.len() as f64;
    var.sqrt()
}
