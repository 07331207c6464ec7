/// 2D convolution algorithms.
///
/// Provides a direct (reference) implementation, Im2col+GEMM and batched FFT,
/// each in valid and full boundary modes.

mod naive;
mod im2col;
mod fft;

use std::fmt;

use ndarray::ArrayView2;

use crate::error::{ConvError, Result};
use crate::tensor::{Element, Matrix};

pub use naive::{conv2_full_direct, conv2_valid_direct};
pub use im2col::{conv2_full_gemm, conv2_valid_gemm, conv2_valid_gemm_batched, conv2_valid_gemm_into, im2col, im2col_into};
pub use fft::{conv2_full_fft, conv2_full_fft_batched, conv2_full_fft_batched_into, conv2_valid_fft};

/// Boundary mode of a convolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConvMode {
    /// Only positions where the kernel fully overlaps the input: `v - k + 1`.
    Valid,
    /// Every position with any overlap: `v + k - 1`.
    Full,
}

impl ConvMode {
    pub const ALL: [ConvMode; 2] = [ConvMode::Valid, ConvMode::Full];
}

impl fmt::Display for ConvMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvMode::Valid => f.write_str("valid"),
            ConvMode::Full => f.write_str("full"),
        }
    }
}

/// Selects which convolution algorithm to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConvAlgorithm {
    /// Nested-loop multiply-accumulate (reference implementation).
    Direct,
    /// Im2col unfolding + one dense matrix multiply. Full mode pads the input first.
    Gemm,
    /// Zero-padded FFT, pointwise product, inverse FFT. Valid mode crops the full result.
    Fft,
}

impl fmt::Display for ConvAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvAlgorithm::Direct => f.write_str("Direct"),
            ConvAlgorithm::Gemm => f.write_str("GEMM"),
            ConvAlgorithm::Fft => f.write_str("FFT"),
        }
    }
}

/// Shapes of one convolution problem. Output shapes are derived on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvShape {
    pub input: (usize, usize),
    pub kernel: (usize, usize),
}

impl ConvShape {
    /// Fails with `InvalidDimension` if any dimension is zero.
    pub fn new(input: (usize, usize), kernel: (usize, usize)) -> Result<Self> {
        if input.0 == 0 || input.1 == 0 {
            return Err(ConvError::dimension(format!("input is empty ({}x{})", input.0, input.1)));
        }
        if kernel.0 == 0 || kernel.1 == 0 {
            return Err(ConvError::dimension(format!("kernel is empty ({}x{})", kernel.0, kernel.1)));
        }
        Ok(ConvShape { input, kernel })
    }

    /// `(v1 - k1 + 1, v2 - k2 + 1)`; the kernel must fit inside the input.
    pub fn valid(&self) -> Result<(usize, usize)> {
        let (v1, v2) = self.input;
        let (k1, k2) = self.kernel;
        if v1 < k1 || v2 < k2 {
            return Err(ConvError::dimension(format!(
                "kernel {k1}x{k2} does not fit in input {v1}x{v2} for valid convolution"
            )));
        }
        Ok((v1 - k1 + 1, v2 - k2 + 1))
    }

    /// `(v1 + k1 - 1, v2 + k2 - 1)`.
    pub fn full(&self) -> (usize, usize) {
        let (v1, v2) = self.input;
        let (k1, k2) = self.kernel;
        (v1 + k1 - 1, v2 + k2 - 1)
    }

    pub fn output(&self, mode: ConvMode) -> Result<(usize, usize)> {
        match mode {
            ConvMode::Valid => self.valid(),
            ConvMode::Full => Ok(self.full()),
        }
    }
}

/// Dispatch convolution to the selected algorithm.
pub fn conv2d<T: Element>(
    algorithm: ConvAlgorithm,
    mode: ConvMode,
    input: ArrayView2<'_, T>,
    kernel: ArrayView2<'_, T>,
) -> Result<Matrix<T>> {
    match (algorithm, mode) {
        (ConvAlgorithm::Direct, ConvMode::Valid) => conv2_valid_direct(input, kernel),
        (ConvAlgorithm::Direct, ConvMode::Full) => conv2_full_direct(input, kernel),
        (ConvAlgorithm::Gemm, ConvMode::Valid) => conv2_valid_gemm(input, kernel),
        (ConvAlgorithm::Gemm, ConvMode::Full) => conv2_full_gemm(input, kernel),
        (ConvAlgorithm::Fft, ConvMode::Valid) => conv2_valid_fft(input, kernel),
        (ConvAlgorithm::Fft, ConvMode::Full) => conv2_full_fft(input, kernel),
    }
}
