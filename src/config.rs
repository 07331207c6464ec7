//! Problem sizes and random-data parameters for precision comparisons and benchmarks.
//!
//! Defaults reproduce the reference precision run: a 100x100 input, a 25x25
//! kernel, input drawn from `N(5, 1000)` and kernel from `N(10, 2000)`.

use crate::error::{ConvError, Result};

/// Seed used when the caller does not pick one.
pub const DEFAULT_SEED: u64 = 42;

/// Mean and variance of a normal distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalParams {
    pub mean: f64,
    pub variance: f64,
}

impl NormalParams {
    /// Distribution of the comparator's input matrix.
    pub const INPUT: NormalParams = NormalParams { mean: 5.0, variance: 1000.0 };
    /// Distribution of the comparator's kernel matrix.
    pub const KERNEL: NormalParams = NormalParams { mean: 10.0, variance: 2000.0 };

    pub fn new(mean: f64, variance: f64) -> Self {
        NormalParams { mean, variance }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }

    pub fn validate(&self) -> Result<()> {
        if !self.mean.is_finite() {
            return Err(ConvError::config(format!("mean must be finite, got {}", self.mean)));
        }
        if !self.variance.is_finite() || self.variance < 0.0 {
            return Err(ConvError::config(format!(
                "variance must be finite and non-negative, got {}",
                self.variance
            )));
        }
        Ok(())
    }
}

impl Default for NormalParams {
    /// Standard normal.
    fn default() -> Self {
        NormalParams { mean: 0.0, variance: 1.0 }
    }
}

/// Square problem size: an `input x input` matrix convolved with a
/// `kernel x kernel` kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeParams {
    pub input: usize,
    pub kernel: usize,
}

impl SizeParams {
    pub fn new(input: usize, kernel: usize) -> Self {
        SizeParams { input, kernel }
    }

    /// `n x n` input with an `n/4 x n/4` kernel.
    pub fn quarter_kernel(n: usize) -> Self {
        SizeParams { input: n, kernel: n / 4 }
    }

    pub fn validate(&self) -> Result<()> {
        if self.input == 0 || self.kernel == 0 {
            return Err(ConvError::config(format!(
                "sizes must be non-zero, got input {} kernel {}",
                self.input, self.kernel
            )));
        }
        Ok(())
    }
}

impl Default for SizeParams {
    fn default() -> Self {
        SizeParams::quarter_kernel(100)
    }
}

/// Everything a precision comparison needs besides the mode and element type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrecisionConfig {
    pub sizes: SizeParams,
    pub input: NormalParams,
    pub kernel: NormalParams,
    pub seed: u64,
}

impl PrecisionConfig {
    pub fn with_sizes(mut self, sizes: SizeParams) -> Self {
        self.sizes = sizes;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_distributions(mut self, input: NormalParams, kernel: NormalParams) -> Self {
        self.input = input;
        self.kernel = kernel;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.sizes.validate()?;
        self.input.validate()?;
        self.kernel.validate()
    }
}

impl Default for PrecisionConfig {
    fn default() -> Self {
        PrecisionConfig {
            sizes: SizeParams::default(),
            input: NormalParams::INPUT,
            kernel: NormalParams::KERNEL,
            seed: DEFAULT_SEED,
        }
    }
}
