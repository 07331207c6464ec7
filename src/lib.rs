//! Two-dimensional convolutions through im2col+GEMM and batched FFT, cross-validated
//! against a direct reference.
//!
//! Every algorithm is generic over [`tensor::Element`] (`f32` and `f64`) and works on
//! `ndarray` matrices. The [`metrics::precision`] comparator runs the reference and
//! each accelerated algorithm on the same random data and reports how far they drift.
//!
//! # Example
//!
//! ```
//! use convcheck::conv::conv2_valid_gemm;
//! use ndarray::array;
//!
//! let input = array![[1.0f32, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
//! let kernel = array![[1.0f32, 0.0], [0.0, 1.0]];
//! let out = conv2_valid_gemm(input.view(), kernel.view()).unwrap();
//! assert_eq!(out, array![[6.0, 8.0], [12.0, 14.0]]);
//! ```

/// Error type shared by every module.
pub mod error;
/// Problem sizes, distributions and seeds.
pub mod config;
/// Matrix aliases, the element trait and small matrix helpers.
pub mod tensor;
/// Convolution algorithm implementations.
pub mod conv;
/// Precision comparison and benchmarking.
pub mod metrics;

pub use error::{ConvError, Result};
