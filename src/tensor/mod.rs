mod element;
mod matrix;

pub use element::{Element, ElementType};
pub use matrix::{flip, mean, random_normal, seeded_rng, stack_kernels, stddev, zero_pad, Matrix, MatrixBatch};
