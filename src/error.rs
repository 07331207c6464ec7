use ndarray::ShapeError;
use thiserror::Error;

/// Errors raised by the convolution engines and the precision comparator.
///
/// Every variant is a precondition failure, reported before any arithmetic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvError {
    /// A shape does not satisfy the convolution contract: kernel larger than the
    /// input in valid mode, a zero-sized operand, kernels of different shapes in
    /// one batch, or a declared output that does not match the derived shape.
    #[error("invalid dimension: {0}")]
    InvalidDimension(String),

    /// Comparator or benchmark configuration was rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ConvError {
    pub(crate) fn dimension(msg: impl Into<String>) -> Self {
        ConvError::InvalidDimension(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        ConvError::InvalidConfig(msg.into())
    }
}

impl From<ShapeError> for ConvError {
    fn from(err: ShapeError) -> Self {
        ConvError::InvalidDimension(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ConvError>;
