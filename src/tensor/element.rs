use std::fmt;

use ndarray::{LinalgScalar, ScalarOperand};
use rustfft::FftNum;

/// Floating-point element type the convolution engines are generic over.
///
/// Bundles what every engine needs: FFT planning (`FftNum`), dense matrix
/// multiply (`LinalgScalar`) and lossless widening to `f64` for statistics.
pub trait Element: FftNum + LinalgScalar + ScalarOperand + fmt::Display + Default {
    /// Runtime tag for this element type.
    const TYPE: ElementType;

    /// Narrow an `f64` into this type, rounding to nearest.
    fn cast(v: f64) -> Self;

    /// Widen to `f64`.
    fn widen(self) -> f64;
}

impl Element for f32 {
    const TYPE: ElementType = ElementType::Single;

    #[inline]
    fn cast(v: f64) -> Self {
        v as f32
    }

    #[inline]
    fn widen(self) -> f64 {
        self as f64
    }
}

impl Element for f64 {
    const TYPE: ElementType = ElementType::Double;

    #[inline]
    fn cast(v: f64) -> Self {
        v
    }

    #[inline]
    fn widen(self) -> f64 {
        self
    }
}

/// Element width selected at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// 32-bit IEEE-754 (`f32`).
    Single,
    /// 64-bit IEEE-754 (`f64`).
    Double,
}

impl ElementType {
    pub const ALL: [ElementType; 2] = [ElementType::Single, ElementType::Double];

    pub fn name(self) -> &'static str {
        match self {
            ElementType::Single => "single",
            ElementType::Double => "double",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
