/// Direct nested-loop convolution (reference implementation).
///
/// Both modes compute `out[i][j] = sum_{a,b} in[i - a][j - b] * ker[a][b]`
/// over in-range input indices; valid mode keeps the fully-overlapping region.

use ndarray::ArrayView2;

use super::ConvShape;
use crate::error::Result;
use crate::tensor::{Element, Matrix};

pub fn conv2_valid_direct<T: Element>(input: ArrayView2<'_, T>, kernel: ArrayView2<'_, T>) -> Result<Matrix<T>> {
    let (out_h, out_w) = ConvShape::new(input.dim(), kernel.dim())?.valid()?;
    let (k1, k2) = kernel.dim();

    let mut output = Matrix::zeros((out_h, out_w));
    for oh in 0..out_h {
        for ow in 0..out_w {
            let mut sum = T::zero();
            for kh in 0..k1 {
                for kw in 0..k2 {
                    let ih = oh + k1 - 1 - kh;
                    let iw = ow + k2 - 1 - kw;
                    sum = sum + input[[ih, iw]] * kernel[[kh, kw]];
                }
            }
            output[[oh, ow]] = sum;
        }
    }
    Ok(output)
}

pub fn conv2_full_direct<T: Element>(input: ArrayView2<'_, T>, kernel: ArrayView2<'_, T>) -> Result<Matrix<T>> {
    let shape = ConvShape::new(input.dim(), kernel.dim())?;
    let (out_h, out_w) = shape.full();
    let (v1, v2) = input.dim();
    let (k1, k2) = kernel.dim();

    let mut output = Matrix::zeros((out_h, out_w));
    for oh in 0..out_h {
        for ow in 0..out_w {
            // kernel rows/cols whose tap lands inside the input
            let kh_lo = (oh + 1).saturating_sub(v1);
            let kh_hi = k1.min(oh + 1);
            let kw_lo = (ow + 1).saturating_sub(v2);
            let kw_hi = k2.min(ow + 1);

            let mut sum = T::zero();
            for kh in kh_lo..kh_hi {
                for kw in kw_lo..kw_hi {
                    sum = sum + input[[oh - kh, ow - kw]] * kernel[[kh, kw]];
                }
            }
            output[[oh, ow]] = sum;
        }
    }
    Ok(output)
}
