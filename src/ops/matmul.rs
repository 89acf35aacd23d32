use std::fmt;

use crate::broadcast::broadcast_shapes;
use crate::error::InferShapeError;
use crate::ops::{check_input_count, InferShape};
use crate::shape::Shape;
use crate::tensor::TensorShapeView;

/// Matrix multiplication with optionally transposed inputs.
///
/// Inputs must have at least 2 dims. The last two dims of each input are
/// the matrix and any leading dims are batch dims, which are broadcast
/// together. Transposition only swaps which of the last two dims is used as
/// the row or column. No data is moved.
///
/// See <https://onnx.ai/onnx/operators/onnx__MatMul.html> and
/// <https://onnx.ai/onnx/operators/onnx__Gemm.html>.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MatMul {
    pub transpose_a: bool,
    pub transpose_b: bool,
}

/// Effective dimensions of a matrix multiplication, where an `M x K` matrix
/// is multiplied by a `K x N` matrix.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MatMulDims {
    pub m: usize,
    pub n: usize,
    pub k: usize,
}

impl fmt::Display for MatMulDims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{},{}]", self.m, self.n, self.k)
    }
}

impl MatMul {
    /// Infer the output shape along with the effective `M`, `N` and `K`
    /// dimensions after applying transposition.
    pub fn infer_dims<T: TensorShapeView>(
        &self,
        inputs: &[T],
    ) -> Result<(Shape, MatMulDims), InferShapeError> {
        check_input_count(inputs, 2)?;
        let a_dims = inputs[0].dims();
        let b_dims = inputs[1].dims();

        let (a_batch, [a_rows, a_cols]) = split_matrix_dims(a_dims, 0)?;
        let (b_batch, [b_rows, b_cols]) = split_matrix_dims(b_dims, 1)?;

        let (m, k) = if self.transpose_a {
            (a_cols, a_rows)
        } else {
            (a_rows, a_cols)
        };
        let (b_k, n) = if self.transpose_b {
            (b_cols, b_rows)
        } else {
            (b_rows, b_cols)
        };

        if k != b_k {
            return Err(InferShapeError::ShapeMismatch(
                "Columns of first matrix does not match rows of second matrix",
            ));
        }

        let mut out_shape = broadcast_shapes(a_batch, b_batch).ok_or_else(|| {
            InferShapeError::BroadcastIncompatible {
                lhs: Shape::from_slice(a_batch),
                rhs: Shape::from_slice(b_batch),
            }
        })?;
        out_shape.push(m);
        out_shape.push(n);

        Ok((out_shape, MatMulDims { m, n, k }))
    }
}

/// Split a shape into batch dims and the trailing matrix dims.
fn split_matrix_dims(
    dims: &[usize],
    input: usize,
) -> Result<(&[usize], [usize; 2]), InferShapeError> {
    match dims {
        [batch @ .., rows, cols] => Ok((batch, [*rows, *cols])),
        _ => Err(InferShapeError::RankTooLow {
            input,
            rank: dims.len(),
        }),
    }
}

impl InferShape for MatMul {
    fn infer_shape<T: TensorShapeView>(
        &self,
        inputs: &[T],
    ) -> Result<Vec<Shape>, InferShapeError> {
        let (shape, _dims) = self.infer_dims(inputs)?;
        Ok([shape].into())
    }
}
