//! Shape inference rules for graph operators.
//!
//! Each operator kind has a struct holding its attributes, which implements
//! [`InferShape`]. [`OpKind`] is the closed set of operators a
//! [`Graph`](crate::Graph) can contain and dispatches to the matching rule.
//!
//! See the [ONNX operator reference](https://onnx.ai/onnx/operators/index.html)
//! for operator details.

use crate::error::InferShapeError;
use crate::shape::Shape;
use crate::tensor::TensorShapeView;

mod concat;
mod matmul;

pub use concat::Concat;
pub use matmul::{MatMul, MatMulDims};

/// Infer the shapes of an operator's outputs given the shapes of its inputs.
pub trait InferShape {
    /// Return the shape of each output, or the reason the inputs are not
    /// valid for this operator.
    ///
    /// Implementations must not panic for any combination of input shapes.
    fn infer_shape<T: TensorShapeView>(
        &self,
        inputs: &[T],
    ) -> Result<Vec<Shape>, InferShapeError>;
}

/// Check that an operator received exactly `expected` inputs.
fn check_input_count<T>(inputs: &[T], expected: usize) -> Result<(), InferShapeError> {
    if inputs.len() != expected {
        return Err(InferShapeError::IncorrectInputCount {
            expected,
            actual: inputs.len(),
        });
    }
    Ok(())
}

/// Operator kinds supported by shape inference.
#[derive(Clone, Debug, PartialEq)]
pub enum OpKind {
    Concat(Concat),
    MatMul(MatMul),
}

impl OpKind {
    /// Return the operator type name, eg. "Concat".
    pub fn name(&self) -> &'static str {
        match self {
            OpKind::Concat(_) => "Concat",
            OpKind::MatMul(_) => "MatMul",
        }
    }

    /// Infer output shapes, plus the effective matrix dimensions if this is
    /// a matrix multiplication.
    pub(crate) fn infer_with_dims<T: TensorShapeView>(
        &self,
        inputs: &[T],
    ) -> Result<(Vec<Shape>, Option<MatMulDims>), InferShapeError> {
        match self {
            OpKind::Concat(op) => Ok((op.infer_shape(inputs)?, None)),
            OpKind::MatMul(op) => {
                let (shape, dims) = op.infer_dims(inputs)?;
                Ok((vec![shape], Some(dims)))
            }
        }
    }
}

impl InferShape for OpKind {
    fn infer_shape<T: TensorShapeView>(
        &self,
        inputs: &[T],
    ) -> Result<Vec<Shape>, InferShapeError> {
        match self {
            OpKind::Concat(op) => op.infer_shape(inputs),
            OpKind::MatMul(op) => op.infer_shape(inputs),
        }
    }
}

impl From<Concat> for OpKind {
    fn from(op: Concat) -> OpKind {
        OpKind::Concat(op)
    }
}

impl From<MatMul> for OpKind {
    fn from(op: MatMul) -> OpKind {
        OpKind::MatMul(op)
    }
}
