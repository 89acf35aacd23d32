use std::error::Error;
use std::fmt::{self, Display};

use crate::shape::{Shape, ShapeDisplay};
use crate::tensor::TensorId;

/// Errors returned by shape inference rules.
///
/// Shape inference failures are ordinary values. An operator whose inputs
/// produce one of these errors is rejected by the graph, but nothing panics.
#[derive(Clone, Debug, PartialEq)]
pub enum InferShapeError {
    /// Too many or too few inputs were provided for this operator.
    IncorrectInputCount { expected: usize, actual: usize },

    /// Input ranks or extents disagree in a way the operator does not allow.
    ShapeMismatch(&'static str),

    /// An input has fewer dimensions than the operator requires.
    RankTooLow { input: usize, rank: usize },

    /// The batch dimensions of two inputs cannot be broadcast together.
    BroadcastIncompatible { lhs: Shape, rhs: Shape },

    /// An axis lies outside `[0, rank)` after normalization.
    AxisOutOfRange { axis: isize, rank: usize },
}

impl Display for InferShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferShapeError::IncorrectInputCount { expected, actual } => {
                write!(f, "expected {} inputs but got {}", expected, actual)
            }
            InferShapeError::ShapeMismatch(details) => {
                write!(f, "incompatible input shapes: {}", details)
            }
            InferShapeError::RankTooLow { input, rank } => {
                write!(
                    f,
                    "input {} has rank {} but at least 2 dims are required",
                    input, rank
                )
            }
            InferShapeError::BroadcastIncompatible { lhs, rhs } => {
                write!(
                    f,
                    "cannot broadcast batch dims {} and {}",
                    ShapeDisplay(lhs),
                    ShapeDisplay(rhs)
                )
            }
            InferShapeError::AxisOutOfRange { axis, rank } => {
                write!(f, "axis {} is out of range for rank {}", axis, rank)
            }
        }
    }
}

impl Error for InferShapeError {}

/// Errors that occur when adding operators to a [`Graph`](crate::Graph) or
/// re-running inference over it.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphError {
    /// A tensor ID does not refer to a tensor in this graph.
    UnknownTensor(TensorId),

    /// An operator was given no inputs.
    MissingInputs,

    /// A declared output tensor is already an input or output of an
    /// operator in the graph, including the operator being added.
    OutputInUse(TensorId),

    /// Shape inference rejected the operator's inputs or attributes.
    InvalidOperator {
        op: &'static str,
        error: InferShapeError,
    },

    /// The operator infers a different number of outputs than it declares.
    OutputCountMismatch {
        op: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A declared output tensor's shape differs from the inferred shape.
    OutputShapeMismatch {
        op: &'static str,
        output: TensorId,
        expected: Shape,
        actual: Shape,
    },
}

impl Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::UnknownTensor(id) => write!(f, "unknown tensor {}", id),
            GraphError::MissingInputs => write!(f, "operator has no inputs"),
            GraphError::OutputInUse(id) => {
                write!(f, "tensor {} is already used by an operator", id)
            }
            GraphError::InvalidOperator { op, error } => {
                write!(f, "shape inference failed for {}: {}", op, error)
            }
            GraphError::OutputCountMismatch {
                op,
                expected,
                actual,
            } => write!(
                f,
                "{} infers {} outputs but declares {}",
                op, expected, actual
            ),
            GraphError::OutputShapeMismatch {
                op,
                output,
                expected,
                actual,
            } => write!(
                f,
                "{} output {} has shape {} but inferred shape is {}",
                op,
                output,
                ShapeDisplay(actual),
                ShapeDisplay(expected)
            ),
        }
    }
}

impl Error for GraphError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            GraphError::InvalidOperator { error, .. } => Some(error),
            _ => None,
        }
    }
}
