use std::fmt;

use rustc_hash::FxHashMap;

use crate::error::GraphError;
use crate::ops::{MatMulDims, OpKind};
use crate::shape::{Shape, ShapeDisplay};
use crate::tensor::{Tensor, TensorId, TensorShapeView};

pub(crate) type TensorMap = FxHashMap<TensorId, Tensor>;

/// ID of an operator in a [`Graph`](crate::Graph).
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct OpId(u32);

impl OpId {
    pub(crate) fn from_u32(value: u32) -> OpId {
        OpId(value)
    }

    /// Return the underlying ID value as a usize, for slice indexing.
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for OpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An operator in a graph, with the tensors it reads and writes.
#[derive(Clone, Debug)]
pub struct Operator {
    id: OpId,
    kind: OpKind,
    inputs: Vec<TensorId>,
    outputs: Vec<TensorId>,

    /// Matrix dimensions from the last successful inference of a MatMul.
    /// This is kept for debug output only.
    matmul_dims: Option<MatMulDims>,
}

impl Operator {
    pub(crate) fn new(id: OpId, kind: OpKind, inputs: Vec<TensorId>) -> Operator {
        Operator {
            id,
            kind,
            inputs,
            outputs: Vec::new(),
            matmul_dims: None,
        }
    }

    pub fn id(&self) -> OpId {
        self.id
    }

    pub fn kind(&self) -> &OpKind {
        &self.kind
    }

    pub fn inputs(&self) -> &[TensorId] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[TensorId] {
        &self.outputs
    }

    /// Return the `(M, N, K)` dimensions computed by the most recent shape
    /// inference, if this is a MatMul operator.
    pub fn matmul_dims(&self) -> Option<MatMulDims> {
        self.matmul_dims
    }

    pub(crate) fn set_outputs(&mut self, outputs: Vec<TensorId>) {
        self.outputs = outputs;
    }

    fn input_tensors<'a>(&self, tensors: &'a TensorMap) -> Result<Vec<&'a Tensor>, GraphError> {
        self.inputs
            .iter()
            .map(|id| tensors.get(id).ok_or(GraphError::UnknownTensor(*id)))
            .collect()
    }

    /// Run shape inference using the current shapes of the input tensors,
    /// updating the cached MatMul dimensions.
    pub(crate) fn infer(&mut self, tensors: &TensorMap) -> Result<Vec<Shape>, GraphError> {
        let inputs = self.input_tensors(tensors)?;
        let op = self.kind.name();
        let (shapes, matmul_dims) = self
            .kind
            .infer_with_dims(&inputs)
            .map_err(|error| GraphError::InvalidOperator { op, error })?;
        self.matmul_dims = matmul_dims;
        Ok(shapes)
    }

    /// Check that the shapes inferred from the operator's inputs match the
    /// declared shapes of its outputs.
    pub(crate) fn check_valid(&self, tensors: &TensorMap) -> Result<(), GraphError> {
        let inputs = self.input_tensors(tensors)?;
        let op = self.kind.name();
        let (shapes, _) = self
            .kind
            .infer_with_dims(&inputs)
            .map_err(|error| GraphError::InvalidOperator { op, error })?;

        if shapes.len() != self.outputs.len() {
            return Err(GraphError::OutputCountMismatch {
                op,
                expected: shapes.len(),
                actual: self.outputs.len(),
            });
        }

        for (expected, &output) in shapes.into_iter().zip(&self.outputs) {
            let tensor = tensors.get(&output).ok_or(GraphError::UnknownTensor(output))?;
            if tensor.dims() != expected.as_slice() {
                return Err(GraphError::OutputShapeMismatch {
                    op,
                    output,
                    actual: Shape::from_slice(tensor.dims()),
                    expected,
                });
            }
        }

        Ok(())
    }
}

/// Debug formatter for an operator, which includes the shapes of its inputs.
///
/// Created by [`Graph::display_op`](crate::Graph::display_op).
pub struct OperatorDisplay<'a> {
    pub(crate) op: &'a Operator,
    pub(crate) tensors: &'a TensorMap,
}

/// Write a comma-separated list of tensor IDs.
fn write_ids(f: &mut fmt::Formatter<'_>, ids: &[TensorId]) -> fmt::Result {
    for (i, id) in ids.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, "{}", id)?;
    }
    Ok(())
}

impl fmt::Display for OperatorDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = self.op;
        match &op.kind {
            OpKind::Concat(concat) => {
                write!(f, "Concat[{}](", op.id)?;
                for input in &op.inputs {
                    match self.tensors.get(input) {
                        Some(tensor) => write!(f, "{},", ShapeDisplay(tensor.dims()))?,
                        None => write!(f, "?,")?,
                    }
                }
                write!(f, "dim={},input=", concat.axis)?;
                write_ids(f, &op.inputs)?;
                write!(f, ",output=")?;
                write_ids(f, &op.outputs)?;
                write!(f, ")")
            }
            OpKind::MatMul(matmul) => {
                let a = if matmul.transpose_a { "A^T" } else { "A" };
                let b = if matmul.transpose_b { "B^T" } else { "B" };
                write!(f, "Matmul([{},{}],A=", a, b)?;
                write_ids(f, &op.inputs[..op.inputs.len().min(1)])?;
                write!(f, ",B=")?;
                write_ids(f, op.inputs.get(1..).unwrap_or_default())?;
                write!(f, ",C=")?;
                write_ids(f, &op.outputs)?;
                match op.matmul_dims {
                    Some(dims) => write!(f, ",mnk={})", dims),
                    None => write!(f, ",mnk=[?])"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;

    use super::{OpId, Operator, OperatorDisplay, TensorMap};
    use crate::error::{GraphError, InferShapeError};
    use crate::ops::{Concat, MatMul, MatMulDims, OpKind};
    use crate::tensor::{Tensor, TensorId};

    fn tensor_map(shapes: &[&[usize]]) -> TensorMap {
        shapes
            .iter()
            .enumerate()
            .map(|(i, dims)| {
                let id = TensorId::from_u32(i as u32);
                (id, Tensor::new(id, dims.iter().copied().collect()))
            })
            .collect()
    }

    fn ids(ids: &[u32]) -> Vec<TensorId> {
        ids.iter().copied().map(TensorId::from_u32).collect()
    }

    #[test]
    fn test_infer_updates_matmul_dims() {
        let tensors = tensor_map(&[&[2, 3], &[3, 4]]);
        let mut op = Operator::new(
            OpId::from_u32(0),
            OpKind::MatMul(MatMul::default()),
            ids(&[0, 1]),
        );
        assert_eq!(op.matmul_dims(), None);

        let shapes = op.infer(&tensors).unwrap();
        assert_eq!(shapes[0].as_slice(), &[2, 4]);
        assert_eq!(op.matmul_dims(), Some(MatMulDims { m: 2, n: 4, k: 3 }));
    }

    #[test]
    fn test_infer_failure_keeps_matmul_dims() {
        let mut tensors = tensor_map(&[&[2, 3], &[3, 4]]);
        let mut op = Operator::new(
            OpId::from_u32(0),
            OpKind::MatMul(MatMul::default()),
            ids(&[0, 1]),
        );
        op.infer(&tensors).unwrap();

        let b = TensorId::from_u32(1);
        tensors.get_mut(&b).unwrap().set_dims(smallvec![5, 4]);
        let err = op.infer(&tensors).err().unwrap();
        assert!(matches!(
            err,
            GraphError::InvalidOperator {
                op: "MatMul",
                error: InferShapeError::ShapeMismatch(_)
            }
        ));
        assert_eq!(op.matmul_dims(), Some(MatMulDims { m: 2, n: 4, k: 3 }));
    }

    #[test]
    fn test_check_valid() {
        let tensors = tensor_map(&[&[2, 3], &[2, 5], &[2, 8], &[2, 9]]);
        let mut op = Operator::new(
            OpId::from_u32(0),
            OpKind::Concat(Concat::new(1, 2)),
            ids(&[0, 1]),
        );

        op.set_outputs(ids(&[2]));
        assert_eq!(op.check_valid(&tensors), Ok(()));

        op.set_outputs(ids(&[3]));
        assert_eq!(
            op.check_valid(&tensors),
            Err(GraphError::OutputShapeMismatch {
                op: "Concat",
                output: TensorId::from_u32(3),
                expected: smallvec![2, 8],
                actual: smallvec![2, 9],
            })
        );

        op.set_outputs(ids(&[2, 3]));
        assert_eq!(
            op.check_valid(&tensors),
            Err(GraphError::OutputCountMismatch {
                op: "Concat",
                expected: 1,
                actual: 2,
            })
        );

        op.set_outputs(ids(&[7]));
        assert_eq!(
            op.check_valid(&tensors),
            Err(GraphError::UnknownTensor(TensorId::from_u32(7)))
        );
    }

    #[test]
    fn test_display() {
        let tensors = tensor_map(&[&[2, 3], &[2, 5], &[2, 8], &[3, 4]]);

        let mut concat = Operator::new(
            OpId::from_u32(4),
            OpKind::Concat(Concat::new(-1, 2)),
            ids(&[0, 1]),
        );
        concat.set_outputs(ids(&[2]));
        let display = OperatorDisplay {
            op: &concat,
            tensors: &tensors,
        };
        assert_eq!(
            display.to_string(),
            "Concat[4]([2,3],[2,5],dim=1,input=0,1,output=2)"
        );

        let mut matmul = Operator::new(
            OpId::from_u32(5),
            OpKind::MatMul(MatMul {
                transpose_a: true,
                transpose_b: false,
            }),
            ids(&[0, 3]),
        );
        matmul.set_outputs(ids(&[2]));
        let display = OperatorDisplay {
            op: &matmul,
            tensors: &tensors,
        };
        assert_eq!(display.to_string(), "Matmul([A^T,B],A=0,B=3,C=2,mnk=[?])");

        matmul.matmul_dims = Some(MatMulDims { m: 3, n: 4, k: 2 });
        let display = OperatorDisplay {
            op: &matmul,
            tensors: &tensors,
        };
        assert_eq!(display.to_string(), "Matmul([A^T,B],A=0,B=3,C=2,mnk=[3,4,2])");
    }
}
