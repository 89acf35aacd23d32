use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::env::env_flag;
use crate::error::GraphError;
use crate::operator::{OpId, Operator, OperatorDisplay, TensorMap};
use crate::ops::{Concat, MatMul, OpKind};
use crate::shape::Shape;
use crate::tensor::{Tensor, TensorId, TensorShapeView};


/// Options that control logging and other behaviors of a [`Graph`].
#[derive(Clone, Debug, Default)]
pub struct GraphOptions {
    /// Log each operator at `info` level when it is added to the graph,
    /// instead of `debug`.
    pub verbose: bool,

    /// Check operators in parallel in [`Graph::check`].
    pub parallel: bool,
}

impl GraphOptions {
    /// Read options from the `OPSHAPE_VERBOSE` and `OPSHAPE_PARALLEL`
    /// environment variables.
    pub fn from_env() -> GraphOptions {
        GraphOptions {
            verbose: env_flag("OPSHAPE_VERBOSE", false),
            parallel: env_flag("OPSHAPE_PARALLEL", false),
        }
    }
}

/// A graph of tensors and the operators that connect them.
///
/// Tensors here are shape metadata only. Each operator is validated when it
/// is added: its output shapes are inferred from its inputs and, if the
/// caller declared an output tensor, compared against that tensor's shape.
/// Operators that fail validation are not added.
///
/// Operators can only read tensors which already exist, and a declared
/// output must not be read or written by any operator already in the graph.
/// The order in which operators are added is therefore a valid execution
/// order.
pub struct Graph {
    tensors: TensorMap,
    operators: Vec<Operator>,
    next_tensor_id: u32,
    options: GraphOptions,
}

impl Graph {
    /// Create an empty graph with default options.
    pub fn new() -> Graph {
        Self::with_options(GraphOptions::default())
    }

    pub fn with_options(options: GraphOptions) -> Graph {
        Graph {
            tensors: FxHashMap::default(),
            operators: Vec::new(),
            next_tensor_id: 0,
            options,
        }
    }

    pub fn options(&self) -> &GraphOptions {
        &self.options
    }

    /// Add a tensor with the given shape and return its ID.
    pub fn add_tensor(&mut self, dims: &[usize]) -> TensorId {
        self.insert_tensor(Shape::from_slice(dims))
    }

    fn insert_tensor(&mut self, dims: Shape) -> TensorId {
        let id = TensorId::from_u32(self.next_tensor_id);
        self.next_tensor_id += 1;
        self.tensors.insert(id, Tensor::new(id, dims));
        id
    }

    pub fn tensor(&self, id: TensorId) -> Option<&Tensor> {
        self.tensors.get(&id)
    }

    /// Return the shape of a tensor.
    pub fn dims(&self, id: TensorId) -> Result<&[usize], GraphError> {
        self.tensors
            .get(&id)
            .map(|t| t.dims())
            .ok_or(GraphError::UnknownTensor(id))
    }

    /// Replace the shape of a tensor.
    ///
    /// This does not re-validate operators which use the tensor. Call
    /// [`infer_shapes`](Graph::infer_shapes) to propagate the change.
    pub fn set_dims(&mut self, id: TensorId, dims: &[usize]) -> Result<(), GraphError> {
        let tensor = self
            .tensors
            .get_mut(&id)
            .ok_or(GraphError::UnknownTensor(id))?;
        tensor.set_dims(Shape::from_slice(dims));
        Ok(())
    }

    pub fn operator(&self, id: OpId) -> Option<&Operator> {
        self.operators.get(id.as_usize())
    }

    /// Return operators in the order they were added.
    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    /// Return a debug formatter for an operator.
    pub fn display_op(&self, id: OpId) -> Option<OperatorDisplay<'_>> {
        self.operator(id).map(|op| OperatorDisplay {
            op,
            tensors: &self.tensors,
        })
    }

    /// Add a Concat operator which joins `inputs` along `axis`.
    ///
    /// `axis` may be negative, in which case it counts back from the last
    /// dimension of the first input. If `output` is `None`, an output tensor
    /// is created with the inferred shape.
    pub fn add_concat(
        &mut self,
        inputs: &[TensorId],
        output: Option<TensorId>,
        axis: isize,
    ) -> Result<OpId, GraphError> {
        let Some(&first) = inputs.first() else {
            return Err(GraphError::MissingInputs);
        };
        let rank = self.dims(first)?.len();
        let kind = OpKind::Concat(Concat::new(axis, rank));
        self.add_op(kind, inputs, output)
    }

    /// Add a MatMul operator which computes `C = op(A) x op(B)`, where `op`
    /// optionally transposes the last two dims of its input.
    ///
    /// If `output` is `None`, an output tensor is created with the inferred
    /// shape.
    pub fn add_matmul(
        &mut self,
        a: TensorId,
        b: TensorId,
        output: Option<TensorId>,
        transpose_a: bool,
        transpose_b: bool,
    ) -> Result<OpId, GraphError> {
        let kind = OpKind::MatMul(MatMul {
            transpose_a,
            transpose_b,
        });
        self.add_op(kind, &[a, b], output)
    }

    fn add_op(
        &mut self,
        kind: OpKind,
        inputs: &[TensorId],
        output: Option<TensorId>,
    ) -> Result<OpId, GraphError> {
        let id = OpId::from_u32(self.operators.len() as u32);
        let mut op = Operator::new(id, kind, inputs.to_vec());

        if let Err(err) = self.init_outputs(&mut op, output) {
            log::warn!("Rejected {} operator: {}", op.kind().name(), err);
            return Err(err);
        }

        let display = OperatorDisplay {
            op: &op,
            tensors: &self.tensors,
        };
        if self.options.verbose {
            log::info!("Added {}", display);
        } else {
            log::debug!("Added {}", display);
        }

        self.operators.push(op);
        Ok(id)
    }

    /// Return true if `id` is an input or output of any operator in the graph.
    fn is_used(&self, id: TensorId) -> bool {
        self.operators
            .iter()
            .any(|op| op.inputs().contains(&id) || op.outputs().contains(&id))
    }

    /// Infer the shapes of a new operator's outputs, then either check them
    /// against the declared output or create output tensors.
    ///
    /// The graph is only modified if this succeeds.
    fn init_outputs(
        &mut self,
        op: &mut Operator,
        output: Option<TensorId>,
    ) -> Result<(), GraphError> {
        let shapes = op.infer(&self.tensors)?;
        match output {
            Some(output) => {
                if op.inputs().contains(&output) || self.is_used(output) {
                    return Err(GraphError::OutputInUse(output));
                }
                op.set_outputs(vec![output]);
                op.check_valid(&self.tensors)
            }
            None => {
                let outputs = shapes
                    .into_iter()
                    .map(|shape| self.insert_tensor(shape))
                    .collect();
                op.set_outputs(outputs);
                Ok(())
            }
        }
    }

    /// Re-run shape inference for every operator in the order they were
    /// added, updating the shapes of their outputs.
    ///
    /// Use this after changing input shapes with
    /// [`set_dims`](Graph::set_dims). If an operator fails, inference stops
    /// and the outputs of that operator and those after it keep their
    /// previous shapes.
    pub fn infer_shapes(&mut self) -> Result<(), GraphError> {
        for op in self.operators.iter_mut() {
            let shapes = op.infer(&self.tensors)?;
            if shapes.len() != op.outputs().len() {
                return Err(GraphError::OutputCountMismatch {
                    op: op.kind().name(),
                    expected: shapes.len(),
                    actual: op.outputs().len(),
                });
            }
            for (output, shape) in op.outputs().iter().zip(shapes) {
                let tensor = self
                    .tensors
                    .get_mut(output)
                    .ok_or(GraphError::UnknownTensor(*output))?;
                tensor.set_dims(shape);
            }
            log::trace!(
                "Inferred {}",
                OperatorDisplay {
                    op,
                    tensors: &self.tensors
                }
            );
        }
        Ok(())
    }

    /// Check that every operator's declared output shapes match the shapes
    /// inferred from its inputs.
    ///
    /// If [`GraphOptions::parallel`] is set, operators are checked
    /// concurrently. In that case the returned error is from one of the
    /// failing operators, but not necessarily the first.
    pub fn check(&self) -> Result<(), GraphError> {
        let tensors = &self.tensors;
        if self.options.parallel {
            self.operators
                .par_iter()
                .try_for_each(|op| op.check_valid(tensors))
        } else {
            self.operators
                .iter()
                .try_for_each(|op| op.check_valid(tensors))
        }
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
