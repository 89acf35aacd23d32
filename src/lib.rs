//! Shape inference for tensor graph operators.
//!
//! Given an operator's type, its attributes and the shapes of its inputs,
//! shape inference computes the shapes of the operator's outputs, or reports
//! why the inputs are invalid for the operator. The rules follow
//! [ONNX](https://onnx.ai/onnx/operators/index.html) semantics.
//!
//! Only shape metadata is involved. There is no tensor data, kernel
//! execution or memory layout.
//!
//! # Crate overview
//!
//! The rules for each operator are types in [`ops`] which implement the
//! [`InferShape`] trait. They accept any type implementing
//! [`TensorShapeView`], including plain `Vec<usize>` shapes:
//!
//! ```
//! use opshape::{InferShape, MatMul};
//!
//! let op = MatMul { transpose_a: false, transpose_b: false };
//! let shapes = op.infer_shape(&[vec![8usize, 1, 2, 3], vec![1, 5, 3, 4]]).unwrap();
//! assert_eq!(shapes[0].as_slice(), &[8, 5, 2, 4]);
//! ```
//!
//! [`Graph`] holds tensors and operators. Operators are validated when they
//! are added, by inferring their output shapes and comparing them against
//! any declared output tensors:
//!
//! ```
//! use opshape::Graph;
//!
//! let mut graph = Graph::new();
//! let a = graph.add_tensor(&[2, 3]);
//! let b = graph.add_tensor(&[2, 5]);
//! let concat = graph.add_concat(&[a, b], None, -1).unwrap();
//!
//! let out = graph.operator(concat).unwrap().outputs()[0];
//! assert_eq!(graph.dims(out).unwrap(), &[2, 8]);
//!
//! // Shapes which don't match are rejected.
//! let c = graph.add_tensor(&[4, 5]);
//! assert!(graph.add_matmul(a, c, None, false, false).is_err());
//! ```
//!
//! # Logging
//!
//! The crate logs via the [`log`](https://docs.rs/log) facade. Rejected
//! operators are logged at `warn` level and added operators at `debug`
//! level, or `info` if [`GraphOptions::verbose`] is set.

mod axis;
mod broadcast;
mod env;
mod error;
mod graph;
mod operator;
pub mod ops;
mod shape;
mod tensor;

pub use axis::{check_axis, normalize_axis};
pub use broadcast::broadcast_shapes;
pub use env::{env_flag, str_as_bool};
pub use error::{GraphError, InferShapeError};
pub use graph::{Graph, GraphOptions};
pub use operator::{OpId, Operator, OperatorDisplay};
pub use ops::{Concat, InferShape, MatMul, MatMulDims, OpKind};
pub use shape::Shape;
pub use tensor::{Tensor, TensorId, TensorShapeView};
