use crate::axis::{check_axis, normalize_axis};
use crate::error::InferShapeError;
use crate::ops::InferShape;
use crate::shape::Shape;
use crate::tensor::TensorShapeView;

/// Concat operator.
///
/// See <https://onnx.ai/onnx/operators/onnx__Concat.html>.
#[derive(Clone, Debug, PartialEq)]
pub struct Concat {
    /// Concatenation axis, already normalized against the input rank.
    pub axis: isize,
}

impl Concat {
    /// Create a Concat operator for inputs of rank `rank`, normalizing a
    /// negative `axis`.
    pub fn new(axis: isize, rank: usize) -> Concat {
        Concat {
            axis: normalize_axis(axis, rank),
        }
    }
}

impl InferShape for Concat {
    fn infer_shape<T: TensorShapeView>(
        &self,
        inputs: &[T],
    ) -> Result<Vec<Shape>, InferShapeError> {
        let Some(first) = inputs.first() else {
            return Err(InferShapeError::IncorrectInputCount {
                expected: 1,
                actual: 0,
            });
        };

        let first_dims = first.dims();
        let axis = check_axis(self.axis, first_dims.len())?;

        let mut axis_size: usize = 0;
        for input in inputs {
            let dims = input.dims();
            if dims.len() != first_dims.len() {
                return Err(InferShapeError::ShapeMismatch(
                    "Tensors must have the same number of dimensions",
                ));
            }
            for (d, (&size, &first_size)) in dims.iter().zip(first_dims).enumerate() {
                if d == axis {
                    axis_size = axis_size.checked_add(size).ok_or(
                        InferShapeError::ShapeMismatch("Concatenated dimension size overflows"),
                    )?;
                } else if size != first_size {
                    return Err(InferShapeError::ShapeMismatch(
                        "Dimensions must be the same except for concat axis",
                    ));
                }
            }
        }

        let mut out_shape = Shape::from_slice(first_dims);
        out_shape[axis] = axis_size;

        Ok([out_shape].into())
    }
}
