use std::fmt;

use crate::shape::{Shape, ShapeDisplay};

/// Read-only access to the shape of a tensor.
///
/// Shape inference rules only ever read dimension sizes, so they accept
/// anything that can provide them: graph tensors, plain vectors and slices.
pub trait TensorShapeView {
    /// Return the size of each dimension.
    fn dims(&self) -> &[usize];

    /// Return the number of dimensions.
    fn rank(&self) -> usize {
        self.dims().len()
    }
}

impl<T: TensorShapeView + ?Sized> TensorShapeView for &T {
    fn dims(&self) -> &[usize] {
        T::dims(self)
    }
}

impl TensorShapeView for [usize] {
    fn dims(&self) -> &[usize] {
        self
    }
}

impl<const N: usize> TensorShapeView for [usize; N] {
    fn dims(&self) -> &[usize] {
        self
    }
}

impl TensorShapeView for Vec<usize> {
    fn dims(&self) -> &[usize] {
        self
    }
}

impl TensorShapeView for Shape {
    fn dims(&self) -> &[usize] {
        self
    }
}

/// ID of a tensor in a [`Graph`](crate::Graph).
#[derive(Copy, Clone, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TensorId(u32);

impl TensorId {
    pub(crate) fn from_u32(value: u32) -> TensorId {
        TensorId(value)
    }

    /// Return the underlying u32 value of the ID.
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Debug for TensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TensorId({})", self.0)
    }
}

/// Shape metadata for a tensor in a graph.
///
/// Tensors carry no data. Their dimensions are either declared when the
/// tensor is added, or filled in by inference when a graph creates the
/// outputs of an operator.
#[derive(Clone, Debug, PartialEq)]
pub struct Tensor {
    id: TensorId,
    dims: Shape,
}

impl Tensor {
    pub(crate) fn new(id: TensorId, dims: Shape) -> Tensor {
        Tensor { id, dims }
    }

    pub fn id(&self) -> TensorId {
        self.id
    }

    pub(crate) fn set_dims(&mut self, dims: Shape) {
        self.dims = dims;
    }
}

impl TensorShapeView for Tensor {
    fn dims(&self) -> &[usize] {
        &self.dims
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tensor {}, shape {}", self.id, ShapeDisplay(&self.dims))
    }
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;

    use super::{Tensor, TensorId, TensorShapeView};
    use crate::shape::Shape;

    #[test]
    fn test_shape_views() {
        let dims = vec![2, 3, 4];
        assert_eq!(dims.rank(), 3);
        assert_eq!([5usize, 6].dims(), &[5, 6]);

        let shape: Shape = smallvec![1, 2];
        assert_eq!(shape.rank(), 2);

        let empty: &[usize] = &[];
        assert_eq!(empty.rank(), 0);
    }

    #[test]
    fn test_tensor() {
        let tensor = Tensor::new(TensorId::from_u32(3), smallvec![8, 16]);
        assert_eq!(tensor.id(), TensorId::from_u32(3));
        assert_eq!(tensor.dims(), &[8, 16]);
        assert_eq!(tensor.rank(), 2);
        assert_eq!(tensor.to_string(), "Tensor 3, shape [8,16]");
        assert_eq!(format!("{:?}", tensor.id()), "TensorId(3)");
    }
}
