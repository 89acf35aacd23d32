use std::fmt;

use smallvec::SmallVec;

/// Sizes of each dimension of a tensor.
///
/// Most tensors in practice have 4 or fewer dimensions, so shapes of that
/// size are stored inline.
pub type Shape = SmallVec<[usize; 4]>;

/// Formats a shape as a compact list, eg. `[2,3,4]`.
pub(crate) struct ShapeDisplay<'a>(pub &'a [usize]);

impl fmt::Display for ShapeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, size) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", size)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::ShapeDisplay;

    #[test]
    fn test_shape_display() {
        assert_eq!(ShapeDisplay(&[]).to_string(), "[]");
        assert_eq!(ShapeDisplay(&[7]).to_string(), "[7]");
        assert_eq!(ShapeDisplay(&[2, 3, 4]).to_string(), "[2,3,4]");
    }
}
