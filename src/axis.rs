use crate::error::InferShapeError;

/// Convert an axis which may be negative into a non-negative one, for a
/// tensor with `rank` dimensions.
///
/// Negative axis values count backwards from the last dimension. This only
/// canonicalizes the sign. Axes outside `[-rank, rank)` are returned as-is
/// and are rejected later by [`check_axis`].
pub fn normalize_axis(axis: isize, rank: usize) -> isize {
    if axis < 0 {
        axis + rank as isize
    } else {
        axis
    }
}

/// Check that an already-normalized axis is a valid dimension index for a
/// tensor with `rank` dimensions.
pub fn check_axis(axis: isize, rank: usize) -> Result<usize, InferShapeError> {
    usize::try_from(axis)
        .ok()
        .filter(|&index| index < rank)
        .ok_or(InferShapeError::AxisOutOfRange { axis, rank })
}

#[cfg(test)]
mod tests {
    use opshape_testing::TestCases;

    use super::{check_axis, normalize_axis};
    use crate::error::InferShapeError;

    #[test]
    fn test_normalize_axis() {
        #[derive(Debug)]
        struct Case {
            axis: isize,
            rank: usize,
            expected: isize,
        }

        let cases = [
            Case {
                axis: -1,
                rank: 3,
                expected: 2,
            },
            Case {
                axis: -3,
                rank: 3,
                expected: 0,
            },
            Case {
                axis: 1,
                rank: 3,
                expected: 1,
            },
            // Out of range values are passed through.
            Case {
                axis: 5,
                rank: 3,
                expected: 5,
            },
            Case {
                axis: -4,
                rank: 3,
                expected: -1,
            },
        ];

        cases.test_each(|case| {
            assert_eq!(normalize_axis(case.axis, case.rank), case.expected);
        });
    }

    #[test]
    fn test_check_axis() {
        assert_eq!(check_axis(2, 3), Ok(2));
        assert_eq!(check_axis(0, 1), Ok(0));
        assert_eq!(
            check_axis(3, 3),
            Err(InferShapeError::AxisOutOfRange { axis: 3, rank: 3 })
        );

        // Negative values are not normalized again.
        assert_eq!(
            check_axis(-1, 3),
            Err(InferShapeError::AxisOutOfRange { axis: -1, rank: 3 })
        );
        assert_eq!(
            check_axis(normalize_axis(-4, 3), 3),
            Err(InferShapeError::AxisOutOfRange { axis: -1, rank: 3 })
        );
        assert_eq!(
            check_axis(0, 0),
            Err(InferShapeError::AxisOutOfRange { axis: 0, rank: 0 })
        );
    }
}
