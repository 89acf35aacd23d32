use crate::shape::Shape;

/// Return the shape produced by broadcasting `a` and `b` together following
/// NumPy / ONNX rules, or `None` if they are incompatible.
///
/// The shapes are aligned at their trailing ends and the shorter one is
/// treated as if it were padded with leading 1s. Each pair of sizes is
/// compatible if they are equal or one of them is 1, in which case the
/// other size is used.
///
/// See <https://onnx.ai/onnx/repo-docs/Broadcasting.html>.
pub fn broadcast_shapes(a: &[usize], b: &[usize]) -> Option<Shape> {
    let out_ndim = a.len().max(b.len());
    let a_pad = out_ndim - a.len();
    let b_pad = out_ndim - b.len();

    (0..out_ndim)
        .map(|i| {
            let a_size = i.checked_sub(a_pad).map(|i| a[i]).unwrap_or(1);
            let b_size = i.checked_sub(b_pad).map(|i| b[i]).unwrap_or(1);
            match (a_size, b_size) {
                (x, y) if x == y => Some(x),
                (1, y) => Some(y),
                (x, 1) => Some(x),
                _ => None,
            }
        })
        .collect()
}
