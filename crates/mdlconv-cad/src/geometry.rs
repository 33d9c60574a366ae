//! Mesh assembly helpers shared by the parsers and writers

/// Append `count` vertices' worth of an `N`-component attribute
///
/// The core mesh keeps every attribute either empty or as long as the
/// positions. `base` is the vertex count before this batch; missing values on
/// either side are zero-filled so the lengths stay aligned.
pub(crate) fn append_attribute<const N: usize, I>(
    target: &mut Vec<[f32; N]>,
    values: I,
    base: usize,
    count: usize,
) where
    I: IntoIterator<Item = [f32; N]>,
{
    let mut values = values.into_iter().take(count).peekable();
    if values.peek().is_none() && target.is_empty() {
        return;
    }
    target.resize(base, [0.0; N]);
    target.extend(values);
    target.resize(base + count, [0.0; N]);
}

/// Group a flat `[x, y, z, x, y, z, ...]` buffer into arrays
pub(crate) fn chunked<const N: usize>(flat: &[f32]) -> impl Iterator<Item = [f32; N]> + '_ {
    flat.chunks_exact(N).map(|chunk| {
        let mut value = [0.0; N];
        value.copy_from_slice(chunk);
        value
    })
}

/// Unit normal of a triangle, zero for degenerate triangles
pub(crate) fn face_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let n = [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ];
    let length = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if length <= f32::EPSILON {
        return [0.0; 3];
    }
    [n[0] / length, n[1] / length, n[2] / length]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_keeps_lengths_aligned() {
        let mut normals: Vec<[f32; 3]> = Vec::new();
        // first batch has no normals
        append_attribute(&mut normals, std::iter::empty(), 0, 3);
        assert!(normals.is_empty());
        // second batch does
        append_attribute(&mut normals, vec![[0.0, 0.0, 1.0]; 2], 3, 2);
        assert_eq!(normals.len(), 5);
        assert_eq!(normals[0], [0.0; 3]);
        assert_eq!(normals[4], [0.0, 0.0, 1.0]);
        // third batch lacks them again
        append_attribute(&mut normals, std::iter::empty(), 5, 1);
        assert_eq!(normals.len(), 6);
    }

    #[test]
    fn test_chunked() {
        let values: Vec<[f32; 2]> = chunked(&[1.0, 2.0, 3.0, 4.0, 5.0]).collect();
        assert_eq!(values, vec![[1.0, 2.0], [3.0, 4.0]]);
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_face_normal() {
        let n = face_normal([0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]);
        assert_eq!(n, [0.0, 0.0, 1.0]);
        let degenerate = face_normal([1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [2.0, 2.0, 2.0]);
        assert_eq!(degenerate, [0.0; 3]);
    }
}
