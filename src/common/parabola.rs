/// Fits a parabola `ax^2 + bx + c` through `(-1, left)`, `(0, center)` and
/// `(1, right)` and returns the abscissa and value of its vertex.
///
/// The abscissa is relative to the center sample. If the three points are
/// collinear the parabola degenerates and `(0.0, center)` is returned.
pub fn parabolic_vertex(left: f32, center: f32, right: f32) -> (f32, f32) {
    let a = 0.5 * (right - 2.0 * center + left);
    let b = 0.5 * (right - left);
    let c = center;
    if a == 0.0 {
        return (0.0, center);
    }
    // The derivative 2ax + b vanishes at the vertex
    let x = -b / (2.0 * a);
    (x, a * x * x + b * x + c)
}

#[cfg(test)]
mod tests {
    use super::parabolic_vertex;

    #[test]
    fn test_symmetric_vertex() {
        let (x, value) = parabolic_vertex(0.0, 3.0, 0.0);
        assert!(x.abs() <= f32::EPSILON);
        assert!((value - 3.0).abs() <= f32::EPSILON);
    }

    #[test]
    fn test_offset_vertex() {
        let (x, _) = parabolic_vertex(-2.0, 0.0, -1.0);
        assert!((x - 0.1666666_f32).abs() <= f32::EPSILON);

        // y = (x - 0.25)^2 sampled at -1, 0, 1
        let (x, value) = parabolic_vertex(1.5625, 0.0625, 0.5625);
        assert!((x - 0.25).abs() <= 1e-6);
        assert!(value.abs() <= 1e-6);
    }

    #[test]
    fn test_collinear_points() {
        assert_eq!(parabolic_vertex(1.0, 2.0, 3.0), (0.0, 2.0));
    }
}
