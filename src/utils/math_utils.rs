//! Small numeric helpers shared by the geometry and detector code.
use nalgebra::Vector2;

#[must_use]
pub const fn usize_to_f64(value: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let newval = value as f64;
    newval
}

#[must_use]
pub const fn f64_to_usize(value: f64) -> usize {
    #[allow(clippy::cast_possible_truncation)]
    #[allow(clippy::cast_sign_loss)]
    let newval = value as usize;
    newval
}
/// z component of the cross product of two 2D vectors.
#[must_use]
pub fn cross_2d(a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    a.x.mul_add(b.y, -(a.y * b.x))
}
/// Rotate a 2D vector counter-clockwise by `angle` (in radians).
#[must_use]
pub fn rotate_2d(v: &Vector2<f64>, angle: f64) -> Vector2<f64> {
    let (s, c) = angle.sin_cos();
    Vector2::new(v.x.mul_add(c, -(v.y * s)), v.x.mul_add(s, v.y * c))
}
/// Vector perpendicular to `v` (rotated by +90°).
#[must_use]
pub fn perpendicular(v: &Vector2<f64>) -> Vector2<f64> {
    Vector2::new(-v.y, v.x)
}
/// Returns `true` if all components of the vector are finite.
#[must_use]
pub fn is_finite_vector(v: &Vector2<f64>) -> bool {
    v.x.is_finite() && v.y.is_finite()
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;
    #[test]
    fn conversions() {
        assert_eq!(usize_to_f64(12), 12.0);
        assert_eq!(f64_to_usize(12.7), 12);
        assert_eq!(f64_to_usize(-1.0), 0);
    }
    #[test]
    fn cross() {
        assert_eq!(cross_2d(&Vector2::x(), &Vector2::y()), 1.0);
        assert_eq!(cross_2d(&Vector2::y(), &Vector2::x()), -1.0);
        assert_eq!(cross_2d(&Vector2::x(), &Vector2::x()), 0.0);
    }
    #[test]
    fn rotate() {
        let v = rotate_2d(&Vector2::x(), FRAC_PI_2);
        assert_abs_diff_eq!(v.x, 0.0);
        assert_abs_diff_eq!(v.y, 1.0);
        assert_eq!(perpendicular(&Vector2::x()), Vector2::y());
    }
    #[test]
    fn finite() {
        assert!(is_finite_vector(&Vector2::new(1.0, 2.0)));
        assert!(!is_finite_vector(&Vector2::new(f64::NAN, 2.0)));
        assert!(!is_finite_vector(&Vector2::new(1.0, f64::INFINITY)));
    }
}
