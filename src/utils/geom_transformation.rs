//! Placement of components in the 2D scene.
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};
use uom::si::{angle::radian, f64::Angle};

use crate::{
    degree,
    error::{LumosError, LumosResult},
    utils::math_utils::is_finite_vector,
};

/// Position and orientation of a component.
///
/// The angle denotes the direction of the optical axis (the surface normal for flat elements), measured
/// counter-clockwise from the positive x axis. The extent of an element lies along the tangent, which is the
/// normal rotated by +90°.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    position: Point2<f64>,
    angle: Angle,
}
impl Default for Placement {
    fn default() -> Self {
        Self {
            position: Point2::origin(),
            angle: degree!(0.0),
        }
    }
}
impl Placement {
    /// Creates a new [`Placement`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the position or the angle are not finite.
    pub fn new(position: Point2<f64>, angle: Angle) -> LumosResult<Self> {
        let mut placement = Self::default();
        placement.set_position(position)?;
        placement.set_angle(angle)?;
        Ok(placement)
    }
    /// Returns the position of this [`Placement`].
    #[must_use]
    pub const fn position(&self) -> Point2<f64> {
        self.position
    }
    /// Sets the position of this [`Placement`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the position is not finite.
    pub fn set_position(&mut self, position: Point2<f64>) -> LumosResult<()> {
        if !is_finite_vector(&position.coords) {
            return Err(LumosError::Geometry("position must be finite".into()));
        }
        self.position = position;
        Ok(())
    }
    /// Returns the angle of this [`Placement`].
    #[must_use]
    pub const fn angle(&self) -> Angle {
        self.angle
    }
    /// Sets the angle of this [`Placement`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the angle is not finite.
    pub fn set_angle(&mut self, angle: Angle) -> LumosResult<()> {
        if !angle.is_finite() {
            return Err(LumosError::Geometry("angle must be finite".into()));
        }
        self.angle = angle;
        Ok(())
    }
    /// Unit vector along the optical axis.
    #[must_use]
    pub fn normal(&self) -> Vector2<f64> {
        let (s, c) = self.angle.get::<radian>().sin_cos();
        Vector2::new(c, s)
    }
    /// Unit vector along the extent of the element (normal rotated by +90°).
    #[must_use]
    pub fn tangent(&self) -> Vector2<f64> {
        let (s, c) = self.angle.get::<radian>().sin_cos();
        Vector2::new(-s, c)
    }
    /// Local coordinates `(u, v)` of a point: `u` along the normal, `v` along the tangent.
    #[must_use]
    pub fn to_local(&self, point: &Point2<f64>) -> (f64, f64) {
        let d = point - self.position;
        (d.dot(&self.normal()), d.dot(&self.tangent()))
    }
    /// Global point belonging to the local coordinates `(u, v)`.
    #[must_use]
    pub fn to_global(&self, u: f64, v: f64) -> Point2<f64> {
        self.position + self.normal() * u + self.tangent() * v
    }
    /// Rotate a direction given in the local frame (`u`, `v` components) into the global frame.
    #[must_use]
    pub fn direction_to_global(&self, u: f64, v: f64) -> Vector2<f64> {
        self.normal() * u + self.tangent() * v
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::point;
    #[test]
    fn default() {
        let p = Placement::default();
        assert_eq!(p.position(), point![0.0, 0.0]);
        assert_eq!(p.angle(), degree!(0.0));
        assert_eq!(p.normal(), Vector2::new(1.0, 0.0));
        assert_eq!(p.tangent(), Vector2::new(-0.0, 1.0));
    }
    #[test]
    fn new() {
        assert!(Placement::new(point![f64::NAN, 0.0], degree!(0.0)).is_err());
        assert!(Placement::new(point![0.0, 0.0], degree!(f64::INFINITY)).is_err());
        let p = Placement::new(point![1.0, 2.0], degree!(90.0)).unwrap();
        assert_abs_diff_eq!(p.normal().x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.normal().y, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.tangent().x, -1.0, epsilon = 1e-12);
    }
    #[test]
    fn local_frame() {
        let p = Placement::new(point![1.0, 2.0], degree!(90.0)).unwrap();
        let (u, v) = p.to_local(&point![0.0, 5.0]);
        assert_abs_diff_eq!(u, 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(v, 1.0, epsilon = 1e-12);
        let g = p.to_global(u, v);
        assert_abs_diff_eq!(g.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(g.y, 5.0, epsilon = 1e-12);
    }
}
