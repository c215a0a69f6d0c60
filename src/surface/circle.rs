//! Circles and circular arcs
use nalgebra::{Point2, Vector2};

use super::{quadratic_roots, GeoSurface, SurfaceHit, PARALLEL_TOLERANCE};
use crate::{
    error::{LumosError, LumosResult},
    utils::math_utils::{cross_2d, is_finite_vector},
};

/// A full circle. The natural normal points outward.
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    center: Point2<f64>,
    radius: f64,
}
impl Circle {
    /// Creates a new [`Circle`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the center is not finite or the radius is <= 0.0 or not finite.
    pub fn new(center: Point2<f64>, radius: f64) -> LumosResult<Self> {
        if !is_finite_vector(&center.coords) {
            return Err(LumosError::Geometry("center must be finite".into()));
        }
        if radius <= 0.0 || !radius.is_finite() {
            return Err(LumosError::Geometry(
                "radius must be >0.0 and finite".into(),
            ));
        }
        Ok(Self { center, radius })
    }
    /// Returns the center of this [`Circle`].
    #[must_use]
    pub const fn center(&self) -> Point2<f64> {
        self.center
    }
    /// Returns the radius of this [`Circle`].
    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.radius
    }
    /// Ray parameters of both intersections with the circle line (ascending, `NaN` if missing).
    fn roots(&self, origin: &Point2<f64>, direction: &Vector2<f64>) -> [f64; 2] {
        let oc = origin - self.center;
        quadratic_roots(
            direction.norm_squared(),
            2.0 * oc.dot(direction),
            self.radius.mul_add(-self.radius, oc.norm_squared()),
        )
    }
}
impl GeoSurface for Circle {
    /// The parameter of the hit is the polar angle of the hit point as seen from the center.
    fn intersect(
        &self,
        origin: &Point2<f64>,
        direction: &Vector2<f64>,
        min_distance: f64,
    ) -> Option<SurfaceHit> {
        self.roots(origin, direction)
            .into_iter()
            .find(|t| t.is_finite() && *t > min_distance)
            .map(|t| {
                let point = origin + direction * t;
                let radial = (point - self.center) / self.radius;
                SurfaceHit::oriented(t, point, radial, direction, radial.y.atan2(radial.x))
            })
    }
}

/// A circular arc, symmetric around an axis through its center.
///
/// The arc consists of all points of the circle whose angle to `axis` (seen from the center) is at most
/// `half_angle`. The natural normal points outward (away from the center).
#[derive(Debug, Clone, PartialEq)]
pub struct CircularArc {
    circle: Circle,
    axis: Vector2<f64>,
    cos_half_angle: f64,
}
impl CircularArc {
    /// Creates a new [`CircularArc`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the circle parameters are invalid, the axis is degenerate or the
    /// half angle is not within `(0, π]`.
    pub fn new(
        center: Point2<f64>,
        radius: f64,
        axis: Vector2<f64>,
        half_angle: f64,
    ) -> LumosResult<Self> {
        let circle = Circle::new(center, radius)?;
        let norm = axis.norm();
        if norm < PARALLEL_TOLERANCE || !norm.is_finite() {
            return Err(LumosError::Geometry("arc axis must not be degenerate".into()));
        }
        if half_angle <= 0.0 || half_angle > std::f64::consts::PI || !half_angle.is_finite() {
            return Err(LumosError::Geometry(
                "half angle of an arc must be within (0, π]".into(),
            ));
        }
        Ok(Self {
            circle,
            axis: axis / norm,
            cos_half_angle: half_angle.cos(),
        })
    }
    /// Returns the center of the underlying circle.
    #[must_use]
    pub const fn center(&self) -> Point2<f64> {
        self.circle.center
    }
    /// Returns the radius of the underlying circle.
    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.circle.radius
    }
    /// Returns the point in the middle of the arc.
    #[must_use]
    pub fn apex(&self) -> Point2<f64> {
        self.circle.center + self.axis * self.circle.radius
    }
}
impl GeoSurface for CircularArc {
    /// The parameter of the hit is the signed distance of the hit point from the arc axis.
    fn intersect(
        &self,
        origin: &Point2<f64>,
        direction: &Vector2<f64>,
        min_distance: f64,
    ) -> Option<SurfaceHit> {
        self.circle
            .roots(origin, direction)
            .into_iter()
            .filter(|t| t.is_finite() && *t > min_distance)
            .find_map(|t| {
                let point = origin + direction * t;
                let radial = (point - self.circle.center) / self.circle.radius;
                if radial.dot(&self.axis) < self.cos_half_angle - PARALLEL_TOLERANCE {
                    return None;
                }
                let param = cross_2d(&self.axis, &radial) * self.circle.radius;
                Some(SurfaceHit::oriented(t, point, radial, direction, param))
            })
    }
}
